use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ProviderOutput, WhisperOptions};

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &WhisperOptions,
    ) -> Result<ProviderOutput, TranscriptionError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio unreadable: {0}")]
    AudioUnreadable(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
