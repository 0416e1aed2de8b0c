use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::UploadedAudio;

/// Writes uploads to short-lived storage the transcription engine can read from.
#[async_trait]
pub trait AudioStaging: Send + Sync {
    async fn stage(&self, audio: &UploadedAudio) -> Result<Box<dyn StagedAudio>, StagingError>;
}

/// A staged upload. Dropping the handle removes the underlying file.
pub trait StagedAudio: Send + Sync {
    fn path(&self) -> &Path;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("staging task failed: {0}")]
    TaskFailed(String),
}
