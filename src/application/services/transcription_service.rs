use std::sync::Arc;

use crate::application::ports::{
    AudioStaging, StagingError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{TranscriptionResult, UploadedAudio, WhisperOptions, preview_transcript};

pub struct TranscriptionService<E>
where
    E: TranscriptionEngine,
{
    engine: Arc<E>,
    staging: Arc<dyn AudioStaging>,
    options: WhisperOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("staging failed: {0}")]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Provider(#[from] TranscriptionError),
}

impl<E> TranscriptionService<E>
where
    E: TranscriptionEngine,
{
    pub fn new(engine: Arc<E>, staging: Arc<dyn AudioStaging>) -> Self {
        Self {
            engine,
            staging,
            options: WhisperOptions::default(),
        }
    }

    #[tracing::instrument(
        skip(self, audio),
        fields(filename = %audio.filename, bytes = audio.size_bytes())
    )]
    pub async fn transcribe(
        &self,
        audio: &UploadedAudio,
    ) -> Result<TranscriptionResult, TranscriptionServiceError> {
        let staged = self.staging.stage(audio).await?;
        tracing::info!(path = %staged.path().display(), "Saved audio to temporary file");

        tracing::info!("Starting transcription call");
        let output = match self.engine.transcribe(staged.path(), &self.options).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(error = %e, "Transcription provider error");
                return Err(e.into());
            }
        };
        drop(staged);

        let result = output.normalize();
        tracing::info!(
            language = result.language.as_deref().unwrap_or("unknown"),
            preview = %preview_transcript(&result.transcription),
            "Transcription call successful"
        );

        Ok(result)
    }
}
