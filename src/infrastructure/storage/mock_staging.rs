use std::io;

use async_trait::async_trait;

use crate::application::ports::{AudioStaging, StagedAudio, StagingError};
use crate::domain::UploadedAudio;

/// Staging that always fails, for exercising the server error path.
pub struct FailingAudioStaging {
    message: String,
}

impl FailingAudioStaging {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl AudioStaging for FailingAudioStaging {
    async fn stage(&self, _audio: &UploadedAudio) -> Result<Box<dyn StagedAudio>, StagingError> {
        Err(StagingError::Io(io::Error::other(self.message.clone())))
    }
}
