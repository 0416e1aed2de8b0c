use std::sync::Arc;

use crate::application::ports::TranscriptionEngine;
use crate::application::services::TranscriptionService;

pub struct AppState<E>
where
    E: TranscriptionEngine,
{
    pub transcription_service: Arc<TranscriptionService<E>>,
    pub max_upload_size_bytes: usize,
}

impl<E> Clone for AppState<E>
where
    E: TranscriptionEngine,
{
    fn clone(&self) -> Self {
        Self {
            transcription_service: Arc::clone(&self.transcription_service),
            max_upload_size_bytes: self.max_upload_size_bytes,
        }
    }
}
