use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{ProviderOutput, WhisperOptions};

/// Engine that replays a canned outcome and remembers which files it was handed.
pub struct MockTranscriptionEngine {
    outcome: Result<ProviderOutput, TranscriptionError>,
    seen_paths: Mutex<Vec<PathBuf>>,
}

impl MockTranscriptionEngine {
    pub fn returning(output: ProviderOutput) -> Self {
        Self {
            outcome: Ok(output),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: TranscriptionError) -> Self {
        Self {
            outcome: Err(error),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        audio_path: &Path,
        _options: &WhisperOptions,
    ) -> Result<ProviderOutput, TranscriptionError> {
        if let Ok(mut paths) = self.seen_paths.lock() {
            paths.push(audio_path.to_path_buf());
        }
        self.outcome.clone()
    }
}
