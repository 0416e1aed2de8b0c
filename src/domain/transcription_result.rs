use serde::Serialize;

/// Normalized transcription returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionResult {
    pub transcription: String,
    pub language: Option<String>,
}

impl TranscriptionResult {
    pub fn new(transcription: impl Into<String>, language: Option<String>) -> Self {
        Self {
            transcription: transcription.into(),
            language,
        }
    }
}
