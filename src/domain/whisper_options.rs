use serde::Serialize;

/// Decoding parameters sent with every transcription request.
///
/// The values are fixed for the service and never taken from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhisperOptions {
    pub model: &'static str,
    pub language: &'static str,
    pub translate: bool,
    pub temperature: f64,
    pub suppress_tokens: &'static str,
    pub logprob_threshold: f64,
    pub no_speech_threshold: f64,
    pub condition_on_previous_text: bool,
}

impl Default for WhisperOptions {
    fn default() -> Self {
        Self {
            model: "large-v3",
            language: "auto",
            translate: false,
            temperature: 0.0,
            suppress_tokens: "-1",
            logprob_threshold: -1.0,
            no_speech_threshold: 0.6,
            condition_on_previous_text: true,
        }
    }
}
