mod model_reference;
mod provider_output;
mod transcript_preview;
mod transcription_result;
mod uploaded_audio;
mod whisper_options;

pub use model_reference::{InvalidModelReference, ModelReference};
pub use provider_output::ProviderOutput;
pub use transcript_preview::preview_transcript;
pub use transcription_result::TranscriptionResult;
pub use uploaded_audio::UploadedAudio;
pub use whisper_options::WhisperOptions;
