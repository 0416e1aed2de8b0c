mod audio_staging;
mod transcription_engine;

pub use audio_staging::{AudioStaging, StagedAudio, StagingError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
