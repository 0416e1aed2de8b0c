mod mock_transcription_engine;
mod replicate_whisper_engine;

pub use mock_transcription_engine::MockTranscriptionEngine;
pub use replicate_whisper_engine::{
    DEFAULT_INLINE_AUDIO_LIMIT, DEFAULT_REPLICATE_BASE_URL, ReplicateWhisperEngine, audio_mime,
};
