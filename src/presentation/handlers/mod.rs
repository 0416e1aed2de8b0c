mod error;
mod health;
mod transcribe;

pub use error::{ErrorResponse, TranscribeError, panic_response};
pub use health::{HealthResponse, health_handler};
pub use transcribe::{FILE_FIELD, transcribe_handler};
