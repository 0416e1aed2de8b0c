mod mock_staging;
mod temp_file_staging;

pub use mock_staging::FailingAudioStaging;
pub use temp_file_staging::{TempFileStaging, TempStagedAudio};
