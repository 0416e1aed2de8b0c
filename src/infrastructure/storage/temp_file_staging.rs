use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempPath;

use crate::application::ports::{AudioStaging, StagedAudio, StagingError};
use crate::domain::UploadedAudio;

const TEMP_FILE_PREFIX: &str = "audio-";

/// Stages uploads as uniquely named files in a temp directory.
pub struct TempFileStaging {
    dir: Option<PathBuf>,
    default_suffix: String,
}

impl TempFileStaging {
    pub fn new(
        dir: Option<PathBuf>,
        default_suffix: impl Into<String>,
    ) -> Result<Self, StagingError> {
        if let Some(dir) = &dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            dir,
            default_suffix: default_suffix.into(),
        })
    }

    fn suffix_for(&self, audio: &UploadedAudio) -> String {
        audio
            .audio_extension()
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| self.default_suffix.clone())
    }
}

/// Removes the file when dropped.
pub struct TempStagedAudio {
    path: TempPath,
}

impl StagedAudio for TempStagedAudio {
    fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AudioStaging for TempFileStaging {
    async fn stage(&self, audio: &UploadedAudio) -> Result<Box<dyn StagedAudio>, StagingError> {
        let dir = self.dir.clone();
        let suffix = self.suffix_for(audio);
        let data = audio.data.clone();

        let path = tokio::task::spawn_blocking(move || -> Result<TempPath, StagingError> {
            let mut builder = tempfile::Builder::new();
            builder.prefix(TEMP_FILE_PREFIX).suffix(&suffix);

            let mut file = match &dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&data)?;
            file.flush()?;

            Ok(file.into_temp_path())
        })
        .await
        .map_err(|e| StagingError::TaskFailed(e.to_string()))??;

        Ok(Box::new(TempStagedAudio { path }))
    }
}
