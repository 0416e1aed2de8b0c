use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, Source};
use serde::Deserialize;

use super::Environment;
use crate::infrastructure::audio::{DEFAULT_INLINE_AUDIO_LIMIT, DEFAULT_REPLICATE_BASE_URL};

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";
const REPLICATE_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

pub const DEFAULT_MODEL: &str =
    "openai/whisper:4d50797290df275329f202e48c76360b3f22b08d28c196cbc54600319435f8d2";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub replicate: ReplicateSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct ReplicateSettings {
    pub api_token: String,
    pub base_url: String,
    pub model: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub inline_audio_max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub temp_dir: Option<String>,
    pub default_suffix: String,
    pub max_upload_size_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers defaults, `appsettings.<env>` (optional), `APP_*` variables and
    /// `REPLICATE_API_TOKEN`, in increasing precedence.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        build(
            File::with_name(&environment.settings_file()).required(false),
            std::env::vars().collect(),
        )
    }

    /// Builds settings from defaults plus a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::from_toml_with_vars(contents, HashMap::new())
    }

    /// Same layering as [`Settings::load`], with the TOML document standing in
    /// for the settings file and `vars` for the process environment.
    pub fn from_toml_with_vars(
        contents: &str,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        build(File::from_str(contents, FileFormat::Toml), vars)
    }
}

fn build<S>(file: S, vars: HashMap<String, String>) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let token_override = vars.get(REPLICATE_TOKEN_VAR).cloned();

    with_defaults(Config::builder())?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(Some(vars)),
        )
        .set_override_option("replicate.api_token", token_override)?
        .build()?
        .try_deserialize()
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5100_i64)?
        .set_default("replicate.api_token", "")?
        .set_default("replicate.base_url", DEFAULT_REPLICATE_BASE_URL)?
        .set_default("replicate.model", DEFAULT_MODEL)?
        .set_default("replicate.poll_interval_ms", 1000_i64)?
        .set_default("replicate.request_timeout_secs", 120_i64)?
        .set_default(
            "replicate.inline_audio_max_bytes",
            DEFAULT_INLINE_AUDIO_LIMIT as i64,
        )?
        .set_default("storage.default_suffix", ".webm")?
        .set_default("storage.max_upload_size_bytes", 104_857_600_i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.enable_json", false)
}

impl ReplicateSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for ReplicateSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateSettings")
            .field("api_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("inline_audio_max_bytes", &self.inline_audio_max_bytes)
            .finish()
    }
}

impl StorageSettings {
    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.temp_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}
