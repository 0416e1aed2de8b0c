mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    DEFAULT_MODEL, LoggingSettings, ReplicateSettings, ServerSettings, Settings, StorageSettings,
};
