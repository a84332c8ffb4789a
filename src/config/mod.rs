//! Configuration module.
//!
//! Handles connection parameters, credentials, and the TOML settings file.

mod connection;
mod settings;

pub use connection::{ConfigError, ConnectionParams, Credentials, DEFAULT_PORT};
pub use settings::{
    expand_env_vars, MetadataSettings, ProfileSettings, Settings, SettingsError, WorkerSettings,
};
