//! TOML-based configuration.
//!
//! Supports a config file (schemadoc.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [profiles.prod]
//! name = "Production"
//! host = "sql01.internal"
//! port = 1433
//! database = "sales"
//! username = "reader"
//! password = "${PROD_DB_PASSWORD}"
//!
//! [worker]
//! path = "/usr/local/bin/schemadoc-worker"
//! timeout_seconds = 60
//!
//! [metadata]
//! default_schema = "dbo"
//! cache_enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::{ConnectionParams, Credentials, DEFAULT_PORT};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Connection profiles keyed by profile id.
    pub profiles: BTreeMap<String, ProfileSettings>,

    /// Worker configuration.
    pub worker: WorkerSettings,

    /// Metadata configuration.
    pub metadata: MetadataSettings,
}

/// One saved connection profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileSettings {
    /// Display name (defaults to the profile id).
    #[serde(default)]
    pub name: Option<String>,

    pub host: String,

    #[serde(default)]
    pub port: Option<u16>,

    pub database: String,

    pub username: String,

    /// Password (supports ${ENV_VAR} expansion). Absent means "ask" or use
    /// the encrypted password stored in the cache.
    #[serde(default)]
    pub password: Option<String>,

    /// Schema assumed for objects the catalog reports without one.
    #[serde(default)]
    pub default_schema: Option<String>,
}

impl ProfileSettings {
    /// Connection parameters for this profile.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(
            &self.host,
            self.port.unwrap_or(DEFAULT_PORT),
            &self.database,
            &self.username,
        )
    }

    /// Credentials with environment variables expanded.
    pub fn credentials(&self) -> Result<Credentials, SettingsError> {
        let password = self.password.as_deref().map(expand_env_vars).transpose()?;
        Ok(Credentials::new(password))
    }
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Path to the catalog worker binary.
    pub path: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout_seconds: 30,
        }
    }
}

/// Metadata configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Schema name used when the catalog reports none.
    pub default_schema: String,

    /// Persist snapshots in the local cache.
    pub cache_enabled: bool,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            default_schema: "dbo".to_string(),
            cache_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCHEMADOC_CONFIG`
    /// 2. `./schemadoc.toml`
    /// 3. `~/.config/schemadoc/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SCHEMADOC_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("schemadoc.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schemadoc").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a profile by id.
    pub fn profile(&self, id: &str) -> Result<&ProfileSettings, SettingsError> {
        self.profiles
            .get(id)
            .ok_or_else(|| SettingsError::ProfileNotFound(id.to_string()))
    }

    /// Default schema for a profile, falling back to `[metadata]`.
    pub fn default_schema_for(&self, profile: &ProfileSettings) -> String {
        profile
            .default_schema
            .clone()
            .unwrap_or_else(|| self.metadata.default_schema.clone())
    }

    /// Configured worker binary path, with environment variables expanded.
    pub fn worker_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.worker
            .path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced && ch == '}' {
                chars.next();
                break;
            }
            if !braced && !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            var_name.push(ch);
            chars.next();
        }

        if var_name.is_empty() && !braced {
            result.push('$');
            continue;
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
