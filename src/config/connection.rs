//! Database connection parameters and credentials.
//!
//! Supports configuration via environment variables:
//! - `SCHEMADOC_DB_HOST`: SQL Server hostname
//! - `SCHEMADOC_DB_PORT`: Port (optional, defaults to 1433)
//! - `SCHEMADOC_DB_NAME`: Database name
//! - `SCHEMADOC_DB_USER`: Login name
//! - `SCHEMADOC_DB_PASSWORD`: Password (read separately as [`Credentials`])

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default SQL Server port.
pub const DEFAULT_PORT: u16 = 1433;

/// Application name reported to the server.
const APP_NAME: &str = "schemadoc";

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Where to connect. Secrets live in [`Credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Login name.
    pub username: String,
}

/// Secret half of a connection. `Debug` never prints the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    pub fn new(password: Option<String>) -> Self {
        Self { password }
    }

    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }

    /// Read the password from `SCHEMADOC_DB_PASSWORD` (absent is allowed).
    pub fn from_env() -> Self {
        Self {
            password: env::var("SCHEMADOC_DB_PASSWORD").ok(),
        }
    }
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
        }
    }

    /// Load connection parameters from environment variables.
    ///
    /// Required: `SCHEMADOC_DB_HOST`, `SCHEMADOC_DB_NAME`, `SCHEMADOC_DB_USER`.
    /// Optional: `SCHEMADOC_DB_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &str| {
            env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
        };

        let host = required("SCHEMADOC_DB_HOST")?;
        let database = required("SCHEMADOC_DB_NAME")?;
        let username = required("SCHEMADOC_DB_USER")?;

        let port = match env::var("SCHEMADOC_DB_PORT") {
            Ok(p) => p.parse().map_err(|_| ConfigError::InvalidPort(p))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            database,
            username,
        })
    }

    /// Build the SQL Server connection string handed to the worker.
    pub fn to_connection_string(&self, credentials: &Credentials) -> String {
        let mut params = vec![
            format!("database={}", self.database),
            format!("user id={}", self.username),
        ];
        if let Some(password) = &credentials.password {
            params.push(format!("password={}", password));
        }
        params.push("encrypt=false".to_string());
        params.push("trustservercertificate=true".to_string());
        params.push(format!("app name={}", APP_NAME));

        format!("sqlserver://{}:{}?{}", self.host, self.port, params.join("&"))
    }

    /// Connection string with the password masked, for logs.
    pub fn display_string(&self) -> String {
        format!(
            "sqlserver://{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }
}
