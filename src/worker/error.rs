//! Worker-specific error types.

use std::io;
use thiserror::Error;

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors that can occur during worker communication.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Failed to spawn the worker process.
    #[error("failed to spawn worker process: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Worker binary could not be located.
    #[error("worker binary not found: set [worker] path in schemadoc.toml")]
    NotFound,

    #[error("failed to write to worker: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Request timed out waiting for response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Response channel was closed (worker went away).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// Worker returned an error response.
    #[error("worker error: {message} (code: {code})")]
    Remote { code: String, message: String },

    #[error("database driver not found: {0}")]
    DriverNotFound(String),

    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),
}

impl WorkerError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a worker error code onto a variant.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "DRIVER_NOT_FOUND" => Self::DriverNotFound(message.to_string()),
            "CONNECTION_FAILED" => Self::ConnectionFailed(message.to_string()),
            "LOGIN_FAILED" => Self::LoginFailed(message.to_string()),
            "INVALID_REQUEST" => Self::InvalidRequest(message.to_string()),
            "METHOD_NOT_FOUND" => Self::MethodNotFound(message.to_string()),
            _ => Self::remote(code, message),
        }
    }

    /// Whether the database itself could not be reached or logged into.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Self::SpawnFailed(_)
                | Self::NotFound
                | Self::DriverNotFound(_)
                | Self::ConnectionFailed(_)
                | Self::LoginFailed(_)
        )
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for WorkerError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
