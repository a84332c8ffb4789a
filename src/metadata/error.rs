//! Fetch error taxonomy.

use thiserror::Error;

use super::catalog::CatalogError;
use crate::cache::CacheError;

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The connection could not be opened.
    #[error("connection failed: {0}")]
    Connection(#[source] CatalogError),

    /// A catalog query failed after the connection was open.
    #[error("introspection failed: {0}")]
    Introspection(#[source] CatalogError),

    /// The snapshot was fetched but could not be stored.
    #[error("failed to store snapshot: {0}")]
    Storage(#[from] CacheError),

    /// Another fetch for the same profile is running.
    #[error("a fetch for profile '{0}' is already in progress")]
    AlreadyInProgress(String),
}

impl FetchError {
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether the underlying cause was an unreachable database or a
    /// rejected login, whichever stage it surfaced in.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Connection(e) | Self::Introspection(e) => e.is_connection_failure(),
            Self::Storage(_) | Self::AlreadyInProgress(_) => false,
        }
    }
}
