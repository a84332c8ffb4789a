//! SQLite-backed snapshot storage.
//!
//! Stores one JSON snapshot document per connection profile, plus the
//! encrypted password remembered for each profile. The database lives at
//! `<data_dir>/schemadoc/cache.db`.
//!
//! # Design
//!
//! - One row per profile; a save replaces the previous snapshot wholesale
//! - No TTL: a snapshot stays until the next successful fetch
//! - Versioned: the store is cleared when [`CACHE_VERSION`] changes

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::crypto::{CryptoError, MasterKey};
use crate::metadata::MetadataSnapshot;

/// Current cache schema version. Bump this when the snapshot format changes.
pub const CACHE_VERSION: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to determine cache directory")]
    NoCacheDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Cache lock poisoned")]
    Poisoned,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Load/save pair for snapshots, keyed by profile id.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, profile_id: &str) -> CacheResult<Option<MetadataSnapshot>>;

    /// Replace the stored snapshot for `snapshot.profile_id`.
    fn save(&self, snapshot: &MetadataSnapshot) -> CacheResult<()>;
}

/// Summary of a stored snapshot, without the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub profile_id: String,
    pub fetched_at: String,
    pub content_hash: String,
}

/// SQLite snapshot store.
pub struct SnapshotCache {
    conn: Mutex<Connection>,
}

impl SnapshotCache {
    /// Open or create the cache database at the default path.
    pub fn open() -> CacheResult<Self> {
        let path = Self::cache_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(&path)?)
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> CacheResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Path to the cache database.
    pub fn cache_path() -> CacheResult<PathBuf> {
        let base = dirs::data_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(base.join("schemadoc").join("cache.db"))
    }

    fn from_connection(conn: Connection) -> CacheResult<Self> {
        init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> CacheResult<T>) -> CacheResult<T> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        f(&conn)
    }

    /// Stored snapshots, most recent first.
    pub fn list(&self) -> CacheResult<Vec<StoredSnapshot>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT profile_id, fetched_at, content_hash FROM snapshots ORDER BY fetched_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(StoredSnapshot {
                        profile_id: row.get(0)?,
                        fetched_at: row.get(1)?,
                        content_hash: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete the stored snapshot for a profile.
    pub fn delete(&self, profile_id: &str) -> CacheResult<bool> {
        self.with_conn(|conn| {
            let rows = conn.execute(
                "DELETE FROM snapshots WHERE profile_id = ?",
                params![profile_id],
            )?;
            Ok(rows > 0)
        })
    }

    // ===== Saved passwords =====

    /// Encrypt and store a profile's password.
    pub fn save_password(
        &self,
        key: &MasterKey,
        profile_id: &str,
        password: &str,
    ) -> CacheResult<()> {
        let sealed = key.seal(password)?;
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO credentials (profile_id, password_encrypted, updated_at)
                 VALUES (?, ?, ?)",
                params![profile_id, sealed, now],
            )?;
            Ok(())
        })
    }

    /// Decrypt a profile's stored password.
    ///
    /// An entry that no longer opens with `key` (for example after an
    /// ephemeral key changed) is deleted and reported as absent.
    pub fn load_password(&self, key: &MasterKey, profile_id: &str) -> CacheResult<Option<String>> {
        let sealed: Option<String> = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT password_encrypted FROM credentials WHERE profile_id = ?",
                    params![profile_id],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        let Some(sealed) = sealed else {
            return Ok(None);
        };

        match key.open(&sealed) {
            Ok(password) => Ok(Some(password)),
            Err(e) => {
                tracing::warn!(profile_id, error = %e, "dropping unreadable saved password");
                self.delete_password(profile_id)?;
                Ok(None)
            }
        }
    }

    pub fn delete_password(&self, profile_id: &str) -> CacheResult<bool> {
        self.with_conn(|conn| {
            let rows = conn.execute(
                "DELETE FROM credentials WHERE profile_id = ?",
                params![profile_id],
            )?;
            Ok(rows > 0)
        })
    }
}

impl SnapshotStore for SnapshotCache {
    fn load(&self, profile_id: &str) -> CacheResult<Option<MetadataSnapshot>> {
        let document: Option<String> = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT document FROM snapshots WHERE profile_id = ?",
                    params![profile_id],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        match document {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &MetadataSnapshot) -> CacheResult<()> {
        let document = serde_json::to_string(snapshot)?;
        let hash = snapshot.content_hash()?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO snapshots (profile_id, fetched_at, content_hash, document)
                 VALUES (?, ?, ?, ?)",
                params![
                    snapshot.profile_id,
                    snapshot.fetched_at.to_rfc3339(),
                    hash,
                    document
                ],
            )?;
            Ok(())
        })
    }
}

/// Create tables and reset the store on a version mismatch.
fn init(conn: &Connection) -> CacheResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS snapshots (
            profile_id TEXT PRIMARY KEY,
            fetched_at TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            document TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS credentials (
            profile_id TEXT PRIMARY KEY,
            password_encrypted TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )?;

    let stored_version: Option<i32> = conn
        .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
            let s: String = row.get(0)?;
            Ok(s.parse().unwrap_or(0))
        })
        .optional()?;

    match stored_version {
        Some(v) if v == CACHE_VERSION => {}
        Some(v) => {
            tracing::info!(
                from = v,
                to = CACHE_VERSION,
                "cache version changed, clearing snapshots"
            );
            conn.execute("DELETE FROM snapshots", [])?;
            set_version(conn)?;
        }
        None => set_version(conn)?,
    }

    Ok(())
}

fn set_version(conn: &Connection) -> CacheResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
        params![CACHE_VERSION.to_string()],
    )?;
    Ok(())
}
