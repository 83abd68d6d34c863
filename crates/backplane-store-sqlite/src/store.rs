// crates/backplane-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Credential and Blob Stores
// Description: Durable key-value tables backed by SQLite WAL.
// Purpose: Persist credential records and partition blobs as JSON payloads.
// Dependencies: backplane-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements the [`CredentialStore`] and [`BlobStore`] seams on
//! top of `SQLite`. Each store owns one database file and one mutex-guarded
//! connection; `SQLite` provides per-key write linearization, and last write
//! wins within a key. Payloads are stored as JSON text and fail closed on
//! parse errors when read back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use backplane_core::AppCode;
use backplane_core::AppCredential;
use backplane_core::BlobStore;
use backplane_core::CredentialStore;
use backplane_core::StorageKey;
use backplane_core::StoreError;
use backplane_core::StoredValue;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for a `SQLite`-backed store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a configuration with defaults for the given database path.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding stored payloads or API keys.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) | SqliteStoreError::Db(message) => {
                Self::Unavailable(message)
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Credential Store
// ============================================================================

/// `SQLite`-backed credential store.
///
/// # Invariants
/// - Reads fail closed: unparsable records surface as [`StoreError::Corrupt`].
/// - Connection access is serialized through a mutex.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    /// Opens a `SQLite`-backed credential store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(&config)?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS app_credentials (
                    app_code TEXT PRIMARY KEY,
                    record_json TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn get(&self, app_code: &AppCode) -> Result<Option<AppCredential>, StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("credential store mutex poisoned".to_string()))?;
        let row: Option<String> = guard
            .query_row(
                "SELECT record_json FROM app_credentials WHERE app_code = ?1",
                params![app_code.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| StoreError::Read(err.to_string()))?;
        drop(guard);
        let Some(record_json) = row else {
            return Ok(None);
        };
        let credential: AppCredential = serde_json::from_str(&record_json)
            .map_err(|err| StoreError::Corrupt(format!("credential record unreadable: {err}")))?;
        Ok(Some(credential))
    }

    fn set(&self, credential: &AppCredential) -> Result<(), StoreError> {
        let record_json = serde_json::to_string(credential)
            .map_err(|err| StoreError::Invalid(err.to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("credential store mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO app_credentials (app_code, record_json, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(app_code) DO UPDATE SET
                     record_json = excluded.record_json,
                     updated_at = excluded.updated_at",
                params![credential.app_code.as_str(), record_json, unix_millis()],
            )
            .map_err(|err| StoreError::Write(err.to_string()))?;
        Ok(())
    }

    fn readiness(&self) -> Result<(), StoreError> {
        check_connection(&self.connection)
    }
}

// ============================================================================
// SECTION: Blob Store
// ============================================================================

/// `SQLite`-backed blob store for one partition.
///
/// # Invariants
/// - One database file per (application, content-type) derived path.
/// - Connection access is serialized through a mutex.
#[derive(Clone)]
pub struct SqliteBlobStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteBlobStore {
    /// Opens a `SQLite`-backed blob store rooted at the derived path.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(&config)?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS blobs (
                    key TEXT PRIMARY KEY,
                    value_json TEXT NOT NULL,
                    saved_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &StorageKey) -> Result<Option<StoredValue>, StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store mutex poisoned".to_string()))?;
        let row: Option<String> = guard
            .query_row(
                "SELECT value_json FROM blobs WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| StoreError::Read(err.to_string()))?;
        drop(guard);
        let Some(value_json) = row else {
            return Ok(None);
        };
        let value: StoredValue = serde_json::from_str(&value_json)
            .map_err(|err| StoreError::Corrupt(format!("blob payload unreadable: {err}")))?;
        Ok(Some(value))
    }

    fn set(&self, key: &StorageKey, value: &StoredValue) -> Result<(), StoreError> {
        let value_json =
            serde_json::to_string(value).map_err(|err| StoreError::Invalid(err.to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO blobs (key, value_json, saved_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value_json = excluded.value_json,
                     saved_at = excluded.saved_at",
                params![key.as_str(), value_json, unix_millis()],
            )
            .map_err(|err| StoreError::Write(err.to_string()))?;
        Ok(())
    }

    fn readiness(&self) -> Result<(), StoreError> {
        check_connection(&self.connection)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Verifies the connection can execute a simple SQL statement.
fn check_connection(connection: &Arc<Mutex<Connection>>) -> Result<(), StoreError> {
    let guard = connection
        .lock()
        .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
    guard
        .query_row("SELECT 1", [], |_| Ok(()))
        .map_err(|err| StoreError::Unavailable(err.to_string()))
}

/// Opens a connection with durability pragmas applied.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Ensures the parent directory of a store path exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Returns wall-clock unix milliseconds for write timestamps.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
