// crates/backplane-core/src/interfaces/mod.rs
// ============================================================================
// Module: Backplane Interfaces
// Description: Backend-agnostic store interfaces for credentials and blobs.
// Purpose: Define the contract surfaces implemented by durable backends.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Backplane integrates with durable storage without
//! embedding backend-specific details. Implementations fail closed: lookup
//! failures surface as errors, never as silent empty results. In-memory
//! implementations back unit tests and let the gateway be composed without a
//! filesystem.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::core::credentials::AppCredential;
use crate::core::identifiers::AppCode;
use crate::core::identifiers::StorageKey;
use crate::core::value::StoredValue;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store errors shared by credential and blob backends.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never embed stored payloads or API keys.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying engine cannot be opened or reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// An individual read operation failed.
    #[error("store read error: {0}")]
    Read(String),
    /// An individual write operation failed.
    #[error("store write error: {0}")]
    Write(String),
    /// Stored data is invalid for the requested operation.
    #[error("store invalid data: {0}")]
    Invalid(String),
    /// Stored data is corrupted or fails integrity checks.
    #[error("store corruption: {0}")]
    Corrupt(String),
}

// ============================================================================
// SECTION: Credential Store
// ============================================================================

/// Durable table mapping an application code to its credential record.
pub trait CredentialStore: Send + Sync {
    /// Loads a credential by application code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails; an absent record is
    /// `Ok(None)`.
    fn get(&self, app_code: &AppCode) -> Result<Option<AppCredential>, StoreError>;

    /// Persists a credential record (unconditional overwrite).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn set(&self, credential: &AppCredential) -> Result<(), StoreError>;

    /// Reports store readiness for liveness/readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared, cloneable handle to a credential store implementation.
///
/// # Invariants
/// - Clones share the same underlying store.
#[derive(Clone)]
pub struct SharedCredentialStore {
    /// Type-erased store implementation.
    inner: Arc<dyn CredentialStore>,
}

impl SharedCredentialStore {
    /// Wraps a concrete store implementation.
    #[must_use]
    pub fn from_store<S: CredentialStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Loads a credential by application code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    pub fn get(&self, app_code: &AppCode) -> Result<Option<AppCredential>, StoreError> {
        self.inner.get(app_code)
    }

    /// Persists a credential record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    pub fn set(&self, credential: &AppCredential) -> Result<(), StoreError> {
        self.inner.set(credential)
    }

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}

// ============================================================================
// SECTION: Blob Store
// ============================================================================

/// Durable key-value store for one (application, content-type) partition.
pub trait BlobStore: Send + Sync {
    /// Loads a value by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails; an absent key is
    /// `Ok(None)`.
    fn get(&self, key: &StorageKey) -> Result<Option<StoredValue>, StoreError>;

    /// Persists a value under a key (last write wins).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn set(&self, key: &StorageKey, value: &StoredValue) -> Result<(), StoreError>;

    /// Reports store readiness for liveness/readiness checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared, cloneable handle to a blob store implementation.
///
/// # Invariants
/// - Clones share the same underlying store.
#[derive(Clone)]
pub struct SharedBlobStore {
    /// Type-erased store implementation.
    inner: Arc<dyn BlobStore>,
}

impl SharedBlobStore {
    /// Wraps a concrete store implementation.
    #[must_use]
    pub fn from_store<S: BlobStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Loads a value by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    pub fn get(&self, key: &StorageKey) -> Result<Option<StoredValue>, StoreError> {
        self.inner.get(key)
    }

    /// Persists a value under a key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    pub fn set(&self, key: &StorageKey, value: &StoredValue) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}

// ============================================================================
// SECTION: In-Memory Stores
// ============================================================================

/// In-memory credential store for tests and composition.
///
/// # Invariants
/// - Records live for the lifetime of the store only.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    /// Credential records keyed by application code.
    records: Mutex<HashMap<String, AppCredential>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, app_code: &AppCode) -> Result<Option<AppCredential>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("credential store mutex poisoned".to_string()))?;
        Ok(guard.get(app_code.as_str()).cloned())
    }

    fn set(&self, credential: &AppCredential) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("credential store mutex poisoned".to_string()))?;
        guard.insert(credential.app_code.as_str().to_string(), credential.clone());
        Ok(())
    }
}

/// In-memory blob store for tests and composition.
///
/// # Invariants
/// - Values live for the lifetime of the store only.
#[derive(Default)]
pub struct InMemoryBlobStore {
    /// Values keyed by storage key.
    records: Mutex<HashMap<String, StoredValue>>,
}

impl InMemoryBlobStore {
    /// Creates an empty in-memory blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &StorageKey) -> Result<Option<StoredValue>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store mutex poisoned".to_string()))?;
        Ok(guard.get(key.as_str()).cloned())
    }

    fn set(&self, key: &StorageKey, value: &StoredValue) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store mutex poisoned".to_string()))?;
        guard.insert(key.as_str().to_string(), value.clone());
        Ok(())
    }
}
