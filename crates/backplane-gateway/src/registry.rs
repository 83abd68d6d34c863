// crates/backplane-gateway/src/registry.rs
// ============================================================================
// Module: Partition Store Registry
// Description: Lazy, cached partition store handles keyed by derived path.
// Purpose: Open each (application, content-type) database exactly once.
// Dependencies: backplane-core, backplane-store-sqlite
// ============================================================================

//! ## Overview
//! Every (application code, content type) pair maps to its own database file
//! under `<data_dir>/storage/`. The registry opens each file lazily on first
//! use and caches the handle for the life of the process. The cache key is
//! the full derived path, so two applications sharing a content-type label
//! never collide, and neither do two content types within one application.
//! Open failures surface as store errors for the affected partition only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;

use backplane_core::AppCode;
use backplane_core::ContentTypeTag;
use backplane_core::SharedBlobStore;
use backplane_core::StoreError;
use backplane_store_sqlite::SqliteBlobStore;
use backplane_store_sqlite::SqliteStoreConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory under the data dir holding partition databases.
pub const STORAGE_SUBDIR: &str = "storage";
/// File name of the credential database under the data dir.
pub const CREDENTIAL_DB_NAME: &str = "app-registry";

// ============================================================================
// SECTION: Derived Paths
// ============================================================================

/// Returns the credential database path under the data directory.
#[must_use]
pub fn credential_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CREDENTIAL_DB_NAME)
}

/// Reference to one (application, content-type) partition.
///
/// # Invariants
/// - `path` is fully derived: `<data_dir>/storage/-<app>-<TYPE>`.
/// - `content_type` is uppercased at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRef {
    /// Owning application code.
    pub app_code: AppCode,
    /// Normalized content-type label.
    pub content_type: ContentTypeTag,
    /// Derived database path for the partition.
    pub path: PathBuf,
}

impl PartitionRef {
    /// Derives the partition reference for an application and content type.
    #[must_use]
    pub fn derive(data_dir: &Path, app_code: AppCode, content_type: ContentTypeTag) -> Self {
        let file_name = format!("-{}-{}", app_code.as_str(), content_type.as_str());
        let path = data_dir.join(STORAGE_SUBDIR).join(file_name);
        Self {
            app_code,
            content_type,
            path,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Process-lifetime cache of open partition stores.
///
/// # Invariants
/// - At most one store handle exists per derived path.
/// - The lock is held only for cache lookups and inserts, never during
///   partition reads or writes.
pub struct PartitionRegistry {
    /// Open partition handles keyed by full derived path.
    stores: RwLock<HashMap<String, SharedBlobStore>>,
}

impl PartitionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the partition store, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the partition database cannot be opened;
    /// the failure affects this partition only.
    pub fn store_for(&self, partition: &PartitionRef) -> Result<SharedBlobStore, StoreError> {
        let cache_key = partition.path.display().to_string();
        {
            let guard = self
                .stores
                .read()
                .map_err(|_| StoreError::Unavailable("registry lock poisoned".to_string()))?;
            if let Some(store) = guard.get(&cache_key) {
                return Ok(store.clone());
            }
        }
        let mut guard = self
            .stores
            .write()
            .map_err(|_| StoreError::Unavailable("registry lock poisoned".to_string()))?;
        // Double-check: a concurrent request may have opened it meanwhile.
        if let Some(store) = guard.get(&cache_key) {
            return Ok(store.clone());
        }
        let opened = SqliteBlobStore::open(SqliteStoreConfig::for_path(&partition.path))
            .map_err(StoreError::from)?;
        let store = SharedBlobStore::from_store(opened);
        guard.insert(cache_key, store.clone());
        Ok(store)
    }

    /// Returns the number of open partitions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the registry lock is poisoned.
    pub fn open_count(&self) -> Result<usize, StoreError> {
        let guard = self
            .stores
            .read()
            .map_err(|_| StoreError::Unavailable("registry lock poisoned".to_string()))?;
        Ok(guard.len())
    }
}

impl Default for PartitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use std::path::Path;
    use std::sync::Arc;
    use std::thread;

    use backplane_core::AppCode;
    use backplane_core::ContentTypeTag;
    use backplane_core::StorageKey;
    use backplane_core::StoredValue;
    use serde_json::json;
    use tempfile::TempDir;

    use super::PartitionRef;
    use super::PartitionRegistry;
    use super::credential_db_path;

    #[test]
    fn derived_paths_follow_layout() {
        let partition = PartitionRef::derive(
            Path::new("/data"),
            AppCode::new("app_abc123"),
            ContentTypeTag::new("user"),
        );
        assert_eq!(partition.path, Path::new("/data/storage/-app_abc123-USER"));
        assert_eq!(credential_db_path(Path::new("/data")), Path::new("/data/app-registry"));
    }

    #[test]
    fn distinct_apps_and_types_derive_distinct_paths() {
        let base = Path::new("/data");
        let a = PartitionRef::derive(base, AppCode::new("app_a"), ContentTypeTag::new("user"));
        let b = PartitionRef::derive(base, AppCode::new("app_b"), ContentTypeTag::new("user"));
        let c = PartitionRef::derive(base, AppCode::new("app_a"), ContentTypeTag::new("audit"));
        assert_ne!(a.path, b.path);
        assert_ne!(a.path, c.path);
        assert_ne!(b.path, c.path);
    }

    #[test]
    fn store_for_caches_one_handle_per_path() {
        let dir = TempDir::new().expect("temp dir");
        let registry = PartitionRegistry::new();
        let partition = PartitionRef::derive(
            dir.path(),
            AppCode::new("app_abc"),
            ContentTypeTag::new("user"),
        );

        let first = registry.store_for(&partition).expect("open partition");
        first
            .set(&StorageKey::new("k"), &StoredValue::new(json!({"v": 1})))
            .expect("write");
        let second = registry.store_for(&partition).expect("cached partition");
        let loaded = second.get(&StorageKey::new("k")).expect("read").expect("present");
        assert_eq!(loaded.as_json(), &json!({"v": 1}));
        assert_eq!(registry.open_count().expect("count"), 1);
    }

    #[test]
    fn concurrent_access_opens_each_partition_once() {
        let dir = TempDir::new().expect("temp dir");
        let registry = Arc::new(PartitionRegistry::new());
        let partition = PartitionRef::derive(
            dir.path(),
            AppCode::new("app_abc"),
            ContentTypeTag::new("user"),
        );

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let partition = partition.clone();
            handles.push(thread::spawn(move || {
                registry.store_for(&partition).expect("open partition");
            }));
        }
        for handle in handles {
            handle.join().expect("thread join");
        }
        assert_eq!(registry.open_count().expect("count"), 1);
    }
}
