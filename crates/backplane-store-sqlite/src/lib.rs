// crates/backplane-store-sqlite/src/lib.rs
// ============================================================================
// Module: Backplane SQLite Store Library
// Description: Durable CredentialStore and BlobStore backed by SQLite.
// Purpose: Persist credentials and blob partitions under derived paths.
// Dependencies: backplane-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `SQLite`-backed implementations of the Backplane store interfaces. One
//! database file holds the credential table; each (application,
//! content-type) partition is its own database file under the derived path,
//! so partition isolation is enforced by the filesystem layout itself.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteBlobStore;
pub use store::SqliteCredentialStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
