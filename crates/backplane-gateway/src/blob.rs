// crates/backplane-gateway/src/blob.rs
// ============================================================================
// Module: Blob Access Layer
// Description: Partition-scoped read/write operations for stored values.
// Purpose: Resolve call context from path parameters and touch the store.
// Dependencies: backplane-core
// ============================================================================

//! ## Overview
//! The blob access layer turns request path parameters into a call context
//! (application code, normalized content type, storage key, derived partition
//! path) and performs the read or write. Absent keys read as JSON `null`;
//! genuine store failures propagate to the caller. The keyless write route
//! generates a fresh key named after the content type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use backplane_core::AppCode;
use backplane_core::ContentTypeTag;
use backplane_core::ID_LENGTH;
use backplane_core::RandomSourceError;
use backplane_core::StorageKey;
use backplane_core::StoreError;
use backplane_core::StoredValue;
use backplane_core::generate_id;

use crate::registry::PartitionRef;
use crate::registry::PartitionRegistry;

// ============================================================================
// SECTION: Call Context
// ============================================================================

/// Resolved context for one storage operation.
///
/// # Invariants
/// - `partition.content_type` is uppercased.
/// - `key` is either caller-supplied or server-generated.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Target partition.
    pub partition: PartitionRef,
    /// Storage key within the partition.
    pub key: StorageKey,
}

impl CallContext {
    /// Builds a context for a caller-supplied key.
    #[must_use]
    pub fn keyed(
        data_dir: &Path,
        app_code: impl Into<AppCode>,
        content_type: impl Into<String>,
        key: impl Into<StorageKey>,
    ) -> Self {
        let partition =
            PartitionRef::derive(data_dir, app_code.into(), ContentTypeTag::new(content_type));
        Self {
            partition,
            key: key.into(),
        }
    }

    /// Builds a context with a server-generated key.
    ///
    /// The key is prefixed with the normalized content type, so generated
    /// keys are recognizable within a partition.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] when the OS random source fails.
    pub fn keyless(
        data_dir: &Path,
        app_code: impl Into<AppCode>,
        content_type: impl Into<String>,
    ) -> Result<Self, RandomSourceError> {
        let tag = ContentTypeTag::new(content_type);
        let key = generate_id(tag.as_str(), ID_LENGTH)?;
        let partition = PartitionRef::derive(data_dir, app_code.into(), tag);
        Ok(Self {
            partition,
            key: StorageKey::new(key),
        })
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Reads the value under the context's key.
///
/// Absent keys yield [`StoredValue::null`]; only genuine store failures
/// surface as errors.
///
/// # Errors
///
/// Returns [`StoreError`] when the partition cannot be opened or the read
/// fails.
pub fn read(registry: &PartitionRegistry, context: &CallContext) -> Result<StoredValue, StoreError> {
    let store = registry.store_for(&context.partition)?;
    let value = store.get(&context.key)?;
    Ok(value.unwrap_or_else(StoredValue::null))
}

/// Writes the value under the context's key (last write wins).
///
/// # Errors
///
/// Returns [`StoreError`] when the partition cannot be opened or the write
/// fails.
pub fn write(
    registry: &PartitionRegistry,
    context: &CallContext,
    value: &StoredValue,
) -> Result<(), StoreError> {
    let store = registry.store_for(&context.partition)?;
    store.set(&context.key, value)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
