// crates/backplane-core/src/core/value.rs
// ============================================================================
// Module: Backplane Stored Value
// Description: Opaque JSON payload stored under a partition key.
// Purpose: Preserve arbitrary-payload semantics behind an explicit sum type.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`StoredValue`] wraps [`serde_json::Value`], the tagged sum over null,
//! bool, number, string, array, and object. Absent keys read back as
//! [`StoredValue::null`]; the HTTP layer serializes that to a JSON `null`
//! body rather than an error status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Stored Value
// ============================================================================

/// Opaque JSON-serializable payload stored in a partition.
///
/// # Invariants
/// - Serializes transparently as the wrapped JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredValue(Value);

impl StoredValue {
    /// Wraps a JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the JSON `null` payload used for absent keys.
    #[must_use]
    pub const fn null() -> Self {
        Self(Value::Null)
    }

    /// Returns a borrowed view of the wrapped JSON value.
    #[must_use]
    pub const fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper and returns the JSON value.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Returns true when the payload is JSON `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Default for StoredValue {
    fn default() -> Self {
        Self::null()
    }
}
