// crates/backplane-core/src/core/identifiers.rs
// ============================================================================
// Module: Backplane Identifiers
// Description: Canonical opaque identifiers for applications, partitions, and keys.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Backplane.
//! Identifiers are opaque strings on the wire. [`ContentTypeTag`] is the only
//! normalizing type: it uppercases its input at construction so the derived
//! partition path is stable regardless of request casing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Application identifier issued at registration.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppCode(String);

impl AppCode {
    /// Creates a new application code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AppCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AppCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Normalized content-type partition label.
///
/// # Invariants
/// - Always uppercase; construction uppercases the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypeTag(String);

impl ContentTypeTag {
    /// Creates a normalized content-type tag from a raw path parameter.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().to_ascii_uppercase())
    }

    /// Returns the normalized tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ContentTypeTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentTypeTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Storage key within a partition.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Creates a new storage key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StorageKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StorageKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
