// crates/backplane-gateway/src/bootstrap.rs
// ============================================================================
// Module: Root Credential Bootstrap
// Description: Idempotent creation of the root application credential.
// Purpose: Guarantee a root record exists before the listener is bound.
// Dependencies: backplane-core, thiserror
// ============================================================================

//! ## Overview
//! Bootstrap runs exactly once at startup, before the gateway binds its
//! listener. It reads the root credential and, when absent, synthesizes one
//! with a freshly generated API key and persists it. An existing root record
//! is never touched, so the root key survives restarts. Any failure here is
//! fatal: the process must not serve traffic without a root credential.

// ============================================================================
// SECTION: Imports
// ============================================================================

use backplane_core::AppCode;
use backplane_core::AppCredential;
use backplane_core::RandomSourceError;
use backplane_core::SharedCredentialStore;
use backplane_core::StoreError;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Bootstrap errors (fatal at startup).
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The OS random source failed while generating the root key.
    #[error("root key generation failed: {0}")]
    Random(#[from] RandomSourceError),
    /// The credential store rejected the read or write.
    #[error("root credential store access failed: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Ensures the root credential exists, creating it when absent.
///
/// Returns the root credential, freshly created or pre-existing.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the store cannot be read or written, or
/// when key generation fails.
pub fn ensure_root(store: &SharedCredentialStore) -> Result<AppCredential, BootstrapError> {
    let root_code = AppCode::new(backplane_core::ROOT_APP_CODE);
    if let Some(existing) = store.get(&root_code)? {
        return Ok(existing);
    }
    let credential = AppCredential::root(backplane_core::generate_auth_token()?);
    store.set(&credential)?;
    Ok(credential)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
