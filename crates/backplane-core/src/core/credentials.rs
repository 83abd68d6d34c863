// crates/backplane-core/src/core/credentials.rs
// ============================================================================
// Module: Backplane Application Credentials
// Description: Credential record issued to registered applications.
// Purpose: Model the (app code, API key) identity persisted by the gateway.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`AppCredential`] is created exactly once per application at
//! registration (or by bootstrap for the root identity) and is never mutated
//! or deleted afterwards. The wire shape uses camelCase field names so
//! registration responses match the published HTTP surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AppCode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Application code reserved for the root identity created by bootstrap.
pub const ROOT_APP_CODE: &str = "__ROOT__";

/// Content-type partition every new application is initialized with.
pub const DEFAULT_CONTENT_TYPE: &str = "user";

/// Returns the content-type list assigned to freshly issued credentials.
#[must_use]
pub fn default_content_types() -> Vec<String> {
    vec![DEFAULT_CONTENT_TYPE.to_string()]
}

// ============================================================================
// SECTION: Credential Record
// ============================================================================

/// Credential record for a registered application.
///
/// # Invariants
/// - `app_code` and `api_key` are generated once and never rotated in place.
/// - `content_types` is initialized to `["user"]`; no operation mutates it.
/// - Exactly one record with `app_code == "__ROOT__"` exists after bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredential {
    /// Globally unique application identifier.
    pub app_code: AppCode,
    /// Secret bearer token presented as the basic-auth password.
    pub api_key: String,
    /// Human-readable label.
    pub title: String,
    /// Declared content-type partitions (not enforced against requests).
    pub content_types: Vec<String>,
}

impl AppCredential {
    /// Creates a credential with the default content-type list.
    #[must_use]
    pub fn new(app_code: AppCode, api_key: String, title: String) -> Self {
        Self {
            app_code,
            api_key,
            title,
            content_types: default_content_types(),
        }
    }

    /// Creates the root credential synthesized by bootstrap.
    #[must_use]
    pub fn root(api_key: String) -> Self {
        Self::new(
            AppCode::new(ROOT_APP_CODE),
            api_key,
            ROOT_APP_CODE.to_string(),
        )
    }

    /// Returns true when this is the bootstrap root credential.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.app_code.as_str() == ROOT_APP_CODE
    }
}
