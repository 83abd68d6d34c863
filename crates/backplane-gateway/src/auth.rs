// crates/backplane-gateway/src/auth.rs
// ============================================================================
// Module: Authorization Gate
// Description: Basic-auth credential verification against the credential store.
// Purpose: Decide allow/deny for protected routes without leaking existence.
// Dependencies: backplane-core, base64
// ============================================================================

//! ## Overview
//! The authorization gate verifies HTTP basic-auth credentials against the
//! credential store. The username is an application code and the password is
//! the application's API key. All failure modes deny: malformed headers,
//! empty credentials, unknown codes, key mismatches, and store lookup
//! failures. Denial responses are uniform so callers cannot learn whether an
//! application code exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use backplane_core::AppCode;
use backplane_core::SharedCredentialStore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::audit::AuthDecision;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Challenge value returned alongside 401 denials.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"backplane\"";
/// Header scheme prefix for basic authorization.
const BASIC_SCHEME_PREFIX: &str = "Basic ";

// ============================================================================
// SECTION: Header Parsing
// ============================================================================

/// Parsed basic-auth credentials.
///
/// # Invariants
/// - Fields hold the presented values verbatim; no normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Presented username (application code).
    pub username: String,
    /// Presented password (API key).
    pub password: String,
}

/// Parses an `Authorization` header value as basic-auth credentials.
///
/// Returns `None` for any malformed input: wrong scheme, invalid base64,
/// non-UTF-8 payload, or a payload without a `:` separator.
#[must_use]
pub fn parse_basic_credentials(header_value: &str) -> Option<BasicCredentials> {
    let encoded = header_value.strip_prefix(BASIC_SCHEME_PREFIX)?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

// ============================================================================
// SECTION: Authorization
// ============================================================================

/// Verifies presented credentials against the credential store.
///
/// Returns the decision for auditing; only [`AuthDecision::Allowed`] admits
/// the request. Lookup failures deny fail-closed.
#[must_use]
pub fn authorize(
    store: &SharedCredentialStore,
    username: &str,
    password: &str,
) -> AuthDecision {
    if username.is_empty() || password.is_empty() {
        return AuthDecision::DeniedEmptyCredentials;
    }
    let lookup = store.get(&AppCode::new(username));
    match lookup {
        Ok(Some(credential)) => {
            if credential.api_key == password {
                AuthDecision::Allowed
            } else {
                AuthDecision::DeniedKeyMismatch
            }
        }
        Ok(None) => AuthDecision::DeniedUnknownApp,
        Err(_) => AuthDecision::DeniedStoreFailure,
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

    use backplane_core::AppCode;
    use backplane_core::AppCredential;
    use backplane_core::CredentialStore;
    use backplane_core::InMemoryCredentialStore;
    use backplane_core::SharedCredentialStore;
    use backplane_core::StoreError;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;

    use super::AuthDecision;
    use super::authorize;
    use super::parse_basic_credentials;

    /// Credential store whose lookups always fail.
    struct FailingCredentialStore;

    impl CredentialStore for FailingCredentialStore {
        fn get(&self, _app_code: &AppCode) -> Result<Option<AppCredential>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn set(&self, _credential: &AppCredential) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    /// Builds a shared store holding one known credential.
    fn store_with(app_code: &str, api_key: &str) -> SharedCredentialStore {
        let store = InMemoryCredentialStore::new();
        store
            .set(&AppCredential::new(
                AppCode::new(app_code),
                api_key.to_string(),
                "gently golden falcon".to_string(),
            ))
            .expect("seed credential");
        SharedCredentialStore::from_store(store)
    }

    #[test]
    fn matching_credentials_are_allowed() {
        let store = store_with("app_abc", "secret-key");
        assert_eq!(authorize(&store, "app_abc", "secret-key"), AuthDecision::Allowed);
    }

    #[test]
    fn wrong_key_is_denied() {
        let store = store_with("app_abc", "secret-key");
        assert_eq!(authorize(&store, "app_abc", "wrong"), AuthDecision::DeniedKeyMismatch);
    }

    #[test]
    fn unknown_app_is_denied() {
        let store = store_with("app_abc", "secret-key");
        assert_eq!(authorize(&store, "app_other", "secret-key"), AuthDecision::DeniedUnknownApp);
    }

    #[test]
    fn empty_username_or_password_is_denied() {
        let store = store_with("app_abc", "secret-key");
        assert_eq!(authorize(&store, "", "secret-key"), AuthDecision::DeniedEmptyCredentials);
        assert_eq!(authorize(&store, "app_abc", ""), AuthDecision::DeniedEmptyCredentials);
        assert_eq!(authorize(&store, "", ""), AuthDecision::DeniedEmptyCredentials);
    }

    #[test]
    fn store_failure_denies_fail_closed() {
        let store = SharedCredentialStore::from_store(FailingCredentialStore);
        assert_eq!(authorize(&store, "app_abc", "secret-key"), AuthDecision::DeniedStoreFailure);
    }

    #[test]
    fn parse_accepts_well_formed_header() {
        let encoded = BASE64.encode("app_abc:se:cret");
        let parsed = parse_basic_credentials(&format!("Basic {encoded}")).expect("parse");
        assert_eq!(parsed.username, "app_abc");
        // Password keeps everything after the first separator.
        assert_eq!(parsed.password, "se:cret");
    }

    #[test]
    fn parse_rejects_malformed_headers() {
        assert!(parse_basic_credentials("Bearer abc").is_none());
        assert!(parse_basic_credentials("Basic not-base64!!!").is_none());
        let no_separator = BASE64.encode("app_abc");
        assert!(parse_basic_credentials(&format!("Basic {no_separator}")).is_none());
        let not_utf8 = BASE64.encode([0xFF_u8, 0xFE, 0x3A, 0x41]);
        assert!(parse_basic_credentials(&format!("Basic {not_utf8}")).is_none());
    }
}
