// crates/backplane-core/tests/credentials.rs
// ============================================================================
// Module: Credential Model Tests
// Description: Wire shape and construction invariants for credentials.
// Purpose: Keep the registration response shape stable.
// ============================================================================

//! Unit tests for the application credential record.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use backplane_core::AppCode;
use backplane_core::AppCredential;
use backplane_core::ContentTypeTag;
use backplane_core::ROOT_APP_CODE;
use serde_json::json;

#[test]
fn new_credentials_start_with_the_user_partition() {
    let credential = AppCredential::new(
        AppCode::new("app_x"),
        "secret".to_string(),
        "quiet amber heron".to_string(),
    );
    assert_eq!(credential.content_types, vec!["user".to_string()]);
    assert!(!credential.is_root());
}

#[test]
fn root_credential_uses_the_reserved_code() {
    let credential = AppCredential::root("secret".to_string());
    assert_eq!(credential.app_code.as_str(), ROOT_APP_CODE);
    assert_eq!(credential.title, ROOT_APP_CODE);
    assert!(credential.is_root());
}

#[test]
fn wire_shape_is_camel_case() {
    let credential = AppCredential::new(
        AppCode::new("app_x"),
        "secret".to_string(),
        "title".to_string(),
    );
    let encoded = serde_json::to_value(&credential).expect("serialize");
    assert_eq!(
        encoded,
        json!({
            "appCode": "app_x",
            "apiKey": "secret",
            "title": "title",
            "contentTypes": ["user"],
        })
    );
}

#[test]
fn content_type_tags_normalize_to_uppercase() {
    assert_eq!(ContentTypeTag::new("user").as_str(), "USER");
    assert_eq!(ContentTypeTag::new("User").as_str(), "USER");
    assert_eq!(ContentTypeTag::new("USER").as_str(), "USER");
}
