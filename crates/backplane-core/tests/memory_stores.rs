// crates/backplane-core/tests/memory_stores.rs
// ============================================================================
// Module: In-Memory Store Tests
// Description: Contract tests for the reference store implementations.
// Purpose: Pin down the semantics durable backends must match.
// ============================================================================

//! Unit tests for the in-memory credential and blob stores.

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
use backplane_core::InMemoryBlobStore;
use backplane_core::InMemoryCredentialStore;
use backplane_core::SharedBlobStore;
use backplane_core::SharedCredentialStore;
use backplane_core::StorageKey;
use backplane_core::StoredValue;
use serde_json::json;

#[test]
fn credential_round_trip_and_overwrite() {
    let store = SharedCredentialStore::from_store(InMemoryCredentialStore::new());
    let code = AppCode::new("app_x");
    assert!(store.get(&code).expect("get").is_none());

    let first = AppCredential::new(code.clone(), "k1".to_string(), "one".to_string());
    store.set(&first).expect("set");
    assert_eq!(store.get(&code).expect("get"), Some(first));

    let second = AppCredential::new(code.clone(), "k2".to_string(), "two".to_string());
    store.set(&second).expect("set");
    assert_eq!(store.get(&code).expect("get"), Some(second));
}

#[test]
fn blob_round_trip_last_write_wins() {
    let store = SharedBlobStore::from_store(InMemoryBlobStore::new());
    let key = StorageKey::new("USER_abc");
    assert!(store.get(&key).expect("get").is_none());

    store.set(&key, &StoredValue::new(json!({"n": 1}))).expect("set");
    store.set(&key, &StoredValue::new(json!({"n": 2}))).expect("set");
    let value = store.get(&key).expect("get").expect("present");
    assert_eq!(value.as_json(), &json!({"n": 2}));
}

#[test]
fn keys_do_not_interfere() {
    let store = SharedBlobStore::from_store(InMemoryBlobStore::new());
    store
        .set(&StorageKey::new("a"), &StoredValue::new(json!(1)))
        .expect("set");
    store
        .set(&StorageKey::new("b"), &StoredValue::new(json!(2)))
        .expect("set");
    let a = store.get(&StorageKey::new("a")).expect("get").expect("present");
    let b = store.get(&StorageKey::new("b")).expect("get").expect("present");
    assert_eq!(a.as_json(), &json!(1));
    assert_eq!(b.as_json(), &json!(2));
}

#[test]
fn readiness_defaults_to_ok() {
    let credentials = SharedCredentialStore::from_store(InMemoryCredentialStore::new());
    let blobs = SharedBlobStore::from_store(InMemoryBlobStore::new());
    credentials.readiness().expect("ready");
    blobs.readiness().expect("ready");
}
