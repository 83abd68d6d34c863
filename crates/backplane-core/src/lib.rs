// crates/backplane-core/src/lib.rs
// ============================================================================
// Module: Backplane Core Library
// Description: Identity generation, credential model, and store interfaces.
// Purpose: Define the backend-agnostic building blocks of the blob gateway.
// Dependencies: rand, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Backplane Core defines the typed identifiers, the application credential
//! model, the opaque stored-value model, and the [`CredentialStore`] /
//! [`BlobStore`] seams that durable backends implement. In-memory reference
//! implementations are provided for tests and composition.
//!
//! Security posture: credential records carry long-lived API keys; callers
//! must never log or echo `api_key` values outside the issuance response.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::credentials::AppCredential;
pub use self::core::credentials::DEFAULT_CONTENT_TYPE;
pub use self::core::credentials::ROOT_APP_CODE;
pub use self::core::credentials::default_content_types;
pub use self::core::identifiers::AppCode;
pub use self::core::identifiers::ContentTypeTag;
pub use self::core::identifiers::StorageKey;
pub use self::core::identity::AUTH_TOKEN_LENGTH;
pub use self::core::identity::ID_ALPHABET;
pub use self::core::identity::ID_LENGTH;
pub use self::core::identity::RandomSourceError;
pub use self::core::identity::TOKEN_ALPHABET;
pub use self::core::identity::choose;
pub use self::core::identity::generate_auth_token;
pub use self::core::identity::generate_id;
pub use self::core::identity::generate_random_string;
pub use self::core::title::generate_title;
pub use self::core::value::StoredValue;
pub use interfaces::BlobStore;
pub use interfaces::CredentialStore;
pub use interfaces::InMemoryBlobStore;
pub use interfaces::InMemoryCredentialStore;
pub use interfaces::SharedBlobStore;
pub use interfaces::SharedCredentialStore;
pub use interfaces::StoreError;
