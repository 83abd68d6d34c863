// crates/backplane-gateway/src/lib.rs
// ============================================================================
// Module: Backplane Gateway
// Description: HTTP gateway for application registration and blob storage.
// Purpose: Wire configuration, bootstrap, stores, auth, and routing together.
// Dependencies: axum, backplane-core, backplane-store-sqlite, base64,
//               reqwest, serde, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The gateway crate assembles the service: configuration from the
//! environment, root credential bootstrap, the partition store registry, the
//! blob access layer, the basic-auth gate, and the axum router with an
//! optional reverse-proxy fallback. The binary entry point lives in
//! `backplane-cli`; this crate exposes the pieces so tests and embedders can
//! compose them directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod blob;
pub mod bootstrap;
pub mod config;
pub mod proxy;
pub mod registry;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use audit::AuthAuditSink;
pub use audit::AuthDecision;
pub use audit::NoopAuditSink;
pub use auth::BASIC_CHALLENGE;
pub use auth::BasicCredentials;
pub use auth::authorize;
pub use auth::parse_basic_credentials;
pub use blob::CallContext;
pub use bootstrap::BootstrapError;
pub use bootstrap::ensure_root;
pub use config::ConfigError;
pub use config::GatewayConfig;
pub use proxy::ProxyClient;
pub use proxy::ProxyError;
pub use registry::PartitionRef;
pub use registry::PartitionRegistry;
pub use registry::credential_db_path;
pub use server::GatewayError;
pub use server::GatewayState;
pub use server::ServiceProfile;
pub use server::build_router;
pub use server::serve;
pub use telemetry::GatewayMetrics;
pub use telemetry::NoopMetrics;
pub use telemetry::RequestOutcome;
pub use telemetry::RouteClass;
