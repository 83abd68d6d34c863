// crates/backplane-gateway/src/server.rs
// ============================================================================
// Module: Gateway Router and Runtime
// Description: Route table, handlers, auth middleware, and serve loop.
// Purpose: Expose the control plane, data plane, and proxy fallback.
// Dependencies: axum, backplane-core, backplane-store-sqlite, serde_json,
//               thiserror, tokio
// ============================================================================

//! ## Overview
//! One router serves both deployment shapes. The standalone profile exposes
//! registration and storage routes with a 404 fallback; the gateway profile
//! adds a transparent reverse-proxy fallback for everything it does not serve
//! itself. `/api/app/new` is the only open route; all other `/api` routes sit
//! behind the basic-auth gate. Bootstrap runs before the listener is bound,
//! so no request is ever served without a root credential in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::WWW_AUTHENTICATE;
use axum::middleware;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use backplane_core::AppCode;
use backplane_core::AppCredential;
use backplane_core::ID_LENGTH;
use backplane_core::SharedCredentialStore;
use backplane_core::StoredValue;
use backplane_core::generate_auth_token;
use backplane_core::generate_id;
use backplane_core::generate_title;
use backplane_store_sqlite::SqliteCredentialStore;
use backplane_store_sqlite::SqliteStoreConfig;
use backplane_store_sqlite::SqliteStoreError;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::AuthAuditSink;
use crate::audit::AuthDecision;
use crate::audit::NoopAuditSink;
use crate::auth::BASIC_CHALLENGE;
use crate::auth::authorize;
use crate::auth::parse_basic_credentials;
use crate::blob;
use crate::blob::CallContext;
use crate::bootstrap::BootstrapError;
use crate::bootstrap::ensure_root;
use crate::config::GatewayConfig;
use crate::proxy::ProxyClient;
use crate::proxy::ProxyError;
use crate::registry::PartitionRegistry;
use crate::registry::credential_db_path;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::NoopMetrics;
use crate::telemetry::RequestOutcome;
use crate::telemetry::RouteClass;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path prefix of the authenticated API surface.
const API_PATH_PREFIX: &str = "/api";
/// The one API path that never requires credentials.
const OPEN_REGISTRATION_PATH: &str = "/api/app/new";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal gateway runtime errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The credential store could not be opened.
    #[error("credential store open failed: {0}")]
    Store(#[from] SqliteStoreError),
    /// Root credential bootstrap failed.
    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
    /// The proxy HTTP client could not be constructed.
    #[error("proxy client init failed: {0}")]
    Proxy(#[from] ProxyError),
    /// The listener could not be bound or the accept loop failed.
    #[error("gateway io error: {0}")]
    Io(String),
}

/// Handler-level failure mapped to an opaque HTTP response.
///
/// # Invariants
/// - Response bodies never carry store or generator detail.
enum ApiError {
    /// Malformed request body (HTTP 400).
    BadRequest,
    /// Store or generator failure (HTTP 500).
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": "malformed request body"})))
                    .into_response()
            }
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "internal error"})))
                    .into_response()
            }
        }
    }
}

// ============================================================================
// SECTION: Service Profile
// ============================================================================

/// Deployment shape of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceProfile {
    /// Control and data plane only; unmatched routes answer 404.
    Standalone,
    /// Control and data plane plus reverse-proxy fallback.
    Gateway,
}

// ============================================================================
// SECTION: Shared State
// ============================================================================

/// Shared gateway state cloned into every handler.
///
/// # Invariants
/// - Clones share the same stores, registry, and sinks.
#[derive(Clone)]
pub struct GatewayState {
    /// Credential store backing registration and the auth gate.
    credentials: SharedCredentialStore,
    /// Partition store registry.
    registry: Arc<PartitionRegistry>,
    /// Base directory for partition databases.
    data_dir: PathBuf,
    /// Proxy client for the gateway profile.
    proxy: Option<ProxyClient>,
    /// Metrics sink.
    metrics: Arc<dyn GatewayMetrics>,
    /// Authorization audit sink.
    audit: Arc<dyn AuthAuditSink>,
}

impl GatewayState {
    /// Builds state from explicit parts.
    #[must_use]
    pub fn new(
        credentials: SharedCredentialStore,
        data_dir: impl Into<PathBuf>,
        proxy: Option<ProxyClient>,
    ) -> Self {
        Self {
            credentials,
            registry: Arc::new(PartitionRegistry::new()),
            data_dir: data_dir.into(),
            proxy,
            metrics: Arc::new(NoopMetrics),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuthAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the proxy client.
    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<ProxyClient>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Opens the credential store and runs bootstrap per the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store cannot be opened or bootstrap
    /// fails.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let store = SqliteCredentialStore::open(SqliteStoreConfig::for_path(credential_db_path(
            &config.data_dir,
        )))?;
        let credentials = SharedCredentialStore::from_store(store);
        ensure_root(&credentials)?;
        let proxy = if config.has_downstream() {
            Some(ProxyClient::from_ports(config.api_downstream_port, config.app_downstream_port)?)
        } else {
            None
        };
        Ok(Self::new(credentials, config.data_dir.clone(), proxy))
    }

    /// Returns the credential store handle.
    #[must_use]
    pub fn credentials(&self) -> &SharedCredentialStore {
        &self.credentials
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the route table for the given profile.
#[must_use]
pub fn build_router(state: GatewayState, profile: ServiceProfile) -> Router {
    let protected = Router::new()
        .route("/api/app/code/gen/token/{appcode}", get(handle_token_stub))
        .route(
            "/api/storage/{appcode}/{content_type}/{key}",
            get(handle_storage_read).post(handle_storage_write_keyed),
        )
        .route("/api/storage/{appcode}/{content_type}", post(handle_storage_write_keyless))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth));

    let router =
        Router::new().route(OPEN_REGISTRATION_PATH, get(handle_register)).merge(protected);
    let router = match profile {
        ServiceProfile::Standalone => router.fallback(handle_not_found),
        ServiceProfile::Gateway => router.fallback(handle_proxy),
    };
    router.with_state(state)
}

/// Binds the listener and serves until the accept loop ends.
///
/// # Errors
///
/// Returns [`GatewayError`] when startup or the accept loop fails.
pub async fn serve(config: GatewayConfig) -> Result<(), GatewayError> {
    let state = GatewayState::from_config(&config)?;
    let profile = if config.has_downstream() {
        ServiceProfile::Gateway
    } else {
        ServiceProfile::Standalone
    };
    let router = build_router(state, profile);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.listen_port))
        .await
        .map_err(|err| GatewayError::Io(err.to_string()))?;
    axum::serve(listener, router).await.map_err(|err| GatewayError::Io(err.to_string()))
}

// ============================================================================
// SECTION: Auth Middleware
// ============================================================================

/// Gate applied to protected routes; denies with a uniform 401.
async fn require_basic_auth(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = check_request_auth(&state, &request);
    if decision.is_allowed() {
        next.run(request).await
    } else {
        let route = route_class_for(request.method(), request.uri().path());
        state.metrics.record_request(route, RequestOutcome::Unauthorized);
        unauthorized()
    }
}

/// Parses and verifies the request's basic-auth credentials, auditing the
/// decision.
fn check_request_auth(state: &GatewayState, request: &Request) -> AuthDecision {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let Some(header) = header else {
        state.audit.record_decision(None, AuthDecision::DeniedMalformedHeader);
        return AuthDecision::DeniedMalformedHeader;
    };
    let Some(presented) = parse_basic_credentials(header) else {
        state.audit.record_decision(None, AuthDecision::DeniedMalformedHeader);
        return AuthDecision::DeniedMalformedHeader;
    };
    let decision = authorize(&state.credentials, &presented.username, &presented.password);
    state.audit.record_decision(Some(&presented.username), decision);
    decision
}

/// Classifies a request path for telemetry labels.
fn route_class_for(method: &Method, path: &str) -> RouteClass {
    if path.starts_with("/api/storage") {
        if method == Method::GET {
            RouteClass::StorageRead
        } else {
            RouteClass::StorageWrite
        }
    } else if path.starts_with("/api/app/code/gen/token") {
        RouteClass::TokenStub
    } else {
        RouteClass::Proxy
    }
}

/// Uniform denial response; the body never reveals why.
fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, [(WWW_AUTHENTICATE, BASIC_CHALLENGE)], Json(json!({})))
        .into_response()
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Registers a new application and returns its credential record.
async fn handle_register(State(state): State<GatewayState>) -> Result<Json<AppCredential>, ApiError> {
    let started = Instant::now();
    let outcome = register_app(&state.credentials);
    let label = if outcome.is_ok() { RequestOutcome::Ok } else { RequestOutcome::ServerError };
    state.metrics.record_request(RouteClass::Registration, label);
    state.metrics.record_latency(RouteClass::Registration, started.elapsed());
    outcome.map(Json)
}

/// Generates and persists a fresh application credential.
fn register_app(credentials: &SharedCredentialStore) -> Result<AppCredential, ApiError> {
    let app_code = generate_id("app", ID_LENGTH).map_err(|_| ApiError::Internal)?;
    let api_key = generate_auth_token().map_err(|_| ApiError::Internal)?;
    let title = generate_title().map_err(|_| ApiError::Internal)?;
    let credential = AppCredential::new(AppCode::new(app_code), api_key, title);
    credentials.set(&credential).map_err(|_| ApiError::Internal)?;
    Ok(credential)
}

/// Token regeneration stub; acknowledges without acting.
async fn handle_token_stub(
    State(state): State<GatewayState>,
    Path(_appcode): Path<String>,
) -> StatusCode {
    state.metrics.record_request(RouteClass::TokenStub, RequestOutcome::Ok);
    StatusCode::OK
}

/// Reads a stored value; absent keys answer JSON `null`.
async fn handle_storage_read(
    State(state): State<GatewayState>,
    Path((appcode, content_type, key)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let context = CallContext::keyed(&state.data_dir, appcode.as_str(), content_type, key);
    let result = blob::read(&state.registry, &context);
    let label = if result.is_ok() { RequestOutcome::Ok } else { RequestOutcome::ServerError };
    state.metrics.record_request(RouteClass::StorageRead, label);
    state.metrics.record_latency(RouteClass::StorageRead, started.elapsed());
    let value = result.map_err(|_| ApiError::Internal)?;
    Ok(Json(value.into_json()))
}

/// Writes a value under a caller-supplied key.
async fn handle_storage_write_keyed(
    State(state): State<GatewayState>,
    Path((appcode, content_type, key)): Path<(String, String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let started = Instant::now();
    let Ok(Json(body)) = body else {
        state.metrics.record_request(RouteClass::StorageWrite, RequestOutcome::BadRequest);
        return Err(ApiError::BadRequest);
    };
    let context = CallContext::keyed(&state.data_dir, appcode.as_str(), content_type, key);
    let result = blob::write(&state.registry, &context, &StoredValue::new(body));
    let label = if result.is_ok() { RequestOutcome::Ok } else { RequestOutcome::ServerError };
    state.metrics.record_request(RouteClass::StorageWrite, label);
    state.metrics.record_latency(RouteClass::StorageWrite, started.elapsed());
    result.map_err(|_| ApiError::Internal)?;
    Ok(StatusCode::OK)
}

/// Writes a value under a server-generated key and returns the key.
async fn handle_storage_write_keyless(
    State(state): State<GatewayState>,
    Path((appcode, content_type)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let Ok(Json(body)) = body else {
        state.metrics.record_request(RouteClass::StorageWrite, RequestOutcome::BadRequest);
        return Err(ApiError::BadRequest);
    };
    let result = write_with_generated_key(&state, appcode.as_str(), &content_type, body);
    let label = if result.is_ok() { RequestOutcome::Ok } else { RequestOutcome::ServerError };
    state.metrics.record_request(RouteClass::StorageWrite, label);
    state.metrics.record_latency(RouteClass::StorageWrite, started.elapsed());
    result
}

/// Generates a key, persists the value, and returns the key to the caller.
fn write_with_generated_key(
    state: &GatewayState,
    appcode: &str,
    content_type: &str,
    body: Value,
) -> Result<Json<Value>, ApiError> {
    let context = CallContext::keyless(&state.data_dir, appcode, content_type)
        .map_err(|_| ApiError::Internal)?;
    blob::write(&state.registry, &context, &StoredValue::new(body))
        .map_err(|_| ApiError::Internal)?;
    Ok(Json(json!({"key": context.key.as_str()})))
}

/// Standalone fallback: unmatched routes answer 404.
async fn handle_not_found(State(state): State<GatewayState>) -> StatusCode {
    state.metrics.record_request(RouteClass::NotFound, RequestOutcome::NotFound);
    StatusCode::NOT_FOUND
}

/// Gateway fallback: forward to the downstream, 502 when unreachable.
///
/// Forwarded `/api` paths pass the same credential gate as the routes served
/// here; only the open registration path bypasses it.
async fn handle_proxy(State(state): State<GatewayState>, request: Request) -> Response {
    let started = Instant::now();
    let path = request.uri().path();
    if path.starts_with(API_PATH_PREFIX)
        && path != OPEN_REGISTRATION_PATH
        && !check_request_auth(&state, &request).is_allowed()
    {
        state.metrics.record_request(RouteClass::Proxy, RequestOutcome::Unauthorized);
        return unauthorized();
    }
    let Some(proxy) = state.proxy.as_ref() else {
        state.metrics.record_request(RouteClass::NotFound, RequestOutcome::NotFound);
        return StatusCode::NOT_FOUND.into_response();
    };
    let response = match proxy.forward(request).await {
        Ok(response) => {
            state.metrics.record_request(RouteClass::Proxy, RequestOutcome::Ok);
            response.into_response()
        }
        Err(_) => {
            state.metrics.record_request(RouteClass::Proxy, RequestOutcome::BadGateway);
            StatusCode::BAD_GATEWAY.into_response()
        }
    };
    state.metrics.record_latency(RouteClass::Proxy, started.elapsed());
    response
}
