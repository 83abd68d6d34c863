// crates/backplane-gateway/src/proxy.rs
// ============================================================================
// Module: Reverse Proxy
// Description: Transparent forwarding to downstream services.
// Purpose: Route unmatched traffic to the API or application downstream.
// Dependencies: axum, backplane-core, reqwest, thiserror
// ============================================================================

//! ## Overview
//! The proxy forwards requests the gateway does not serve itself. Paths under
//! `/api` go to the API downstream; everything else goes to the application
//! downstream. Method, headers, and body are preserved, hop-by-hop headers
//! are stripped, and the downstream response is returned unmodified. An
//! unreachable downstream answers 502. There is no retry and no buffering
//! beyond the request body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::body::Body;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::Response;
use axum::http::StatusCode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path prefix routed to the API downstream.
const API_PREFIX: &str = "/api";
/// Hop-by-hop headers stripped before forwarding.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];
/// Maximum request body size accepted for forwarding (16 MiB).
const MAX_FORWARD_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Downstream request timeout in seconds.
const DOWNSTREAM_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Proxy errors (surfaced as 502 responses, apart from client construction).
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The HTTP client could not be constructed (fatal at startup).
    #[error("proxy client construction failed: {0}")]
    Client(String),
    /// No downstream is configured for the request path.
    #[error("no downstream configured for path")]
    NoDownstream,
    /// The request body could not be buffered.
    #[error("request body unreadable: {0}")]
    Body(String),
    /// The downstream request failed.
    #[error("downstream request failed: {0}")]
    Upstream(String),
}

// ============================================================================
// SECTION: Proxy Client
// ============================================================================

/// HTTP client with resolved downstream base URLs.
///
/// # Invariants
/// - Base URLs are loopback addresses derived from configured ports.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Base URL for `/api` traffic.
    api_base: Option<String>,
    /// Base URL for all other traffic.
    app_base: Option<String>,
}

impl ProxyClient {
    /// Builds a proxy client from configured downstream ports.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Client`] when the HTTP client cannot be built.
    pub fn from_ports(api_port: Option<u16>, app_port: Option<u16>) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DOWNSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|err| ProxyError::Client(err.to_string()))?;
        Ok(Self {
            http,
            api_base: api_port.map(|port| format!("http://127.0.0.1:{port}")),
            app_base: app_port.map(|port| format!("http://127.0.0.1:{port}")),
        })
    }

    /// Returns the downstream base URL for a request path.
    fn base_for(&self, path: &str) -> Option<&str> {
        if path.starts_with(API_PREFIX) {
            self.api_base.as_deref()
        } else {
            self.app_base.as_deref()
        }
    }

    /// Forwards a request to its downstream and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError`] when no downstream is configured, the body
    /// cannot be buffered, or the downstream is unreachable.
    pub async fn forward(&self, request: Request) -> Result<Response<Body>, ProxyError> {
        let path_and_query = request
            .uri()
            .path_and_query()
            .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
        let base = self.base_for(request.uri().path()).ok_or(ProxyError::NoDownstream)?;
        let url = format!("{base}{path_and_query}");

        let method = request.method().clone();
        let headers = filter_headers(request.headers());
        let body = to_bytes(request.into_body(), MAX_FORWARD_BODY_BYTES)
            .await
            .map_err(|err| ProxyError::Body(err.to_string()))?;

        let downstream = self
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|err| ProxyError::Upstream(err.to_string()))?;

        let status = StatusCode::from_u16(downstream.status().as_u16())
            .map_err(|err| ProxyError::Upstream(err.to_string()))?;
        let response_headers = filter_headers(downstream.headers());
        let payload = downstream
            .bytes()
            .await
            .map_err(|err| ProxyError::Upstream(err.to_string()))?;

        let mut builder = Response::builder().status(status);
        for (name, value) in &response_headers {
            builder = builder.header(name, value);
        }
        builder
            .body(Body::from(payload))
            .map_err(|err| ProxyError::Upstream(err.to_string()))
    }
}

/// Copies headers, dropping hop-by-hop headers.
fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for (name, value) in headers {
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
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

    use axum::http::HeaderMap;
    use axum::http::HeaderValue;

    use super::ProxyClient;
    use super::filter_headers;

    #[test]
    fn api_paths_route_to_api_downstream() {
        let proxy = ProxyClient::from_ports(Some(9001), Some(9002)).expect("client");
        assert_eq!(proxy.base_for("/api/storage/a/b/c"), Some("http://127.0.0.1:9001"));
        assert_eq!(proxy.base_for("/dashboard"), Some("http://127.0.0.1:9002"));
    }

    #[test]
    fn missing_downstream_yields_none() {
        let proxy = ProxyClient::from_ports(None, Some(9002)).expect("client");
        assert_eq!(proxy.base_for("/api/anything"), None);
        assert_eq!(proxy.base_for("/index.html"), Some("http://127.0.0.1:9002"));
    }

    #[test]
    fn hop_by_hop_headers_are_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("x-request-id", HeaderValue::from_static("abc123"));
        let filtered = filter_headers(&headers);
        assert!(filtered.get("connection").is_none());
        assert!(filtered.get("transfer-encoding").is_none());
        assert_eq!(filtered.get("x-request-id"), Some(&HeaderValue::from_static("abc123")));
    }
}
