// crates/backplane-gateway/src/telemetry.rs
// ============================================================================
// Module: Gateway Telemetry
// Description: Observability hooks for gateway request handling.
// Purpose: Provide metric events and latency recording without hard deps.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for gateway request counters
//! and latency measurements. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Labels are stable enums; telemetry never carries API keys or payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Gateway route classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Open application registration.
    Registration,
    /// Token regeneration stub.
    TokenStub,
    /// Storage read.
    StorageRead,
    /// Storage write (keyed or keyless).
    StorageWrite,
    /// Reverse-proxy fallback.
    Proxy,
    /// Unmatched route in standalone profile.
    NotFound,
}

impl RouteClass {
    /// Returns a stable label for the route class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::TokenStub => "token_stub",
            Self::StorageRead => "storage_read",
            Self::StorageWrite => "storage_write",
            Self::Proxy => "proxy",
            Self::NotFound => "not_found",
        }
    }
}

/// Gateway request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Request served successfully.
    Ok,
    /// Request denied by the authorization gate.
    Unauthorized,
    /// Request rejected for a malformed body.
    BadRequest,
    /// Request failed in a store or generator.
    ServerError,
    /// Downstream unreachable during proxying.
    BadGateway,
    /// No matching route.
    NotFound,
}

impl RequestOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unauthorized => "unauthorized",
            Self::BadRequest => "bad_request",
            Self::ServerError => "server_error",
            Self::BadGateway => "bad_gateway",
            Self::NotFound => "not_found",
        }
    }
}

// ============================================================================
// SECTION: Metrics Interface
// ============================================================================

/// Metrics sink for gateway request handling.
pub trait GatewayMetrics: Send + Sync {
    /// Records a completed request with its outcome.
    fn record_request(&self, route: RouteClass, outcome: RequestOutcome);

    /// Records request latency for a route class.
    fn record_latency(&self, route: RouteClass, latency: Duration);
}

/// No-op metrics sink used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_request(&self, _route: RouteClass, _outcome: RequestOutcome) {}

    fn record_latency(&self, _route: RouteClass, _latency: Duration) {}
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

    use std::time::Duration;

    use super::GatewayMetrics;
    use super::NoopMetrics;
    use super::RequestOutcome;
    use super::RouteClass;

    #[test]
    fn labels_are_stable() {
        assert_eq!(RouteClass::StorageRead.as_str(), "storage_read");
        assert_eq!(RequestOutcome::BadGateway.as_str(), "bad_gateway");
    }

    #[test]
    fn noop_metrics_accept_events() {
        let metrics = NoopMetrics;
        metrics.record_request(RouteClass::Registration, RequestOutcome::Ok);
        metrics.record_latency(RouteClass::Proxy, Duration::from_millis(3));
    }
}
