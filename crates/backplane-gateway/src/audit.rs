// crates/backplane-gateway/src/audit.rs
// ============================================================================
// Module: Authorization Audit
// Description: Audit sink for authorization gate decisions.
// Purpose: Record allow/deny decisions with stable reason labels.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every authorization decision passes through an audit sink so deployments
//! can ship decisions to their log pipeline. Events carry the application
//! code and a reason label only; API keys never reach the sink.

// ============================================================================
// SECTION: Decision Labels
// ============================================================================

/// Authorization decision classification.
///
/// # Invariants
/// - Variants are stable for audit labeling.
/// - No variant carries key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Credentials matched; request allowed.
    Allowed,
    /// Authorization header absent or unparsable.
    DeniedMalformedHeader,
    /// Username or password was empty.
    DeniedEmptyCredentials,
    /// No credential record exists for the application code.
    DeniedUnknownApp,
    /// Presented key did not match the stored key.
    DeniedKeyMismatch,
    /// Credential lookup failed; denied fail-closed.
    DeniedStoreFailure,
}

impl AuthDecision {
    /// Returns a stable label for the decision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::DeniedMalformedHeader => "denied_malformed_header",
            Self::DeniedEmptyCredentials => "denied_empty_credentials",
            Self::DeniedUnknownApp => "denied_unknown_app",
            Self::DeniedKeyMismatch => "denied_key_mismatch",
            Self::DeniedStoreFailure => "denied_store_failure",
        }
    }

    /// Returns true when the decision allows the request.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

// ============================================================================
// SECTION: Audit Interface
// ============================================================================

/// Audit sink for authorization gate decisions.
pub trait AuthAuditSink: Send + Sync {
    /// Records one authorization decision.
    ///
    /// `app_code` is the presented username when one could be parsed.
    fn record_decision(&self, app_code: Option<&str>, decision: AuthDecision);
}

/// No-op audit sink used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuthAuditSink for NoopAuditSink {
    fn record_decision(&self, _app_code: Option<&str>, _decision: AuthDecision) {}
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

    use super::AuthAuditSink;
    use super::AuthDecision;
    use super::NoopAuditSink;

    #[test]
    fn only_allowed_is_allowed() {
        assert!(AuthDecision::Allowed.is_allowed());
        assert!(!AuthDecision::DeniedUnknownApp.is_allowed());
        assert!(!AuthDecision::DeniedStoreFailure.is_allowed());
    }

    #[test]
    fn noop_sink_accepts_events() {
        let sink = NoopAuditSink;
        sink.record_decision(Some("app_abc"), AuthDecision::DeniedKeyMismatch);
        sink.record_decision(None, AuthDecision::DeniedMalformedHeader);
    }
}
