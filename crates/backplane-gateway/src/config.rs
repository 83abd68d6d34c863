// crates/backplane-gateway/src/config.rs
// ============================================================================
// Module: Gateway Configuration
// Description: Environment-driven configuration for the gateway runtime.
// Purpose: Resolve ports, downstream targets, and the data directory.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Configuration is read from the environment at startup and validated before
//! any listener is bound. Malformed values fail closed with a fatal error;
//! there is no partial startup. Downstream ports are optional: when neither
//! is present the service runs standalone with no proxy fallback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the gateway listen port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable naming the API downstream port.
pub const API_PORT_ENV: &str = "API_PORT";
/// Environment variable naming the application downstream port.
pub const APP_PORT_ENV: &str = "APP_PORT";
/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
/// Default gateway listen port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./.data";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors (fatal at startup).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A port variable holds a value outside 1..=65535.
    #[error("invalid port in {variable}: {value}")]
    InvalidPort {
        /// Environment variable name.
        variable: String,
        /// Rejected raw value.
        value: String,
    },
    /// The data directory is empty.
    #[error("data directory must not be empty")]
    EmptyDataDir,
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Gateway runtime configuration.
///
/// # Invariants
/// - `listen_port` and any downstream ports are non-zero.
/// - `data_dir` is non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Port the gateway listens on.
    pub listen_port: u16,
    /// Downstream port for `/api` traffic the gateway does not serve itself.
    pub api_downstream_port: Option<u16>,
    /// Downstream port for non-`/api` traffic.
    pub app_downstream_port: Option<u16>,
    /// Base directory for credential and partition databases.
    pub data_dir: PathBuf,
}

impl GatewayConfig {
    /// Builds a standalone configuration rooted at the given data directory.
    #[must_use]
    pub fn standalone(listen_port: u16, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            listen_port,
            api_downstream_port: None,
            app_downstream_port: None,
            data_dir: data_dir.into(),
        }
    }

    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds a malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds a malformed value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_port = match lookup(PORT_ENV) {
            Some(raw) => parse_port(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let api_downstream_port = match lookup(API_PORT_ENV) {
            Some(raw) => Some(parse_port(API_PORT_ENV, &raw)?),
            None => None,
        };
        let app_downstream_port = match lookup(APP_PORT_ENV) {
            Some(raw) => Some(parse_port(APP_PORT_ENV, &raw)?),
            None => None,
        };
        let data_dir = lookup(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(Self {
            listen_port,
            api_downstream_port,
            app_downstream_port,
            data_dir: PathBuf::from(data_dir),
        })
    }

    /// Returns true when a proxy fallback should be installed.
    #[must_use]
    pub const fn has_downstream(&self) -> bool {
        self.api_downstream_port.is_some() || self.app_downstream_port.is_some()
    }
}

/// Parses a port variable, rejecting zero and non-numeric values.
fn parse_port(variable: &str, raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    let parsed: u16 = trimmed.parse().map_err(|_| ConfigError::InvalidPort {
        variable: variable.to_string(),
        value: raw.to_string(),
    })?;
    if parsed == 0 {
        return Err(ConfigError::InvalidPort {
            variable: variable.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(parsed)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
