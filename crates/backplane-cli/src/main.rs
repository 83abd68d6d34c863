// crates/backplane-cli/src/main.rs
// ============================================================================
// Module: Backplane CLI Entry Point
// Description: Command dispatcher for the gateway runtime and operator tasks.
// Purpose: Wire environment configuration and flags into the gateway.
// Dependencies: backplane-core, backplane-gateway, backplane-store-sqlite,
//               clap, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The CLI starts the gateway (`serve`) and exposes the operator task of
//! reading the bootstrap root credential (`root-key`). Configuration comes
//! from the environment; flags override individual values. Fatal errors are
//! reported on stderr and mapped to a non-zero exit code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use backplane_core::SharedCredentialStore;
use backplane_gateway::GatewayConfig;
use backplane_gateway::credential_db_path;
use backplane_gateway::ensure_root;
use backplane_store_sqlite::SqliteCredentialStore;
use backplane_store_sqlite::SqliteStoreConfig;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failure carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// User-facing error message.
    message: String,
}

impl CliError {
    /// Wraps a message into a CLI error.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result alias for CLI commands.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Command Definitions
// ============================================================================

/// Backplane multi-tenant blob-storage gateway.
#[derive(Debug, Parser)]
#[command(name = "backplane", version, about)]
struct Cli {
    /// Command to run.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the gateway.
    Serve(ServeCommand),
    /// Print the bootstrap root credential as JSON.
    RootKey(RootKeyCommand),
}

/// Flags for the `serve` command.
#[derive(Debug, clap::Args)]
struct ServeCommand {
    /// Listen port (overrides `PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// API downstream port (overrides `API_PORT`).
    #[arg(long)]
    api_port: Option<u16>,
    /// Application downstream port (overrides `APP_PORT`).
    #[arg(long)]
    app_port: Option<u16>,
    /// Data directory (overrides `DATA_DIR`).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Flags for the `root-key` command.
#[derive(Debug, clap::Args)]
struct RootKeyCommand {
    /// Data directory (overrides `DATA_DIR`).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::RootKey(command) => command_root_key(&command),
    }
}

/// Writes a fatal error to stderr and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    // Output failures at this point have nowhere left to go.
    let _ = writeln!(std::io::stderr(), "error: {message}");
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = GatewayConfig::from_env().map_err(|err| CliError::new(err.to_string()))?;
    if let Some(port) = command.port {
        config.listen_port = port;
    }
    if let Some(port) = command.api_port {
        config.api_downstream_port = Some(port);
    }
    if let Some(port) = command.app_port {
        config.app_downstream_port = Some(port);
    }
    if let Some(data_dir) = command.data_dir {
        config.data_dir = data_dir;
    }
    backplane_gateway::serve(config).await.map_err(|err| CliError::new(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Root Key Command
// ============================================================================

/// Executes the `root-key` command.
fn command_root_key(command: &RootKeyCommand) -> CliResult<ExitCode> {
    let mut config = GatewayConfig::from_env().map_err(|err| CliError::new(err.to_string()))?;
    if let Some(data_dir) = command.data_dir.clone() {
        config.data_dir = data_dir;
    }
    let store =
        SqliteCredentialStore::open(SqliteStoreConfig::for_path(credential_db_path(&config.data_dir)))
            .map_err(|err| CliError::new(err.to_string()))?;
    let credentials = SharedCredentialStore::from_store(store);
    let root = ensure_root(&credentials).map_err(|err| CliError::new(err.to_string()))?;
    let rendered = serde_json::to_string_pretty(&root)
        .map_err(|err| CliError::new(err.to_string()))?;
    writeln!(std::io::stdout(), "{rendered}")
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}
