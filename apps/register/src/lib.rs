//! # Till Register Library
//!
//! Core library for the Till POS register back end.
//! This is the main entry point that configures and runs the register.
//!
//! ## Module Organization
//! ```text
//! till_register_lib/
//! ├── lib.rs             ◄─── You are here (setup & run)
//! ├── ipc.rs             ◄─── JSON-line command bridge
//! ├── state/
//! │   ├── mod.rs         ◄─── State type exports
//! │   ├── db.rs          ◄─── Database state wrapper
//! │   ├── register.rs    ◄─── Register session + checkout latch
//! │   └── config.rs      ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs         ◄─── Command exports
//! │   ├── product.rs     ◄─── Catalog commands
//! │   ├── cart.rs        ◄─── Cart and tendered amount
//! │   ├── calculator.rs  ◄─── Keypad
//! │   ├── sale.rs        ◄─── Checkout and history
//! │   └── config.rs      ◄─── Configuration retrieval
//! └── error.rs           ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod ipc;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use ipc::ManagedState;
use state::ConfigState;
use till_db::{Database, DbConfig, DbError};

/// Reasons the register could not start or stopped abnormally.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Could not determine app data directory")]
    NoDataDirectory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Runs the register.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • TILL_* environment variables over defaults                        │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Restore Register Session ─────────────────────────────────────────► │
/// │     • Catalog (defaults on first run) and ledger                        │
/// │                                                                         │
/// │  5. Serve Commands ───────────────────────────────────────────────────► │
/// │     • One JSON request per stdin line until end of input                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), StartupError> {
    // Initialize tracing (logging)
    init_tracing();

    info!("Starting Till POS register");

    let config = ConfigState::from_env();
    let db_path = get_database_path(&config)?;
    info!(?db_path, "Database path determined");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        let state = ManagedState::open(db, config).await?;
        info!(store = %state.config.store_name, "State initialized");

        ipc::serve(
            &state,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

        state.db.inner().close().await;
        info!("Register stopped");
        Ok::<(), StartupError>(())
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries command responses.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.till.pos/till.db`
/// - **Windows**: `%APPDATA%\till\pos\data\till.db`
/// - **Linux**: `~/.local/share/pos/till.db`
///
/// ## Development Override
/// Set `TILL_DB_PATH` environment variable to use a custom path.
fn get_database_path(config: &ConfigState) -> Result<PathBuf, StartupError> {
    // Check for override
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    // Use platform-specific app data directory
    let proj_dirs =
        ProjectDirs::from("com", "till", "pos").ok_or(StartupError::NoDataDirectory)?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("till.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let config = ConfigState {
            database_path: Some(PathBuf::from("/tmp/register.db")),
            ..ConfigState::default()
        };
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/register.db")
        );
    }
}
