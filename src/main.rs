//! CLI entry point for the bridge swap scanner.
//!
//! # Architecture Flow
//!
//! ```text
//! main.rs (Runtime Initialization)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)        → Load TOML + SWAPSCAN_* overrides
//! 2. Persistence Layer (src/db)          → Open SQLite, run migrations
//! 3. RPC Layer (src/rpc)                 → One Alloy provider per chain side
//! 4. Scanner Layer (src/scanner)         → Backfill + tail each side
//! ```
//!
//! All errors bubble up with context via `eyre`.

use bridge_swap_scanner::{cli, observability};
use tracing::error;

/// Entry point for the bridge swap scanner.
///
/// Logging is controlled through the environment:
/// - `RUST_LOG`: filter directives
/// - `LOG_JSON`: JSON console output (`true`/`false`)
/// - `LOG_FILE`: additionally write JSON logs with daily rotation
#[tokio::main]
async fn main() {
    let log_level = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let json_output = std::env::var("LOG_JSON")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    // Held until exit so buffered file logs are flushed
    let _log_guard = match observability::init_tracing(log_level, log_file, json_output) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
