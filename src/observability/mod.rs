//! Structured logging setup.
//!
//! Scanner activity is logged through `tracing` with key/value fields
//! (`height`, `pair_id`, `tx`, ...) so a JSON sink can be filtered by chain
//! side, block or route.
//!
//! # Usage
//!
//! ```no_run
//! use bridge_swap_scanner::observability;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // Keep the guard alive for as long as file logging is needed
//! let _guard = observability::init_tracing(None, None, false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Configuration
//!
//! ```bash
//! # Component-specific levels
//! RUST_LOG=bridge_swap_scanner=debug,sqlx=warn bridge-swap-scanner start -c scan.toml
//!
//! # JSON console output
//! LOG_JSON=true bridge-swap-scanner start -c scan.toml
//!
//! # Also write JSON logs to a daily-rotated file
//! LOG_FILE=./logs/scanner.log bridge-swap-scanner start -c scan.toml
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when neither `RUST_LOG` nor an explicit level is given:
/// info for the scanner, warn for dependencies.
pub const DEFAULT_FILTER: &str = "bridge_swap_scanner=info,warn";

/// Initialize the tracing subscriber.
///
/// * `log_level` - Filter directive; `RUST_LOG` takes precedence.
/// * `log_file` - Optional file path; enables a daily-rotated JSON log.
/// * `json_output` - JSON console output instead of the pretty format.
///
/// Returns the file writer guard when file logging is enabled. Dropping it
/// flushes and stops the background writer.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = std::env::var("RUST_LOG").map_or_else(
        |_| EnvFilter::new(log_level.as_deref().unwrap_or(DEFAULT_FILTER)),
        EnvFilter::new,
    );

    let console_layer = if json_output {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    };

    let mut guard = None;
    let file_layer = if let Some(ref path) = log_file {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let file_appender = tracing_appender::rolling::daily(
            dir,
            path.file_name().unwrap_or_else(|| OsStr::new("scanner.log")),
        );
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        // File output is always JSON
        Some(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized successfully"
    );

    Ok(guard)
}

/// Route log output to the test harness (`cargo test -- --nocapture`).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("bridge_swap_scanner=debug"))
        .try_init();
}
