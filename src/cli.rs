//! Command-line interface for the bridge swap scanner.
//!
//! # Commands
//!
//! - `start`: scan the configured chain sides and record swaps
//!
//! # Example
//!
//! ```bash
//! # Tail both chains using the file configuration
//! bridge-swap-scanner start --config scan.toml
//!
//! # Backfill the last 500 blocks from receipts, 60s per block
//! bridge-swap-scanner start -c scan.toml --scanReceipt --start -500 --timeout 60
//! ```

use crate::config::{Overrides, ScanConfig};
use crate::db::{self, SqliteGateway};
use crate::rpc::AlloyChainClient;
use crate::scanner::ScanOrchestrator;
use crate::swap::{ChainSide, SwapTxType};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::WrapErr;
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Cross-chain bridge swap scanner
#[derive(Parser, Debug)]
#[command(name = "bridge-swap-scanner")]
#[command(about = "Scans EVM chains for cross-chain bridge swaps", long_about = None)]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the configured chains
    Start {
        /// Path to the TOML configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Detect swaps from receipt logs instead of call input
        #[arg(long = "scanReceipt")]
        scan_receipt: bool,

        /// Backfill start: absolute height, or negative for blocks behind head
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,

        /// Per-block scan budget in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Parse CLI arguments and execute the appropriate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the database or an
/// RPC endpoint cannot be set up.
pub async fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            config,
            scan_receipt,
            start,
            timeout,
        } => {
            let overrides = Overrides {
                scan_receipt,
                start_height: start,
                timeout_secs: timeout,
            };
            run_start_command(config, overrides).await
        }
    }
}

/// Execute the start command.
async fn run_start_command(path: PathBuf, overrides: Overrides) -> eyre::Result<()> {
    let mut config = ScanConfig::load(&path)
        .wrap_err_with(|| format!("Failed to load config {}", path.display()))?;
    config
        .apply_overrides(overrides)
        .wrap_err("Invalid command-line overrides")?;
    info!(
        config = %path.display(),
        scan_receipt = overrides.scan_receipt,
        start = ?overrides.start_height,
        timeout = ?overrides.timeout_secs,
        "Starting scanner"
    );

    let gateway = Arc::new(
        db::connect_gateway(&config.database_url)
            .await
            .wrap_err("Failed to set up database")?,
    );

    let mut orchestrators = Vec::new();
    for side in [ChainSide::Src, ChainSide::Dst] {
        let Some(chain_config) = config.chain(side) else {
            continue;
        };
        let tokens = config.tokens_for(side);
        if tokens.is_empty() {
            warn!(%side, "No tokens configured, side not scanned");
            continue;
        }
        let chain = AlloyChainClient::connect(&chain_config.gateway)
            .await
            .wrap_err_with(|| format!("Failed to connect {side} gateway"))?;

        println!(
            "{} {} {} ({} tokens)",
            "🔍".cyan(),
            side.to_string().bold(),
            chain_config.gateway.dimmed(),
            tokens.len()
        );
        orchestrators.push(ScanOrchestrator::new(
            side,
            chain_config.clone(),
            tokens,
            Arc::new(chain),
            gateway.clone(),
        ));
    }

    let handles: Vec<_> = orchestrators
        .into_iter()
        .map(|orchestrator| tokio::spawn(async move { orchestrator.run().await }))
        .collect();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tokio::select! {
        _ = &mut shutdown => {
            info!("Shutdown signal received");
            println!("{}", "🛑 Shutting down...".yellow().bold());
        }
        results = join_all(handles) => {
            for result in results {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => return Err(e).wrap_err("Scanner failed"),
                    Err(e) => error!(error = %e, "Scanner task panicked"),
                }
            }
            print_summary(&gateway).await;
        }
    }

    info!("Scanner stopped");
    Ok(())
}

/// Print the number of stored swaps of each kind.
async fn print_summary(gateway: &SqliteGateway) {
    println!("{}", "✅ Scan complete".green().bold());
    for kind in [
        SwapTxType::Deposit,
        SwapTxType::Redeemed,
        SwapTxType::Burn,
        SwapTxType::Mint,
    ] {
        match gateway.count_swaps(kind).await {
            Ok(count) => println!("   {:<9} {}", kind.to_string(), count.to_string().yellow()),
            Err(e) => warn!(%kind, error = %e, "Failed to count swaps"),
        }
    }
}
