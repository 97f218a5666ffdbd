//! # Bridge Swap Scanner
//!
//! Cross-chain bridge swap scanner for EVM chains using [Alloy](https://github.com/alloy-rs/alloy).
//!
//! The scanner walks blocks of a bridge's source and destination chains,
//! classifies every transaction against the configured token routes and
//! records the swaps it finds together with a resumable sync watermark.
//!
//! ## Features
//!
//! - **Type-safe selectors and event topics** from Alloy's `sol!` macro
//! - **Concurrent backfill** over a partitioned height range
//! - **Continuous tailing** behind a configurable stable-height margin
//! - **Retrying RPC access** with per-call retry policies
//! - **Idempotent SQLite persistence** through narrow gateway traits
//!
//! ## Swap kinds
//!
//! | Kind       | Chain       | Detected from                                  |
//! |------------|-------------|------------------------------------------------|
//! | `deposit`  | source      | native or ERC20 transfer into the MPC address  |
//! | `redeemed` | source      | transfer out of the MPC address                |
//! | `burn`     | destination | `Swapout` call or `LogSwapout` event            |
//! | `mint`     | destination | `Swapin` call or `LogSwapin` event              |
//!
//! ## Architecture
//!
//! 1. **Config Layer** ([`config`]) - TOML file with environment overrides
//! 2. **RPC Layer** ([`rpc`]) - Alloy provider behind the [`rpc::ChainClient`] seam
//! 3. **Events Layer** ([`events`]) - contract bindings
//! 4. **Scanner Layer** ([`scanner`]) - classification, block processing, orchestration
//! 5. **Persistence Layer** ([`db`]) - SQLite gateway
//!
//! ## Quick Start
//!
//! ```bash
//! bridge-swap-scanner start --config scan.toml
//!
//! # Receipt-based detection, backfilling the last 1000 blocks
//! bridge-swap-scanner start --config scan.toml --scanReceipt --start -1000
//! ```
//!
//! ### Using as a Library
//!
//! ```rust,no_run
//! use bridge_swap_scanner::{config::ScanConfig, db, rpc::AlloyChainClient};
//! use bridge_swap_scanner::scanner::ScanOrchestrator;
//! use bridge_swap_scanner::swap::ChainSide;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::load("scan.toml")?;
//!     let gateway = Arc::new(db::connect_gateway(&config.database_url).await?);
//!     let chain = AlloyChainClient::connect(&config.src.gateway).await?;
//!
//!     let orchestrator = ScanOrchestrator::new(
//!         ChainSide::Src,
//!         config.src.clone(),
//!         config.tokens_for(ChainSide::Src),
//!         Arc::new(chain),
//!         gateway,
//!     );
//!     orchestrator.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`error::ScannerResult<T>`](error::ScannerResult).
//! Classification mismatches are not errors; they are reported as
//! [`swap::VerifyError`] values.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod observability;
pub mod rpc;
pub mod scanner;
pub mod swap;

#[cfg(test)]
#[allow(missing_docs, clippy::unwrap_used)]
pub(crate) mod test_utils;
