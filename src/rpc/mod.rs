//! Chain RPC access.
//!
//! # Layers
//!
//! ```text
//! ┌──────────────────────┐
//! │ RetryingChainClient  │  retry policies (retry.rs)
//! └──────────┬───────────┘
//!            │ Arc<dyn ChainClient>
//! ┌──────────▼───────────┐
//! │  AlloyChainClient    │  HTTP JSON-RPC via Alloy (http.rs)
//! └──────────────────────┘
//! ```
//!
//! The scanning engine depends only on the [`ChainClient`] trait, so tests
//! substitute a scripted chain for the Alloy provider.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bridge_swap_scanner::rpc::{AlloyChainClient, RetryingChainClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = AlloyChainClient::connect("https://rpc.ankr.com/eth").await?;
//! let client = RetryingChainClient::with_defaults(Arc::new(chain));
//! let head = client.latest_height().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod http;
pub mod retry;

pub use client::{ChainBlock, ChainClient, ChainLog, ChainReceipt, ChainTransaction};
pub use http::{create_provider, AlloyChainClient, Provider};
pub use retry::{RetryingChainClient, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_INTERVAL};
