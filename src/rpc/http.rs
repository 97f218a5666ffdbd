//! Alloy HTTP implementation of [`ChainClient`].
//!
//! This module handles the connection to an EVM node over JSON-RPC and
//! converts Alloy's RPC types into the reduced chain view the scanner uses.
//!
//! ## Example
//!
//! ```no_run
//! use bridge_swap_scanner::rpc::{AlloyChainClient, ChainClient};
//! use bridge_swap_scanner::error::ScannerResult;
//!
//! # async fn example() -> ScannerResult<()> {
//! let client = AlloyChainClient::connect("https://rpc.ankr.com/eth").await?;
//! let latest = client.latest_height().await?;
//! println!("Latest block: {latest}");
//! # Ok(())
//! # }
//! ```

use crate::error::{ScannerError, ScannerResult};
use crate::rpc::client::{ChainBlock, ChainClient, ChainLog, ChainReceipt, ChainTransaction};
use alloy::consensus::Transaction as _;
use alloy::network::TransactionResponse as _;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider as _, RootProvider};
use alloy::rpc::types::{BlockNumberOrTag, Log, Transaction, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Plain HTTP provider; the scanner only reads, so no fillers are attached.
pub type Provider = RootProvider;

/// Create a new RPC provider connected via HTTP.
///
/// # Errors
///
/// Returns an error if the RPC URL cannot be parsed.
#[allow(clippy::unused_async)]
#[instrument(skip(rpc_url), fields(rpc_host = tracing::field::Empty))]
pub async fn create_provider(rpc_url: &str) -> ScannerResult<Provider> {
    info!("Initializing RPC provider");

    let url: Url = rpc_url.parse().map_err(|e| {
        let msg = if rpc_url.starts_with("http") {
            format!("Failed to parse RPC URL: '{rpc_url}'")
        } else {
            format!("Invalid RPC URL: '{rpc_url}'. Expected an http(s) endpoint")
        };
        ScannerError::rpc(msg, Some(Box::new(e)))
    })?;

    // Record only the host so API keys in the path never reach the logs
    let host = url.host_str().unwrap_or("unknown").to_string();
    tracing::Span::current().record("rpc_host", host.as_str());
    debug!(rpc_host = %host, "Creating HTTP provider");

    let provider = RootProvider::new_http(url);

    info!("RPC provider initialized successfully");

    Ok(provider)
}

/// [`ChainClient`] backed by an Alloy HTTP provider.
#[derive(Debug, Clone)]
pub struct AlloyChainClient {
    provider: Provider,
}

impl AlloyChainClient {
    /// Wrap an existing provider.
    #[must_use]
    pub const fn new(provider: Provider) -> Self {
        Self { provider }
    }

    /// Build a provider for `rpc_url` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL is invalid.
    pub async fn connect(rpc_url: &str) -> ScannerResult<Self> {
        Ok(Self::new(create_provider(rpc_url).await?))
    }
}

fn to_chain_transaction(tx: &Transaction) -> ChainTransaction {
    ChainTransaction {
        hash: tx.tx_hash(),
        from: tx.from(),
        to: tx.to(),
        value: tx.value(),
        input: tx.input().clone(),
    }
}

fn to_chain_log(log: &Log) -> ChainLog {
    ChainLog {
        address: log.address(),
        topics: log.topics().to_vec(),
        data: log.data().data.clone(),
        removed: log.removed,
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn latest_height(&self) -> ScannerResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ScannerError::rpc("Failed to fetch latest block number", Some(Box::new(e))))
    }

    #[instrument(skip(self))]
    async fn block_by_height(&self, height: u64) -> ScannerResult<ChainBlock> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(height))
            .full()
            .await
            .map_err(|e| ScannerError::rpc(format!("Failed to fetch block {height}"), Some(Box::new(e))))?
            .ok_or_else(|| ScannerError::rpc(format!("Block {height} not found"), None))?;

        let transactions = block
            .transactions
            .as_transactions()
            .map(|txs| txs.iter().map(to_chain_transaction).collect())
            .unwrap_or_default();

        Ok(ChainBlock {
            number: block.header.number,
            hash: block.header.hash,
            timestamp: block.header.timestamp,
            transactions,
        })
    }

    #[instrument(skip(self), fields(tx = %hash))]
    async fn receipt_by_hash(&self, hash: B256) -> ScannerResult<ChainReceipt> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ScannerError::rpc(format!("Failed to fetch receipt {hash}"), Some(Box::new(e))))?
            .ok_or_else(|| ScannerError::rpc(format!("Receipt {hash} not found"), None))?;

        Ok(ChainReceipt {
            block_number: receipt.block_number,
            logs: receipt.logs().iter().map(to_chain_log).collect(),
        })
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> ScannerResult<Bytes> {
        let request = TransactionRequest::default().to(to).input(data.into());
        self.provider
            .call(request)
            .await
            .map_err(|e| ScannerError::rpc(format!("eth_call to {to} failed"), Some(Box::new(e))))
    }
}
