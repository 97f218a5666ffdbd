//! Chain access seam used by the scanning engine.
//!
//! The scanner never talks to Alloy directly. It consumes the four calls of
//! [`ChainClient`] and a reduced view of blocks, transactions and receipts,
//! which keeps the classifier testable against scripted chain data.

use crate::error::ScannerResult;
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

/// A block with its full transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    /// Block height
    pub number: u64,
    /// Block hash
    pub hash: B256,
    /// Header timestamp (Unix seconds)
    pub timestamp: u64,
    /// Transactions in block order
    pub transactions: Vec<ChainTransaction>,
}

/// The transaction fields the classifier inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransaction {
    /// Transaction hash
    pub hash: B256,
    /// Recovered sender
    pub from: Address,
    /// Recipient; `None` for contract creation
    pub to: Option<Address>,
    /// Native value transferred
    pub value: U256,
    /// Call data
    pub input: Bytes,
}

/// Receipt logs of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReceipt {
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Emitted logs in order
    pub logs: Vec<ChainLog>,
}

/// One receipt log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLog {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics, signature first
    pub topics: Vec<B256>,
    /// Non-indexed data
    pub data: Bytes,
    /// Whether the log was dropped by a reorg
    pub removed: bool,
}

/// Primitive chain queries consumed by the scanner.
///
/// Implementations must be safe for concurrent use; backfill workers share
/// one client.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current head height.
    async fn latest_height(&self) -> ScannerResult<u64>;

    /// Block at `height` with full transactions.
    async fn block_by_height(&self, height: u64) -> ScannerResult<ChainBlock>;

    /// Receipt of the transaction `hash`.
    async fn receipt_by_hash(&self, hash: B256) -> ScannerResult<ChainReceipt>;

    /// Read-only `eth_call` against `to` at the latest block.
    async fn call_contract(&self, to: Address, data: Bytes) -> ScannerResult<Bytes>;
}
