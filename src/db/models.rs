//! Database models that map to SQL tables.
//!
//! These structures represent rows in the database and provide
//! conversions from scanner types to database representations.

use crate::error::{ScannerError, ScannerResult};
use crate::scanner::amount::to_float;
use crate::swap::{SwapEvent, SwapTxType};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// A detected swap as stored in the `swap_events` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SwapRecord {
    /// Database-assigned unique identifier
    pub id: i64,
    /// Swap kind (`deposit`, `mint`, `burn`, `redeemed`)
    pub kind: String,
    /// Token route identifier
    pub pair_id: String,
    /// Transaction hash (lower-case hex with 0x prefix)
    pub tx_hash: String,
    /// Block number containing the transaction
    pub block_number: i64,
    /// Unix timestamp of the block
    pub block_time: i64,
    /// Raw amount (stored as TEXT for U256 precision)
    pub amount: String,
    /// Amount scaled by the token decimals
    pub famount: f64,
    /// User address (lower-case hex with 0x prefix)
    pub user: String,
    /// Destination-chain binding of a swap-out
    pub bind: Option<String>,
    /// Unix timestamp when record was created
    pub created_at: i64,
}

impl SwapRecord {
    /// Build the persisted form of `event`, scaling the display amount by
    /// `decimal`.
    #[must_use]
    pub fn new(kind: SwapTxType, pair_id: &str, event: &SwapEvent, decimal: u8) -> Self {
        Self {
            id: 0, // Will be set by database
            kind: kind.as_str().to_string(),
            pair_id: pair_id.to_string(),
            tx_hash: format!("{:?}", event.tx_hash),
            block_number: i64::try_from(event.block_number).unwrap_or(i64::MAX),
            block_time: i64::try_from(event.block_time).unwrap_or(i64::MAX),
            amount: event.amount.to_string(),
            famount: to_float(event.amount, decimal),
            user: format!("{:?}", event.user),
            bind: event.bind.clone(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Raw amount as an integer.
    ///
    /// # Errors
    ///
    /// Returns a decoding error if the stored text is not a decimal integer.
    pub fn amount_u256(&self) -> ScannerResult<U256> {
        U256::from_str_radix(&self.amount, 10).map_err(|e| {
            ScannerError::decoding(
                format!("Failed to parse amount: {}", self.amount),
                Some(Box::new(e)),
            )
        })
    }
}

/// Resumable scan position of both chain sides (the single `sync_info` row).
///
/// Heights are stored as signed integers; zero means "never recorded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncWatermark {
    /// First height the source scanner backfilled from
    pub src_start_height: i64,
    /// Source height below which every block has been scanned
    pub src_synced_height: i64,
    /// First height the destination scanner backfilled from
    pub dst_start_height: i64,
    /// Destination height below which every block has been scanned
    pub dst_synced_height: i64,
}

/// Result of persisting one swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// The `(kind, pair_id, tx_hash)` key already existed; nothing changed.
    Duplicate,
}
