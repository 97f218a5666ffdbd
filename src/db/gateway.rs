//! Narrow persistence capabilities consumed by the scanner.
//!
//! The orchestrator only reads the watermark ([`SyncReader`]) and the block
//! processor only writes ([`PersistenceWriter`]). Read-side queries used by
//! operators live in [`SwapQuery`].

use super::models::{InsertOutcome, SwapRecord, SyncWatermark};
use crate::error::ScannerResult;
use crate::swap::SwapTxType;
use async_trait::async_trait;

/// Read access to the stored sync watermark.
#[async_trait]
pub trait SyncReader: Send + Sync {
    /// Current watermark of both chain sides.
    async fn get_sync_watermark(&self) -> ScannerResult<SyncWatermark>;
}

/// Write access used while scanning.
///
/// Re-inserting an existing swap is not an error; it reports
/// [`InsertOutcome::Duplicate`].
#[async_trait]
pub trait PersistenceWriter: Send + Sync {
    /// Record backfill start heights. A side's start height is set once;
    /// pass 0 to leave a side untouched.
    async fn set_start_height(&self, src_start: i64, dst_start: i64) -> ScannerResult<()>;

    /// Advance synced heights. Stored heights never decrease; pass 0 to
    /// leave a side untouched.
    async fn update_synced_height(&self, src_synced: i64, dst_synced: i64) -> ScannerResult<()>;

    /// Persist one swap of `kind` under `record.pair_id`.
    async fn add_swap(&self, kind: SwapTxType, record: &SwapRecord) -> ScannerResult<InsertOutcome>;

    /// Persist a source-chain deposit.
    async fn add_deposit(&self, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        self.add_swap(SwapTxType::Deposit, record).await
    }

    /// Persist a destination-chain swap-in.
    async fn add_mint(&self, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        self.add_swap(SwapTxType::Mint, record).await
    }

    /// Persist a destination-chain swap-out.
    async fn add_burn(&self, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        self.add_swap(SwapTxType::Burn, record).await
    }

    /// Persist a source-chain redemption.
    async fn add_redeemed(&self, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        self.add_swap(SwapTxType::Redeemed, record).await
    }
}

/// Read-side queries over persisted swaps.
#[async_trait]
pub trait SwapQuery: Send + Sync {
    /// Swaps of `kind` recorded for transaction `tx_hash` (any pair).
    async fn find_swaps_by_tx(&self, kind: SwapTxType, tx_hash: &str) -> ScannerResult<Vec<SwapRecord>>;

    /// Swaps of `kind` for `pair_id` with `start <= block_number < end`.
    async fn find_swaps_in_block_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>>;

    /// Swaps of `kind` for `pair_id` with `start <= block_time < end`.
    async fn find_swaps_in_time_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>>;

    /// Swaps of `kind` for `pair_id` by `user` with `start <= block_time < end`.
    async fn find_user_swaps_in_time_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        user: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>>;
}
