//! Scanning a single block.

use crate::config::TokenConfig;
use crate::db::{InsertOutcome, PersistenceWriter, SwapRecord};
use crate::error::ScannerResult;
use crate::rpc::{ChainTransaction, RetryingChainClient};
use crate::scanner::amount::DecimalCache;
use crate::scanner::classifier::{BlockContext, SwapClassifier};
use crate::scanner::dedup::DedupCache;
use crate::swap::{ChainSide, SwapEvent, SwapTxType};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// Which loop a block is scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Bounded range scan; the dedup cache is bypassed.
    Backfill,
    /// Head following; blocks already in the dedup cache are skipped.
    Tailing,
}

/// What happened to one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockReport {
    /// Transactions classified before the budget ran out
    pub scanned_txs: usize,
    /// Swaps handed to the persistence layer
    pub swaps: usize,
    /// Block was skipped because its hash was already scanned
    pub skipped: bool,
    /// Per-block budget expired before the last transaction
    pub timed_out: bool,
}

/// Scans blocks of one chain side against its token routes.
///
/// Cheap to clone; backfill workers each hold a clone and share the RPC
/// client, persistence writer, decimal memo and dedup cache.
#[derive(Clone)]
pub struct BlockProcessor {
    side: ChainSide,
    client: RetryingChainClient,
    writer: Arc<dyn PersistenceWriter>,
    tokens: Arc<[TokenConfig]>,
    decimals: Arc<DecimalCache>,
    dedup: Arc<Mutex<DedupCache>>,
    scan_receipt: bool,
    timeout: Duration,
}

impl std::fmt::Debug for BlockProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockProcessor")
            .field("side", &self.side)
            .field("tokens", &self.tokens.len())
            .field("scan_receipt", &self.scan_receipt)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BlockProcessor {
    /// Processor for `side` classifying against `tokens`.
    ///
    /// `timeout` bounds the time spent on one block's transactions.
    #[must_use]
    pub fn new(
        side: ChainSide,
        client: RetryingChainClient,
        writer: Arc<dyn PersistenceWriter>,
        tokens: Vec<TokenConfig>,
        scan_receipt: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            side,
            client,
            writer,
            tokens: tokens.into(),
            decimals: Arc::new(DecimalCache::new()),
            dedup: Arc::new(Mutex::new(DedupCache::default())),
            scan_receipt,
            timeout,
        }
    }

    /// Chain side this processor scans.
    #[must_use]
    pub const fn side(&self) -> ChainSide {
        self.side
    }

    /// Whether `hash` was recorded by a tailing scan.
    #[must_use]
    pub fn is_scanned(&self, hash: &alloy::primitives::B256) -> bool {
        self.dedup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_scanned(hash)
    }

    /// Fetch and scan the block at `height`.
    ///
    /// Transactions are classified in block order until the per-block
    /// budget runs out; the remainder of a timed-out block is not revisited.
    /// In tailing mode the block hash is recorded even after a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error only if the block cannot be fetched. Receipt and
    /// persistence failures are logged and scanning continues.
    #[instrument(skip(self), fields(side = %self.side))]
    pub async fn process_block(&self, height: u64, mode: ScanMode) -> ScannerResult<BlockReport> {
        let block = self.client.block_by_height(height).await?;

        if mode == ScanMode::Tailing && self.is_scanned(&block.hash) {
            trace!(height, hash = %block.hash, "block already scanned");
            return Ok(BlockReport {
                skipped: true,
                ..BlockReport::default()
            });
        }

        // An unrepresentable deadline means the block is never cut short
        let deadline = Instant::now().checked_add(self.timeout);
        let ctx = BlockContext::from(&block);
        let mut report = BlockReport::default();

        for tx in &block.transactions {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(
                    height,
                    scanned = report.scanned_txs,
                    total = block.transactions.len(),
                    "process block timeout"
                );
                report.timed_out = true;
                break;
            }
            report.swaps += self.process_tx(ctx, tx).await;
            report.scanned_txs += 1;
        }

        if mode == ScanMode::Tailing {
            self.dedup
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .add_block(block.hash);
        }

        if report.swaps > 0 {
            info!(height, txs = report.scanned_txs, swaps = report.swaps, "Block scanned");
        } else {
            debug!(height, txs = report.scanned_txs, "Block scanned");
        }
        Ok(report)
    }

    async fn process_tx(&self, ctx: BlockContext, tx: &ChainTransaction) -> usize {
        if tx.to.is_none() {
            return 0;
        }

        let receipt = if self.scan_receipt {
            match self.client.receipt_by_hash(tx.hash).await {
                Ok(receipt) => Some(receipt),
                Err(e) => {
                    warn!(tx = %tx.hash, error = %e, "get tx receipt failed, skipping tx");
                    return 0;
                }
            }
        } else {
            None
        };

        let classifier = SwapClassifier::new(&self.client);
        let mut swaps = 0;
        for token in self.tokens.iter() {
            match classifier.classify(ctx, tx, receipt.as_ref(), token).await {
                Ok((kind, event)) => {
                    self.persist(token, kind, &event).await;
                    swaps += 1;
                }
                Err(e) if e.is_expected() => {
                    debug!(tx = %tx.hash, pair_id = %token.pair_id, reason = %e, "tx not matched");
                }
                Err(e) => {
                    debug!(tx = %tx.hash, pair_id = %token.pair_id, reason = %e, "verify swap failed");
                }
            }
        }
        swaps
    }

    async fn persist(&self, token: &TokenConfig, kind: SwapTxType, event: &SwapEvent) {
        let decimal = self.decimals.resolve(token, &self.client).await;
        let record = SwapRecord::new(kind, &token.pair_id, event, decimal);

        let result = match kind {
            SwapTxType::Deposit => self.writer.add_deposit(&record).await,
            SwapTxType::Mint => self.writer.add_mint(&record).await,
            SwapTxType::Burn => self.writer.add_burn(&record).await,
            SwapTxType::Redeemed => self.writer.add_redeemed(&record).await,
        };

        match result {
            Ok(InsertOutcome::Inserted) => info!(
                kind = %kind,
                pair_id = %token.pair_id,
                tx = %record.tx_hash,
                height = event.block_number,
                amount = %record.amount,
                famount = record.famount,
                user = %record.user,
                "Swap recorded"
            ),
            Ok(InsertOutcome::Duplicate) => debug!(
                kind = %kind,
                pair_id = %token.pair_id,
                tx = %record.tx_hash,
                "Swap already recorded"
            ),
            Err(e) => warn!(
                kind = %kind,
                pair_id = %token.pair_id,
                tx = %record.tx_hash,
                error = %e,
                "Failed to record swap"
            ),
        }
    }
}
