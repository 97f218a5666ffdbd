//! Backfill and tailing control for one chain side.
//!
//! ```text
//!   start_height != 0          end_height == 0
//!  ┌──────────────────┐       ┌───────────────────────────────┐
//!  │ bounded backfill │──────▶│ tail: latest → scan → advance │──┐
//!  │  (N workers)     │       └───────────────────────────────┘  │
//!  └──────────────────┘                     ▲         sleep      │
//!                                           └────────────────────┘
//! ```
//!
//! With an explicit `end_height` the backfill is awaited and the run ends
//! there. Without one, the backfill runs in the background up to the head
//! observed at startup while tailing continues from that head.

use crate::config::{ChainScanConfig, TokenConfig};
use crate::db::{PersistenceWriter, SyncReader, SyncWatermark};
use crate::error::ScannerResult;
use crate::rpc::{ChainClient, RetryingChainClient};
use crate::scanner::partition::partition;
use crate::scanner::processor::{BlockProcessor, ScanMode};
use crate::swap::ChainSide;
use futures_util::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one backfill worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReport {
    /// Heights assigned to the worker
    pub range: Range<u64>,
    /// Blocks scanned
    pub scanned: u64,
    /// Heights skipped because the block could not be fetched
    pub failed: Vec<u64>,
}

/// Resolve a sign-encoded start height against the backfill end.
///
/// `0` disables backfill, a positive value is absolute and a negative value
/// counts back from `end` (the explicit end height, or the chain head),
/// stopping at genesis.
#[must_use]
pub const fn resolve_start_height(start_height: i64, end: u64) -> Option<u64> {
    if start_height > 0 {
        Some(start_height.unsigned_abs())
    } else if start_height < 0 {
        Some(end.saturating_sub(start_height.unsigned_abs()))
    } else {
        None
    }
}

/// Drives scanning of one chain side.
pub struct ScanOrchestrator {
    side: ChainSide,
    config: ChainScanConfig,
    client: RetryingChainClient,
    processor: BlockProcessor,
    reader: Arc<dyn SyncReader>,
    writer: Arc<dyn PersistenceWriter>,
}

impl std::fmt::Debug for ScanOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOrchestrator")
            .field("side", &self.side)
            .field("config", &self.config)
            .field("processor", &self.processor)
            .finish_non_exhaustive()
    }
}

impl ScanOrchestrator {
    /// Orchestrator for `side`, scanning `tokens` over `chain`.
    #[must_use]
    pub fn new<S>(
        side: ChainSide,
        config: ChainScanConfig,
        tokens: Vec<TokenConfig>,
        chain: Arc<dyn ChainClient>,
        store: Arc<S>,
    ) -> Self
    where
        S: SyncReader + PersistenceWriter + 'static,
    {
        let client =
            RetryingChainClient::new(chain, config.rpc_interval(), config.rpc_retry_count);
        let processor = BlockProcessor::new(
            side,
            client.clone(),
            store.clone(),
            tokens,
            config.scan_receipt,
            config.process_block_timeout(),
        );
        Self {
            side,
            config,
            client,
            processor,
            reader: store.clone(),
            writer: store,
        }
    }

    /// The processor used by this orchestrator's workers.
    #[must_use]
    pub const fn processor(&self) -> &BlockProcessor {
        &self.processor
    }

    /// Run the configured phases.
    ///
    /// Returns once a backfill with an explicit end height completes;
    /// otherwise tails the chain until the task is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the backfill range is empty or reversed.
    #[instrument(skip(self), fields(side = %self.side))]
    pub async fn run(&self) -> ScannerResult<()> {
        let watermark = match self.reader.get_sync_watermark().await {
            Ok(watermark) => watermark,
            Err(e) => {
                warn!(error = %e, "Failed to read sync watermark, starting fresh");
                SyncWatermark::default()
            }
        };

        let backfill_end = self.start_backfill().await?;
        if self.config.end_height > 0 {
            info!(end = self.config.end_height, "Bounded scan finished");
            return Ok(());
        }

        let mut height = self.tail_start(backfill_end, &watermark).await;
        info!(height, stable = self.config.stable_height, "Tailing chain");
        loop {
            height = self.tail_step(height).await;
            tokio::time::sleep(self.config.tail_interval()).await;
        }
    }

    /// Launch the configured backfill, if any, and return its end height.
    async fn start_backfill(&self) -> ScannerResult<Option<u64>> {
        if self.config.start_height == 0 {
            return Ok(None);
        }

        let bounded = self.config.end_height > 0;
        let end = if bounded {
            self.config.end_height
        } else {
            self.client.latest_height().await
        };
        let Some(start) = resolve_start_height(self.config.start_height, end) else {
            return Ok(None);
        };
        if !bounded && start >= end {
            info!(start, latest = end, "Nothing to backfill below head");
            return Ok(Some(start));
        }

        let start_i64 = i64::try_from(start).unwrap_or(i64::MAX);
        let recorded = match self.side {
            ChainSide::Src => self.writer.set_start_height(start_i64, 0).await,
            ChainSide::Dst => self.writer.set_start_height(0, start_i64).await,
        };
        if let Err(e) = recorded {
            warn!(start, error = %e, "Failed to record start height");
        }

        self.backfill(start, end, bounded).await?;
        Ok(Some(end))
    }

    /// Scan `[start, end)` with `job_count` concurrent workers.
    ///
    /// With `wait` the reports of every worker are returned; otherwise the
    /// workers are left running and an empty list is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or reversed.
    pub async fn backfill(&self, start: u64, end: u64, wait: bool) -> ScannerResult<Vec<RangeReport>> {
        let ranges = partition(start, end, self.config.job_count)?;
        info!(start, end, jobs = ranges.len(), wait, "Starting backfill");

        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| tokio::spawn(scan_range(self.processor.clone(), range)))
            .collect();
        if !wait {
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!(error = %e, "Backfill worker panicked"),
            }
        }
        info!(start, end, "Backfill finished");
        Ok(reports)
    }

    async fn tail_start(&self, backfill_end: Option<u64>, watermark: &SyncWatermark) -> u64 {
        if let Some(end) = backfill_end {
            return end;
        }
        let stored = match self.side {
            ChainSide::Src => watermark.src_synced_height,
            ChainSide::Dst => watermark.dst_synced_height,
        };
        match u64::try_from(stored) {
            Ok(height) if height > 0 => {
                info!(height, "Resuming from stored synced height");
                height
            }
            _ => self.client.latest_height().await,
        }
    }

    /// One tailing iteration starting at `watermark`; returns the new
    /// watermark.
    ///
    /// Every height up to the head is scanned. The watermark then moves to
    /// `head - stable_height` when that is ahead of it, and the move is
    /// persisted.
    pub async fn tail_step(&self, watermark: u64) -> u64 {
        let latest = self.client.latest_height().await;

        for height in watermark..=latest {
            if let Err(e) = self.processor.process_block(height, ScanMode::Tailing).await {
                warn!(height, error = %e, "Skipping block");
            }
        }

        let stable = latest.saturating_sub(self.config.stable_height);
        if stable <= watermark {
            return watermark;
        }

        debug!(from = watermark, to = stable, "Advancing synced height");
        let synced = i64::try_from(stable).unwrap_or(i64::MAX);
        let persisted = match self.side {
            ChainSide::Src => self.writer.update_synced_height(synced, 0).await,
            ChainSide::Dst => self.writer.update_synced_height(0, synced).await,
        };
        if let Err(e) = persisted {
            warn!(height = stable, error = %e, "Failed to update synced height");
        }
        stable
    }
}

async fn scan_range(processor: BlockProcessor, range: Range<u64>) -> RangeReport {
    debug!(side = %processor.side(), from = range.start, to = range.end, "Worker started");
    let mut report = RangeReport {
        range: range.clone(),
        scanned: 0,
        failed: Vec::new(),
    };
    for height in range {
        match processor.process_block(height, ScanMode::Backfill).await {
            Ok(_) => report.scanned += 1,
            Err(e) => {
                warn!(height, error = %e, "Skipping block");
                report.failed.push(height);
            }
        }
    }
    debug!(
        side = %processor.side(),
        from = report.range.start,
        to = report.range.end,
        failed = report.failed.len(),
        "Worker finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{native_token, scan_config, tx, MockChain, RecordingSink, DEPOSIT, USER};
    use alloy::primitives::Bytes;

    fn orchestrator(
        chain: &Arc<MockChain>,
        sink: &Arc<RecordingSink>,
        config: ChainScanConfig,
    ) -> ScanOrchestrator {
        ScanOrchestrator::new(
            ChainSide::Src,
            config,
            vec![native_token("eth")],
            chain.clone(),
            sink.clone(),
        )
    }

    fn seed_blocks(chain: &MockChain, heights: Range<u64>) {
        for height in heights {
            let deposit = tx(USER, Some(DEPOSIT), Bytes::new());
            chain.push_block(MockChain::block(height, vec![deposit]));
        }
    }

    #[test]
    fn test_resolve_start_height() {
        assert_eq!(resolve_start_height(0, 500), None);
        assert_eq!(resolve_start_height(120, 500), Some(120));
        assert_eq!(resolve_start_height(-200, 500), Some(300));
        assert_eq!(resolve_start_height(-900, 500), Some(0));
    }

    #[tokio::test]
    async fn test_backfill_visits_every_height_once() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        seed_blocks(&chain, 0..10);

        let mut config = scan_config();
        config.job_count = 3;
        let reports = orchestrator(&chain, &sink, config)
            .backfill(0, 10, true)
            .await
            .unwrap();

        let ranges: Vec<_> = reports.iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
        assert!((0..10).all(|h| chain.block_calls(h) == 1));
        assert_eq!(sink.swaps().len(), 10);
    }

    #[tokio::test]
    async fn test_exhausted_block_is_skipped() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        seed_blocks(&chain, 0..4);
        chain.fail_block(2, u32::MAX);

        let reports = orchestrator(&chain, &sink, scan_config())
            .backfill(0, 4, true)
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].failed, vec![2]);
        assert_eq!(reports[0].scanned, 3);
        assert_eq!(chain.block_calls(2), 5);
        assert_eq!(chain.block_calls(3), 1);
    }

    #[tokio::test]
    async fn test_reversed_range_is_fatal() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());

        let result = orchestrator(&chain, &sink, scan_config())
            .backfill(10, 5, true)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bounded_run_records_start_and_returns() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        seed_blocks(&chain, 5..8);
        chain.set_latest(100);

        let mut config = scan_config();
        config.start_height = 5;
        config.end_height = 8;
        orchestrator(&chain, &sink, config).run().await.unwrap();

        assert_eq!(sink.start_heights(), vec![(5, 0)]);
        assert_eq!(sink.swaps().len(), 3);
        assert!(sink.synced_updates().is_empty());
    }

    #[tokio::test]
    async fn test_negative_start_counts_back_from_end_height() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        seed_blocks(&chain, 5..8);
        chain.set_latest(100);

        let mut config = scan_config();
        config.start_height = -3;
        config.end_height = 8;
        orchestrator(&chain, &sink, config).run().await.unwrap();

        assert_eq!(sink.start_heights(), vec![(5, 0)]);
        assert!((5..8).all(|h| chain.block_calls(h) == 1));
        assert_eq!(sink.swaps().len(), 3);
    }

    #[tokio::test]
    async fn test_tail_step_advances_behind_stable_margin() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        seed_blocks(&chain, 10..21);
        chain.set_latest(20);

        let mut config = scan_config();
        config.stable_height = 5;
        let orchestrator = orchestrator(&chain, &sink, config);

        let watermark = orchestrator.tail_step(10).await;
        assert_eq!(watermark, 15);
        assert_eq!(sink.synced_updates(), vec![(15, 0)]);
        assert_eq!(sink.swaps().len(), 11);

        // Overlap with the previous pass is skipped, watermark holds
        let watermark = orchestrator.tail_step(watermark).await;
        assert_eq!(watermark, 15);
        assert_eq!(sink.synced_updates().len(), 1);
        assert_eq!(sink.swaps().len(), 11);
    }

    #[tokio::test]
    async fn test_tail_resumes_from_stored_watermark() {
        let chain = Arc::new(MockChain::new());
        let sink = Arc::new(RecordingSink::new());
        chain.set_latest(900);
        let watermark = SyncWatermark {
            src_synced_height: 640,
            ..SyncWatermark::default()
        };

        let orchestrator = orchestrator(&chain, &sink, scan_config());

        assert_eq!(orchestrator.tail_start(None, &watermark).await, 640);
        assert_eq!(orchestrator.tail_start(Some(700), &watermark).await, 700);
        assert_eq!(
            orchestrator.tail_start(None, &SyncWatermark::default()).await,
            900
        );
    }
}
