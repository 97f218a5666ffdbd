//! Retry policies around a [`ChainClient`].
//!
//! | Call            | Policy                                 |
//! |-----------------|----------------------------------------|
//! | latest height   | retry forever, fixed interval          |
//! | block / receipt | `attempts` tries, fixed interval       |
//! | contract call   | single attempt                         |
//!
//! The wrapper keeps no mutable state, so one instance is shared by every
//! worker of a chain side.

use crate::error::{ScannerError, ScannerResult};
use crate::rpc::client::{ChainBlock, ChainClient, ChainReceipt};
use alloy::primitives::{Address, Bytes, B256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default pause between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of attempts for bounded calls.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;

/// [`ChainClient`] decorated with the scanner's retry policies.
#[derive(Clone)]
pub struct RetryingChainClient {
    inner: Arc<dyn ChainClient>,
    interval: Duration,
    attempts: u32,
}

impl std::fmt::Debug for RetryingChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingChainClient")
            .field("interval", &self.interval)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl RetryingChainClient {
    /// Wrap `inner` with the given retry interval and bounded attempt count.
    ///
    /// An `attempts` of zero is treated as one.
    #[must_use]
    pub fn new(inner: Arc<dyn ChainClient>, interval: Duration, attempts: u32) -> Self {
        Self {
            inner,
            interval,
            attempts: attempts.max(1),
        }
    }

    /// Wrap `inner` with the default 1s interval and 5 attempts.
    #[must_use]
    pub fn with_defaults(inner: Arc<dyn ChainClient>) -> Self {
        Self::new(inner, DEFAULT_RETRY_INTERVAL, DEFAULT_RETRY_ATTEMPTS)
    }

    /// Current head height. Never gives up: the scanner stalls rather than
    /// advancing on stale data.
    pub async fn latest_height(&self) -> u64 {
        let mut attempt: u64 = 0;
        loop {
            match self.inner.latest_height().await {
                Ok(height) => return height,
                Err(e) => {
                    attempt += 1;
                    warn!(attempt, error = %e, "get latest block number failed, retrying");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }

    /// Block at `height`, retried up to the bounded attempt count.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::RetryExhausted`] when every attempt failed.
    pub async fn block_by_height(&self, height: u64) -> ScannerResult<ChainBlock> {
        self.bounded(&format!("get block {height}"), || {
            self.inner.block_by_height(height)
        })
        .await
    }

    /// Receipt of `hash`, retried up to the bounded attempt count.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::RetryExhausted`] when every attempt failed.
    pub async fn receipt_by_hash(&self, hash: B256) -> ScannerResult<ChainReceipt> {
        self.bounded(&format!("get tx receipt {hash}"), || {
            self.inner.receipt_by_hash(hash)
        })
        .await
    }

    /// Single-attempt contract call.
    ///
    /// # Errors
    ///
    /// Returns the underlying client's error unchanged.
    pub async fn call_contract(&self, to: Address, data: Bytes) -> ScannerResult<Bytes> {
        self.inner.call_contract(to, data).await
    }

    async fn bounded<T, F, Fut>(&self, operation: &str, mut call: F) -> ScannerResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ScannerResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.attempts {
                        warn!(operation, attempts = attempt, error = %e, "giving up");
                        return Err(ScannerError::retry_exhausted(
                            operation,
                            attempt,
                            e.to_string(),
                        ));
                    }
                    debug!(
                        operation,
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "RPC call failed, retrying"
                    );
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}
