//! Recently scanned block hashes.

use alloy::primitives::B256;

/// Default number of remembered block hashes.
pub const DEFAULT_DEDUP_CAPACITY: usize = 100;

/// Fixed-capacity FIFO ring of block hashes.
///
/// Only the tailing loop consults it, to skip blocks revisited inside the
/// stable-height margin. Callers share it behind a mutex.
#[derive(Debug, Clone)]
pub struct DedupCache {
    hashes: Vec<Option<B256>>,
    next: usize,
}

impl DedupCache {
    /// Empty cache remembering up to `capacity` hashes (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            hashes: vec![None; capacity.max(1)],
            next: 0,
        }
    }

    /// Record `hash`, evicting the oldest entry once full.
    pub fn add_block(&mut self, hash: B256) {
        self.hashes[self.next] = Some(hash);
        self.next = (self.next + 1) % self.hashes.len();
    }

    /// Whether `hash` is within the current window.
    #[must_use]
    pub fn is_scanned(&self, hash: &B256) -> bool {
        self.hashes.iter().any(|h| h.as_ref() == Some(hash))
    }

    /// Maximum number of remembered hashes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.hashes.len()
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}
