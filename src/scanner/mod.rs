//! The scanning engine.
//!
//! ```text
//! ScanOrchestrator ── partition ──▶ workers ─┐
//!        │                                   ├─▶ BlockProcessor ─▶ SwapClassifier
//!        └── tailing loop (DedupCache) ──────┘          │
//!                                                       └─▶ PersistenceWriter
//! ```
//!
//! - [`partition`]: split a backfill interval across workers
//! - [`DedupCache`]: recently scanned block hashes for the tailing loop
//! - [`classifier`]: per-route swap classification
//! - [`BlockProcessor`]: scans one block under a time budget
//! - [`ScanOrchestrator`]: backfill and tailing for one chain side
//! - [`amount`]: display amounts and decimal resolution

pub mod amount;
pub mod classifier;
pub mod dedup;
pub mod orchestrator;
pub mod partition;
pub mod processor;

pub use amount::{to_float, DecimalCache};
pub use classifier::{classify_tx, BlockContext, SwapClassifier};
pub use dedup::{DedupCache, DEFAULT_DEDUP_CAPACITY};
pub use orchestrator::{resolve_start_height, RangeReport, ScanOrchestrator};
pub use partition::partition;
pub use processor::{BlockProcessor, BlockReport, ScanMode};
