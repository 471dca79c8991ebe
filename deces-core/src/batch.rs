//! Batch loading — partitions canonical records and commits each batch
//! independently.
//!
//! A failed batch is recorded and the next one is still attempted, so the
//! outcome sequence always has one entry per partition. Failure detection is
//! deferred to the run aggregate, never silent.

use crate::record::CanonicalRecord;
use crate::store::{CommitMode, RecordStore, StoreError};

/// Default number of records per commit, matching the store's comfortable
/// request size.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Result of committing one batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Zero-based position of the batch within the period.
    pub index: usize,
    /// Number of records in the batch.
    pub records: usize,
    /// Commit failure, if any.
    pub error: Option<StoreError>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate of one load pass.
#[derive(Debug)]
pub struct LoadSummary {
    /// One outcome per partition, in commit order.
    pub outcomes: Vec<BatchOutcome>,
    /// Records in batches that committed successfully.
    pub committed: usize,
}

impl LoadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(BatchOutcome::succeeded)
    }
}

/// Commit `records` in contiguous, order-preserving batches of at most
/// `batch_size`.
///
/// `observe` is called once per batch as its outcome is known, so progress
/// can be reported while the load is still running.
pub fn load_batches(
    store: &dyn RecordStore,
    records: &[CanonicalRecord],
    batch_size: usize,
    mode: CommitMode,
    mut observe: impl FnMut(&BatchOutcome),
) -> LoadSummary {
    let batch_size = batch_size.max(1);
    let mut outcomes = Vec::new();
    let mut committed = 0;

    for (index, chunk) in records.chunks(batch_size).enumerate() {
        let outcome = BatchOutcome {
            index,
            records: chunk.len(),
            error: store.commit(chunk, mode).err(),
        };
        if outcome.succeeded() {
            committed += chunk.len();
        }
        observe(&outcome);
        outcomes.push(outcome);
    }

    LoadSummary {
        outcomes,
        committed,
    }
}
