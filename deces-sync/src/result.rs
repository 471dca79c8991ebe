//! Aggregate result of a sync run.

use thiserror::Error;

use deces_core::archive::ArchiveError;
use deces_core::fetch::FetchError;
use deces_core::locate::Period;

/// Why a period failed. Store-side failures are tracked per batch in
/// [`FailedBatch`], not here — a batch failure does not stop its period.
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// One batch that the store rejected, attributed to its period.
#[derive(Debug)]
pub struct FailedBatch {
    pub period: Period,
    pub batch_index: usize,
    pub records: usize,
    pub detail: String,
}

/// Totals and failures accumulated over a whole run.
#[derive(Debug, Default)]
pub struct SyncResult {
    /// Records in batches that committed successfully.
    pub total_committed: usize,
    /// Annual periods processed.
    pub periods_processed: usize,
    /// Periods where no candidate path existed, in request order.
    pub missing_periods: Vec<Period>,
    /// Periods that failed to fetch or decode, in request order.
    pub failed_periods: Vec<(Period, SyncFailure)>,
    /// Batches the store rejected, in commit order.
    pub failed_batches: Vec<FailedBatch>,
    /// Overall outcome under the run's missing-period policy.
    pub success: bool,
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Whether anything at all went wrong, missing periods included.
    pub fn has_problems(&self) -> bool {
        !self.missing_periods.is_empty()
            || !self.failed_periods.is_empty()
            || !self.failed_batches.is_empty()
    }
}
