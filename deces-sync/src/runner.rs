//! Sync orchestrator — iterates the requested period range, running
//! locate → fetch → decode → normalize → load for each period.
//!
//! Periods are independent: any failure is contained at the smallest
//! granularity that keeps the run progressing (row < batch < period < run)
//! and accumulated into the aggregate. Processing is strictly sequential —
//! one period at a time, one batch at a time — so every failure is
//! attributable to exactly one period.

use deces_core::archive::read_payload;
use deces_core::batch::load_batches;
use deces_core::dialect::dialect_for_year;
use deces_core::fetch::ArchiveFetcher;
use deces_core::locate::{candidates, monthly_fallback, Period};
use deces_core::normalize::normalize;
use deces_core::store::RecordStore;

use crate::config::{MissingPolicy, SyncConfig};
use crate::progress::SyncProgress;
use crate::result::{FailedBatch, SyncFailure, SyncResult};

/// What happened to one period.
enum PeriodOutcome {
    /// A file was fetched and loaded; batch failures, if any, are listed.
    Loaded {
        committed: usize,
        failed_batches: Vec<FailedBatch>,
    },
    /// No candidate path exists.
    Missing,
    /// Fetching or decoding failed.
    Failed(SyncFailure),
}

/// Run a full sync over the configured year range.
///
/// The fetcher and store are passed in, constructed by the caller for the
/// lifetime of this one run.
pub fn run_sync(
    fetcher: &dyn ArchiveFetcher,
    store: &dyn RecordStore,
    config: &SyncConfig,
    progress: &dyn SyncProgress,
) -> SyncResult {
    let mut result = SyncResult::default();

    for year in config.years() {
        let period = Period::annual(year);
        progress.on_period_start(&period);
        result.periods_processed += 1;

        match process_period(fetcher, store, config, &period, progress) {
            PeriodOutcome::Loaded {
                committed,
                failed_batches,
            } => {
                result.total_committed += committed;
                result.failed_batches.extend(failed_batches);
                progress.on_period_complete(&period, committed);
            }
            PeriodOutcome::Failed(failure) => {
                progress.on_period_failed(&period, &failure);
                result.failed_periods.push((period, failure));
            }
            PeriodOutcome::Missing => match monthly_fallback(year) {
                Some(months) => {
                    progress.on_monthly_fallback(year);
                    run_monthly(fetcher, store, config, &months, progress, &mut result);
                }
                None => {
                    progress.on_period_missing(&period);
                    result.missing_periods.push(period);
                }
            },
        }
    }

    result.success = result.failed_periods.is_empty()
        && result.failed_batches.is_empty()
        && (config.missing_policy == MissingPolicy::Allow || result.missing_periods.is_empty());

    progress.on_run_complete(&result);
    result
}

/// Process a year month by month after its annual archive turned out to be
/// absent. Individual missing months are normal (publication is partial
/// mid-year); only a year with no data at all is recorded as missing.
fn run_monthly(
    fetcher: &dyn ArchiveFetcher,
    store: &dyn RecordStore,
    config: &SyncConfig,
    months: &[Period],
    progress: &dyn SyncProgress,
    result: &mut SyncResult,
) {
    let mut any_loaded = false;
    let mut any_failed = false;

    for period in months {
        match process_period(fetcher, store, config, period, progress) {
            PeriodOutcome::Loaded {
                committed,
                failed_batches,
            } => {
                any_loaded = true;
                result.total_committed += committed;
                result.failed_batches.extend(failed_batches);
                progress.on_period_complete(period, committed);
            }
            PeriodOutcome::Failed(failure) => {
                any_failed = true;
                progress.on_period_failed(period, &failure);
                result.failed_periods.push((*period, failure));
            }
            PeriodOutcome::Missing => {}
        }
    }

    if !any_loaded && !any_failed {
        let year = Period::annual(months[0].year);
        progress.on_period_missing(&year);
        result.missing_periods.push(year);
    }
}

/// Run one period through the whole pipeline.
fn process_period(
    fetcher: &dyn ArchiveFetcher,
    store: &dyn RecordStore,
    config: &SyncConfig,
    period: &Period,
    progress: &dyn SyncProgress,
) -> PeriodOutcome {
    let dialect = dialect_for_year(period.year);

    for path in candidates(period) {
        let bytes = match fetcher.fetch(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                progress.on_candidate_missing(period, &path);
                continue;
            }
            Err(e) => return PeriodOutcome::Failed(e.into()),
        };

        let text = match read_payload(&bytes, dialect.encoding) {
            Ok(text) => text,
            Err(e) => return PeriodOutcome::Failed(e.into()),
        };

        let normalized = normalize(&text, dialect, period.year);
        progress.on_period_parsed(period, normalized.records.len());

        let summary = load_batches(
            store,
            &normalized.records,
            config.batch_size,
            config.mode,
            |outcome| progress.on_batch(period, outcome),
        );

        let failed_batches = summary
            .outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded())
            .map(|outcome| FailedBatch {
                period: *period,
                batch_index: outcome.index,
                records: outcome.records,
                detail: outcome
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            })
            .collect();

        return PeriodOutcome::Loaded {
            committed: summary.committed,
            failed_batches,
        };
    }

    PeriodOutcome::Missing
}
