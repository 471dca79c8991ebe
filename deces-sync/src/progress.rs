//! Progress reporting for sync runs.
//!
//! The orchestrator reports every event as it happens through this trait so
//! the CLI can print live progress and tests can record the sequence. All
//! hooks default to no-ops; doubles implement only what they assert on.

use deces_core::batch::BatchOutcome;
use deces_core::locate::Period;

use crate::result::{SyncFailure, SyncResult};

/// Callback hooks for run progress.
pub trait SyncProgress {
    /// A period is about to be fetched.
    fn on_period_start(&self, _period: &Period) {}

    /// A candidate path was absent; the next one will be tried.
    fn on_candidate_missing(&self, _period: &Period, _path: &str) {}

    /// The annual archive was absent; monthly archives will be tried.
    fn on_monthly_fallback(&self, _year: i32) {}

    /// A period's file was parsed; `records` rows are about to be loaded.
    fn on_period_parsed(&self, _period: &Period, _records: usize) {}

    /// One batch finished committing (successfully or not).
    fn on_batch(&self, _period: &Period, _outcome: &BatchOutcome) {}

    /// No candidate path for the period exists at all.
    fn on_period_missing(&self, _period: &Period) {}

    /// The period failed to fetch or decode.
    fn on_period_failed(&self, _period: &Period, _failure: &SyncFailure) {}

    /// The period completed; `committed` records were stored.
    fn on_period_complete(&self, _period: &Period, _committed: usize) {}

    /// The run is over; called exactly once with the aggregate.
    fn on_run_complete(&self, _result: &SyncResult) {}
}

/// Progress reporter that prints to stdout, one line per event.
pub struct StdoutProgress;

impl SyncProgress for StdoutProgress {
    fn on_period_start(&self, period: &Period) {
        println!("=== {period} ===");
    }

    fn on_candidate_missing(&self, _period: &Period, path: &str) {
        println!("  {path} not found, trying next candidate");
    }

    fn on_monthly_fallback(&self, year: i32) {
        println!("  no annual archive for {year}, trying monthly files");
    }

    fn on_period_parsed(&self, period: &Period, records: usize) {
        println!("  {records} records found for {period}");
    }

    fn on_batch(&self, _period: &Period, outcome: &BatchOutcome) {
        match &outcome.error {
            None => println!("  batch {}: {} records committed", outcome.index + 1, outcome.records),
            Some(e) => println!("  batch {}: FAILED: {e}", outcome.index + 1),
        }
    }

    fn on_period_missing(&self, period: &Period) {
        println!("  no archive published for {period}");
    }

    fn on_period_failed(&self, period: &Period, failure: &SyncFailure) {
        println!("  FAILED {period}: {failure}");
    }

    fn on_period_complete(&self, period: &Period, committed: usize) {
        println!("  {period} done: {committed} records committed");
    }

    fn on_run_complete(&self, result: &SyncResult) {
        println!();
        println!("Sync complete: {} records committed", result.total_committed);
        if !result.missing_periods.is_empty() {
            let missing: Vec<String> = result
                .missing_periods
                .iter()
                .map(Period::to_string)
                .collect();
            println!("Missing periods: {}", missing.join(", "));
        }
        for (period, failure) in &result.failed_periods {
            println!("Failed period {period}: {failure}");
        }
        for batch in &result.failed_batches {
            println!(
                "Failed batch {} of {} ({} records): {}",
                batch.batch_index + 1,
                batch.period,
                batch.records,
                batch.detail
            );
        }
        println!("Outcome: {}", if result.success { "OK" } else { "FAILURE" });
    }
}
