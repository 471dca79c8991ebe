//! Sync orchestration for the INSEE death-record pipeline.
//!
//! - Run configuration from environment and CLI overrides
//! - Period iteration with monthly fallback
//! - Failure aggregation and the overall run outcome
//! - Progress reporting hooks

pub mod config;
pub mod progress;
pub mod result;
pub mod runner;

pub use config::{ConfigError, MissingPolicy, SyncConfig};
pub use progress::{StdoutProgress, SyncProgress};
pub use result::{FailedBatch, SyncFailure, SyncResult};
pub use runner::run_sync;
