//! Core of the INSEE death-record sync pipeline.
//!
//! - Canonical record shape shared by every schema era
//! - Closed set of historical schema dialects, selected by year
//! - Normalizer from decoded text to canonical records
//! - Archive extraction and charset decoding
//! - Source path policy (annual/monthly, legacy/new conventions)
//! - Fetcher and store boundaries, batch loading with per-batch outcomes

pub mod archive;
pub mod batch;
pub mod dialect;
pub mod fetch;
pub mod locate;
pub mod normalize;
pub mod record;
pub mod store;

pub use archive::{read_payload, ArchiveError};
pub use batch::{load_batches, BatchOutcome, LoadSummary, DEFAULT_BATCH_SIZE};
pub use dialect::{dialect_for_year, SchemaDialect};
pub use fetch::{ArchiveFetcher, FetchError, HttpFetcher, DEFAULT_BASE_URL};
pub use locate::{candidates, monthly_fallback, Period};
pub use normalize::{normalize, Normalized, NormalizeStats};
pub use record::{CanonicalRecord, Sexe};
pub use store::{CommitMode, RecordStore, StoreError, SupabaseStore, DEFAULT_TABLE};
