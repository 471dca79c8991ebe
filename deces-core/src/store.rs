//! Record store boundary.
//!
//! The trait abstracts over the hosted relational store so the batch loader
//! and orchestrator can run against an in-memory double. `SupabaseStore`
//! talks PostgREST: rows go up as JSON arrays, and upsert mode is expressed
//! through the `on_conflict` parameter plus the merge-duplicates preference.

use thiserror::Error;

use crate::record::CanonicalRecord;

/// Target table for normalized rows.
pub const DEFAULT_TABLE: &str = "insee_deces";

/// The field tuple identifying "the same logical record" for upsert mode.
///
/// Only the nominative era fills the whole tuple; older eras upsert on a
/// tuple of nulls, which PostgREST treats per the table's unique index.
pub const CONFLICT_KEY: &[&str] = &[
    "nom",
    "prenoms",
    "date_naissance",
    "date_deces",
    "numero_acte",
];

/// How a batch is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Plain insert; duplicates are rejected by the store.
    Insert,
    /// Insert-or-update on [`CONFLICT_KEY`].
    Upsert,
}

/// Store-side commit failures. Recorded per batch; never aborts the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("store rejected batch (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },
}

/// Trait for the external record store.
pub trait RecordStore {
    fn commit(&self, records: &[CanonicalRecord], mode: CommitMode) -> Result<(), StoreError>;
}

/// PostgREST-compatible store client (Supabase-hosted in production).
pub struct SupabaseStore {
    client: reqwest::blocking::Client,
    base_url: String,
    key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>, table: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            key: key.into(),
            table: table.into(),
        }
    }
}

impl RecordStore for SupabaseStore {
    fn commit(&self, records: &[CanonicalRecord], mode: CommitMode) -> Result<(), StoreError> {
        let url = format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        );

        let mut request = self
            .client
            .post(&url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(records);

        request = match mode {
            CommitMode::Insert => request.header("Prefer", "return=minimal"),
            CommitMode::Upsert => request
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .query(&[("on_conflict", CONFLICT_KEY.join(","))]),
        };

        let response = request
            .send()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response
            .text()
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(StoreError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
