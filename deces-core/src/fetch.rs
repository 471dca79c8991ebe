//! Archive fetcher boundary.
//!
//! The trait abstracts over the remote file host so the orchestrator can be
//! driven by a test double. `HttpFetcher` is the real implementation: plain
//! HTTPS GET against the INSEE statistics host with a long timeout — the
//! annual archives run to hundreds of megabytes.

use std::time::Duration;

use thiserror::Error;

/// Default archive host, from the INSEE "fichier des personnes décédées"
/// publication page.
pub const DEFAULT_BASE_URL: &str = "https://www.insee.fr/fr/statistiques/fichier/4190491";

/// Fetch failures, split along the line the orchestrator cares about:
/// `NotFound` triggers candidate fallback, everything else fails the period.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("request timed out after {timeout_secs}s: {path}")]
    Timeout { path: String, timeout_secs: u64 },

    #[error("transport error for {path}: {detail}")]
    Transport { path: String, detail: String },

    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },
}

impl FetchError {
    /// Whether this is an absence rather than a transient failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Trait for archive sources. `path` is relative to the implementation's
/// base location.
pub trait ArchiveFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTPS fetcher over `reqwest::blocking`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        }
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    path: path.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                FetchError::Transport {
                    path: path.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        // Validate the status before treating the body as payload.
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Transport {
            path: path.to_string(),
            detail: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
