//! Run configuration.
//!
//! Credentials come from the environment (`SUPABASE_URL` / `SUPABASE_KEY`),
//! everything else has defaults spanning the known publication history and
//! can be overridden from the CLI. Configuration is validated up front: a
//! missing credential aborts before any period is attempted.

use chrono::Datelike;
use thiserror::Error;

use deces_core::batch::DEFAULT_BATCH_SIZE;
use deces_core::fetch::DEFAULT_BASE_URL;
use deces_core::locate::FIRST_YEAR;
use deces_core::store::{CommitMode, DEFAULT_TABLE};

/// Environment variable naming the store endpoint.
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
/// Environment variable holding the store access key.
pub const ENV_STORE_KEY: &str = "SUPABASE_KEY";

/// Fatal configuration failures — the only error kind that aborts a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingEnv { name: &'static str },

    #[error("invalid year range {from}..={to}")]
    InvalidRange { from: i32, to: i32 },
}

/// Whether periods with no published archive fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Missing periods are reported but do not fail the run. Matches the
    /// publication reality: recent years only exist month by month.
    #[default]
    Allow,
    /// Every requested period must yield data.
    Strict,
}

/// Everything one sync run needs, constructed once and threaded through the
/// orchestrator — no global client state.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub store_url: String,
    pub store_key: String,
    pub table: String,
    pub base_url: String,
    pub from_year: i32,
    pub to_year: i32,
    pub batch_size: usize,
    pub mode: CommitMode,
    pub missing_policy: MissingPolicy,
}

impl SyncConfig {
    /// Build a config from the environment with default settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_url = require_env(ENV_STORE_URL)?;
        let store_key = require_env(ENV_STORE_KEY)?;
        Ok(Self::new(store_url, store_key))
    }

    /// Default settings for the given credentials: full historical range,
    /// standard table and batch size, plain inserts, missing periods allowed.
    pub fn new(store_url: impl Into<String>, store_key: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            store_key: store_key.into(),
            table: DEFAULT_TABLE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            from_year: FIRST_YEAR,
            to_year: chrono::Utc::now().year(),
            batch_size: DEFAULT_BATCH_SIZE,
            mode: CommitMode::Insert,
            missing_policy: MissingPolicy::Allow,
        }
    }

    /// Check the year range before running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from_year > self.to_year {
            return Err(ConfigError::InvalidRange {
                from: self.from_year,
                to: self.to_year,
            });
        }
        Ok(())
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.from_year..=self.to_year
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}
