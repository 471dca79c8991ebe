//! Source location policy — which remote files to try for a period.
//!
//! The publication history is encoded here as explicit year boundaries
//! rather than conditionals scattered through the pipeline:
//! - annual archives exist for every year since [`FIRST_YEAR`];
//! - the zip-packaged filename convention starts at [`FIRST_CSV_YEAR`];
//!   earlier years were published as bare text files, though some were
//!   re-packaged later, so the zip pattern is still tried first;
//! - monthly fallback archives only exist from [`MONTHLY_FILES_FROM`].
//!
//! Pure functions, no I/O: the fetcher decides what actually exists.

use std::fmt;

use crate::dialect::FIRST_CSV_YEAR;

/// Earliest year an archive was published.
pub const FIRST_YEAR: i32 = 1975;

/// First year monthly archives (`Deces_YYYY_Mmm.zip`) are published.
pub const MONTHLY_FILES_FROM: i32 = 2018;

/// A unit of ingestion: a year, or a single month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn annual(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn monthly(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{}-{month:02}", self.year),
            None => write!(f, "{}", self.year),
        }
    }
}

/// Candidate remote paths for a period, most specific first.
///
/// Paths are relative to the archive base URL. The caller tries them in
/// order, treating not-found as "try the next one".
pub fn candidates(period: &Period) -> Vec<String> {
    match period.month {
        Some(month) => vec![format!("Deces_{}_M{month:02}.zip", period.year)],
        None => {
            let mut paths = vec![format!("Deces_{}.zip", period.year)];
            if period.year < FIRST_CSV_YEAR {
                // Pre-CSV years were originally bare fixed-width text.
                paths.push(format!("deces-{}.txt", period.year));
            }
            paths
        }
    }
}

/// Month periods to try when a year's annual archive does not exist.
///
/// Only years with monthly publication get a fallback; for older years a
/// missing annual archive means the period is simply missing.
pub fn monthly_fallback(year: i32) -> Option<Vec<Period>> {
    if year >= MONTHLY_FILES_FROM {
        Some((1..=12).map(|m| Period::monthly(year, m)).collect())
    } else {
        None
    }
}
