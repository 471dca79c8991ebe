//! Archive decoding — turns fetched bytes into text under the dialect's
//! declared encoding.
//!
//! Annual archives are zip containers holding exactly one CSV; the oldest
//! publications are bare text files. Detection is by the zip magic bytes, so
//! the caller never has to know which form a given year uses.

use std::io::{Cursor, Read};

use encoding_rs::Encoding;
use thiserror::Error;

/// Zip local-file-header magic.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Errors from archive extraction and decoding. Both are contained at
/// period granularity by the orchestrator.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The container held zero or several entries. Multi-entry archives are
    /// an extension point, not a supported input.
    #[error("archive contains {count} entries, expected exactly one")]
    MalformedArchive { count: usize },

    #[error("unreadable archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read archive entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not valid {encoding}")]
    Encoding { encoding: &'static str },
}

/// Extract and decode a fetched payload.
///
/// Zip containers are unpacked in memory (no temporary files); bare payloads
/// pass straight to decoding.
pub fn read_payload(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ArchiveError> {
    if bytes.starts_with(ZIP_MAGIC) {
        let inner = extract_sole_entry(bytes)?;
        decode(&inner, encoding)
    } else {
        decode(bytes, encoding)
    }
}

fn extract_sole_entry(bytes: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    if archive.len() != 1 {
        return Err(ArchiveError::MalformedArchive {
            count: archive.len(),
        });
    }
    let mut entry = archive.by_index(0)?;
    let mut content = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut content)?;
    Ok(content)
}

fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ArchiveError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ArchiveError::Encoding {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}
