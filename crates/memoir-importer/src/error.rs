//! Error types for the importers

use thiserror::Error;

/// File-level import failures
///
/// Problems confined to a single record are never reported here; the record
/// is skipped and logged instead.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Export file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export is JSON but not shaped like a conversation list
    #[error("Unexpected export format: {0}")]
    Format(String),
}
