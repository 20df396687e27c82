use std::io;

use thiserror::Error;

/// Error type for input-container, metadata-table, download, and
/// configuration failures.
///
/// Per-row image failures are not represented here: they stay inside the
/// row as an [`crate::record::ImageOutcome::Absent`] value and never abort
/// an extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input table '{path}' is unavailable: {reason}")]
    InputUnavailable { path: String, reason: String },
    #[error("input table '{path}' returned inconsistent data: {details}")]
    InputInconsistent { path: String, details: String },
    #[error("metadata table '{path}' failure: {reason}")]
    MetadataTable { path: String, reason: String },
    #[error("shard download failed: {reason}")]
    DownloadFailed { reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
