#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// CLI entry points for the extraction binary.
pub mod app;
/// Column mapping and output layout configuration.
pub mod config;
/// Centralized constants for columns, output layout, and downloads.
pub mod constants;
/// Core parquet-to-artifacts extraction.
pub mod extract;
/// Streaming download of pre-signed shard URLs.
pub mod fetch;
/// Embedded-payload decode and WebP re-encode.
pub mod images;
/// Metadata records, per-row image outcomes, and row counters.
pub mod record;
/// Typed access to decoded parquet rows.
pub mod table;

mod errors;

pub use config::{ColumnMap, OutputLayout};
pub use errors::ExtractError;
pub use extract::{FileExtraction, ParquetExtractor};
pub use record::{ExtractionSummary, ImageOutcome, MetadataRecord};
pub use table::RowFields;
