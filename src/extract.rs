//! Core tabular-record extraction: parquet rows into image artifacts and
//! an aligned metadata table.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use parquet::file::reader::{FileReader, SerializedFileReader};
use tracing::{info, warn};

use crate::config::{ColumnMap, OutputLayout};
use crate::errors::ExtractError;
use crate::images::transcode_to_webp;
use crate::record::{ExtractionSummary, ImageOutcome, MetadataRecord};
use crate::table::RowFields;

/// Result of extracting one input file.
#[derive(Clone, Debug)]
pub struct FileExtraction {
    /// Path of the metadata table written for this input.
    pub metadata_path: PathBuf,
    /// Row counters for this input.
    pub summary: ExtractionSummary,
}

/// Sequential parquet-to-artifacts extractor.
///
/// One instance holds the column mapping and output layout;
/// [`extract_file`](Self::extract_file) is the single entry point and has
/// no process-level side effects beyond the files it writes.
pub struct ParquetExtractor {
    columns: ColumnMap,
    layout: OutputLayout,
}

impl ParquetExtractor {
    /// Build an extractor with an explicit column mapping and output layout.
    pub fn new(columns: ColumnMap, layout: OutputLayout) -> Self {
        Self { columns, layout }
    }

    /// Extract one parquet file into image artifacts and a metadata table.
    ///
    /// Every input row yields exactly one metadata record regardless of
    /// whether its image payload decodes. Only container-level failures
    /// (missing, unreadable, corrupt input) abort the file; row-level image
    /// failures are logged and isolated to their row.
    pub fn extract_file(&self, input: &Path) -> Result<FileExtraction, ExtractError> {
        let started = Instant::now();
        info!("[prodeval:extract] reading input table {}", input.display());

        let file = File::open(input).map_err(|err| ExtractError::InputUnavailable {
            path: input.display().to_string(),
            reason: format!("failed opening input: {err}"),
        })?;
        let reader =
            SerializedFileReader::new(file).map_err(|err| ExtractError::InputUnavailable {
                path: input.display().to_string(),
                reason: format!("failed reading parquet container: {err}"),
            })?;

        self.layout.ensure_dirs()?;

        let rows = reader
            .get_row_iter(None)
            .map_err(|err| ExtractError::InputInconsistent {
                path: input.display().to_string(),
                details: format!("failed building row iterator: {err}"),
            })?;

        let mut records = Vec::new();
        let mut summary = ExtractionSummary::default();

        for (row_index, row) in rows.enumerate() {
            let row = row.map_err(|err| ExtractError::InputInconsistent {
                path: input.display().to_string(),
                details: format!("failed decoding row {row_index}: {err}"),
            })?;
            let fields = RowFields::new(&row);

            let product_id = fields.id_or_synthetic(&self.columns.id, row_index);
            let title = fields.text_or_default(&self.columns.title);
            let query = fields.text_or_default(&self.columns.query);
            let position = fields.text_or_default(&self.columns.position);

            let outcome = self.row_image(&fields, &product_id, row_index);
            if let ImageOutcome::Absent { reason } = &outcome {
                warn!(
                    "[prodeval:extract] no image for product '{product_id}' (row {row_index}): {reason}"
                );
            }
            summary.record(&outcome);

            let image_filename = match outcome {
                ImageOutcome::Saved { filename } => Some(filename),
                ImageOutcome::Absent { .. } => None,
            };
            records.push(MetadataRecord {
                product_id,
                title,
                query,
                position,
                image_filename,
            });
        }

        let metadata_path = self.layout.metadata_path(input);
        write_metadata_table(&metadata_path, &records)?;

        info!(
            "[prodeval:extract] {} done in {:.2}s (rows={} with_image={} without_image={})",
            input.display(),
            started.elapsed().as_secs_f64(),
            summary.total_rows,
            summary.rows_with_image,
            summary.rows_without_image
        );

        Ok(FileExtraction {
            metadata_path,
            summary,
        })
    }

    /// Image stage for one row; failures never escape the row.
    fn row_image(
        &self,
        fields: &RowFields<'_>,
        product_id: &str,
        row_index: usize,
    ) -> ImageOutcome {
        let Some(bytes) = fields.embedded_bytes(&self.columns.image, &self.columns.image_bytes)
        else {
            return ImageOutcome::Absent {
                reason: "image payload absent or not a binary group".to_string(),
            };
        };

        let filename = self.layout.image_filename(product_id, row_index);
        let target = self.layout.images_dir().join(&filename);
        match transcode_to_webp(bytes, &target) {
            Ok(()) => ImageOutcome::Saved { filename },
            Err(err) => ImageOutcome::Absent {
                reason: format!("failed transcoding payload: {err}"),
            },
        }
    }
}

/// Serialize the accumulated metadata table as CSV with a header row.
fn write_metadata_table(path: &Path, records: &[MetadataRecord]) -> Result<(), ExtractError> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| ExtractError::MetadataTable {
        path: path.display().to_string(),
        reason: format!("failed creating metadata table: {err}"),
    })?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|err| ExtractError::MetadataTable {
                path: path.display().to_string(),
                reason: format!("failed writing metadata record: {err}"),
            })?;
    }
    writer.flush().map_err(|err| ExtractError::MetadataTable {
        path: path.display().to_string(),
        reason: format!("failed flushing metadata table: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_input_file_reports_unavailable() {
        let dir = tempdir().unwrap();
        let extractor = ParquetExtractor::new(
            ColumnMap::default(),
            OutputLayout::new(dir.path().join("out")),
        );

        let err = extractor
            .extract_file(&dir.path().join("missing.parquet"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::InputUnavailable { .. }));
    }

    #[test]
    fn invalid_container_aborts_before_writing_any_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.parquet");
        std::fs::write(&input, b"not a parquet container").unwrap();
        let out_root = dir.path().join("out");
        let extractor =
            ParquetExtractor::new(ColumnMap::default(), OutputLayout::new(&out_root));

        let err = extractor.extract_file(&input).unwrap_err();
        assert!(matches!(err, ExtractError::InputUnavailable { .. }));
        assert!(!out_root.exists());
    }
}

