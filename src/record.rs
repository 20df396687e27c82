use serde::Serialize;

/// One derived metadata record per input row, kept in input order.
///
/// Serialized field order is the metadata table's column order:
/// `product_id,title,query,position,image_filename`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// Identifier column value, or the synthetic `unknown_<row_index>`.
    pub product_id: String,
    /// Title text, empty when the column is absent.
    pub title: String,
    /// Search query text, empty when the column is absent.
    pub query: String,
    /// Rank position rendered as text, empty when the column is absent.
    pub position: String,
    /// Artifact filename, or `None` when the row produced no image.
    ///
    /// `None` serializes as the empty CSV field, the absence marker.
    pub image_filename: Option<String>,
}

/// Per-row outcome of the image stage.
///
/// `Absent` merges "no payload" and "undecodable payload": the metadata
/// table does not distinguish them, only the log line carries the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The payload decoded and was re-encoded to the target artifact.
    Saved {
        /// Artifact filename recorded in the metadata table.
        filename: String,
    },
    /// No artifact was produced for this row.
    Absent {
        /// Human-readable reason, used for logging only.
        reason: String,
    },
}

impl ImageOutcome {
    /// Filename recorded in the metadata table, when one exists.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Saved { filename } => Some(filename),
            Self::Absent { .. } => None,
        }
    }
}

/// Row counters reported after extracting one input file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Rows visited in the input table.
    pub total_rows: usize,
    /// Rows that produced an image artifact.
    pub rows_with_image: usize,
    /// Rows that produced no artifact (absent or undecodable payload).
    pub rows_without_image: usize,
}

impl ExtractionSummary {
    /// Count one row outcome.
    pub fn record(&mut self, outcome: &ImageOutcome) {
        self.total_rows += 1;
        match outcome {
            ImageOutcome::Saved { .. } => self.rows_with_image += 1,
            ImageOutcome::Absent { .. } => self.rows_without_image += 1,
        }
    }

    /// True when the with/without split accounts for every row.
    pub fn is_balanced(&self) -> bool {
        self.rows_with_image + self.rows_without_image == self.total_rows
    }
}
