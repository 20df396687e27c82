use std::io;
use std::path::{Path, PathBuf};

use crate::constants::{columns, output};

/// Maps metadata fields to input-table columns.
///
/// Every lookup through this mapping falls back to a documented default
/// when the column is absent or null, so shards with partial schemas
/// extract without error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    /// Identifier column; rows without a value get `unknown_<row_index>`.
    pub id: String,
    /// Title column; empty string when absent.
    pub title: String,
    /// Search query column; empty string when absent.
    pub query: String,
    /// Rank position column; empty string when absent.
    pub position: String,
    /// Image payload column (a group value with a binary sub-field).
    pub image: String,
    /// Binary sub-field name inside the image payload group.
    pub image_bytes: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: columns::ITEM_ID.to_string(),
            title: columns::TITLE.to_string(),
            query: columns::QUERY.to_string(),
            position: columns::POSITION.to_string(),
            image: columns::IMAGE.to_string(),
            image_bytes: columns::IMAGE_BYTES.to_string(),
        }
    }
}

/// Deterministic output paths for image artifacts and metadata tables.
///
/// The layout owns a single root directory and derives
/// `<root>/images/<product_id>_<row_index>.webp` and
/// `<root>/metadata/<input_basename>.csv` from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding the images and metadata subdirectories.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for re-encoded image artifacts.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(output::IMAGES_SUBDIR)
    }

    /// Directory for per-input metadata tables.
    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(output::METADATA_SUBDIR)
    }

    /// Artifact filename for one row: `<product_id>_<row_index>.webp`.
    pub fn image_filename(&self, product_id: &str, row_index: usize) -> String {
        format!("{product_id}_{row_index}.{}", output::IMAGE_EXT)
    }

    /// Full artifact path for one row.
    pub fn image_path(&self, product_id: &str, row_index: usize) -> PathBuf {
        self.images_dir()
            .join(self.image_filename(product_id, row_index))
    }

    /// Metadata table path derived from the input file's basename.
    ///
    /// The basename keeps its original extension, so `shard.parquet`
    /// yields `metadata/shard.parquet.csv`.
    pub fn metadata_path(&self, input: &Path) -> PathBuf {
        let basename = input
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("input");
        self.metadata_dir()
            .join(format!("{basename}.{}", output::METADATA_EXT))
    }

    /// Create both output subdirectories.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.images_dir())?;
        std::fs::create_dir_all(self.metadata_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_map_defaults_match_evaluation_shard_schema() {
        let map = ColumnMap::default();
        assert_eq!(map.id, "item_ID");
        assert_eq!(map.title, "title");
        assert_eq!(map.query, "query");
        assert_eq!(map.position, "position");
        assert_eq!(map.image, "image");
        assert_eq!(map.image_bytes, "bytes");
    }

    #[test]
    fn layout_derives_artifact_and_metadata_paths() {
        let layout = OutputLayout::new("out");
        assert_eq!(layout.images_dir(), PathBuf::from("out/images"));
        assert_eq!(layout.metadata_dir(), PathBuf::from("out/metadata"));
        assert_eq!(layout.image_filename("B0123", 7), "B0123_7.webp");
        assert_eq!(
            layout.image_path("B0123", 7),
            PathBuf::from("out/images/B0123_7.webp")
        );
        assert_eq!(
            layout.metadata_path(Path::new("data/test-00000.parquet")),
            PathBuf::from("out/metadata/test-00000.parquet.csv")
        );
    }

    #[test]
    fn metadata_path_tolerates_inputs_without_a_basename() {
        let layout = OutputLayout::new("out");
        assert_eq!(
            layout.metadata_path(Path::new("..")),
            PathBuf::from("out/metadata/input.csv")
        );
    }
}
