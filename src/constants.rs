/// Constants used by input-table column resolution.
pub mod columns {
    /// Identifier column expected in evaluation shards.
    pub const ITEM_ID: &str = "item_ID";
    /// Product title column.
    pub const TITLE: &str = "title";
    /// Search query column.
    pub const QUERY: &str = "query";
    /// Rank position column.
    pub const POSITION: &str = "position";
    /// Embedded image payload column (a group with a binary sub-field).
    pub const IMAGE: &str = "image";
    /// Binary sub-field name inside the image payload group.
    pub const IMAGE_BYTES: &str = "bytes";
    /// Prefix for synthetic identifiers assigned when the id value is missing.
    pub const SYNTHETIC_ID_PREFIX: &str = "unknown_";
}

/// Constants used by the output directory layout and target encodings.
pub mod output {
    /// Subdirectory (under the output root) for re-encoded image artifacts.
    pub const IMAGES_SUBDIR: &str = "images";
    /// Subdirectory (under the output root) for per-input metadata tables.
    pub const METADATA_SUBDIR: &str = "metadata";
    /// Target container extension for re-encoded images.
    pub const IMAGE_EXT: &str = "webp";
    /// Extension appended to the input basename for metadata tables.
    pub const METADATA_EXT: &str = "csv";
    /// Default output root when the CLI does not override it.
    pub const DEFAULT_OUTPUT_ROOT: &str = "output";
}

/// Constants used by streaming downloads of pre-signed shard URLs.
pub mod fetch {
    use std::time::Duration;

    /// Copy buffer size for streaming downloads.
    pub const DOWNLOAD_BUFFER_BYTES: usize = 8 * 1024 * 1024;
    /// Minimum interval between download progress log lines.
    pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);
    /// Extension used for in-flight partial downloads.
    pub const PART_EXTENSION: &str = "part";
    /// Fallback local filename when a URL has no usable path segment.
    pub const FALLBACK_SHARD_NAME: &str = "shard.parquet";
}
