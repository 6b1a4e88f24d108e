//! Storage errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the district index and the region tables.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The district is not listed under the region in the index.
    #[error("district '{district}' not found in region '{region}'")]
    UnknownDistrict {
        /// Requested region.
        region: String,
        /// Requested district.
        district: String,
    },

    /// No table row exists for the district and year.
    #[error("no data for {district}, {year}")]
    NoData {
        /// District name.
        district: String,
        /// Requested year.
        year: i32,
    },

    /// The district has no rows at all.
    #[error("no data for {0}")]
    NoRows(String),

    /// The region has districts in the index but no file prefix.
    #[error("no file prefix configured for region '{0}'")]
    MissingPrefix(String),

    /// The index document is not shaped as expected.
    #[error("malformed district index: {0}")]
    MalformedIndex(String),

    /// The index document is not valid JSON.
    #[error("district index JSON error: {0}")]
    IndexJson(#[from] serde_json::Error),

    /// A data file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A CSV file could not be parsed.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: csv::Error,
    },

    /// A CSV cell is not a number.
    #[error("invalid value '{value}' in {path} at row {row}")]
    BadValue {
        /// File path.
        path: PathBuf,
        /// 0-based data row.
        row: usize,
        /// Offending cell.
        value: String,
    },

    /// The scalar and meteo files of a region have different row counts.
    #[error("row count mismatch for '{prefix}': {scalar} scalar rows vs {meteo} meteo rows")]
    RowMismatch {
        /// Region file prefix.
        prefix: String,
        /// Rows in the scalar file.
        scalar: usize,
        /// Rows in the meteo file.
        meteo: usize,
    },
}

impl StoreError {
    /// Whether the error means "nothing there" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownDistrict { .. } | Self::NoData { .. } | Self::NoRows(_)
        )
    }
}
