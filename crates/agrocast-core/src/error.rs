//! # Error Hierarchy
//!
//! Structured error types for the core crate, built with `thiserror`.
//! An unknown region is not an error: the lookup table and the district
//! select treat it as an ordinary negative result.

use thiserror::Error;

/// Errors when building a [`crate::RegionDistrictMap`] from caller data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same region name appears twice.
    #[error("duplicate region: {0}")]
    DuplicateRegion(String),

    /// A region was given an empty district list.
    #[error("region {0} has no districts")]
    EmptyRegion(String),

    /// A region name is empty or whitespace-only.
    #[error("region name must not be empty")]
    EmptyRegionName,
}

/// Errors raised by the district select when the user picks an option.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The district control is disabled (no known region selected).
    #[error("district select is disabled until a region is chosen")]
    Disabled,

    /// The picked value is not one of the current options.
    #[error("{district} is not a district of {region}")]
    NotAnOption {
        /// Region currently selected.
        region: String,
        /// Value the user tried to pick.
        district: String,
    },
}

/// Errors when loading or validating a parameter layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The layout lists no meteo parameters.
    #[error("LIST_OF_PARAMS is missing or empty")]
    NoParams,

    /// A parameter name appears more than once.
    #[error("duplicate parameter: {0}")]
    DuplicateParam(String),

    /// A normalization coefficient is zero or not finite.
    #[error("parameter {name} has invalid normalization coefficient {coef}")]
    InvalidCoefficient {
        /// Parameter name.
        name: String,
        /// Offending coefficient.
        coef: f64,
    },

    /// The cut window is empty, inverted, or wider than two seasons.
    #[error("invalid cut window {start}..{end} for {len} days per parameter")]
    InvalidCut {
        /// Window start (inclusive).
        start: usize,
        /// Window end (exclusive).
        end: usize,
        /// Days per parameter per season.
        len: usize,
    },

    /// `LEN_OF_PARAM` is zero.
    #[error("LEN_OF_PARAM must be positive")]
    ZeroLength,

    /// The layout document is not valid JSON of the expected shape.
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from slicing, merging, and normalizing meteo series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// The parameter name is not part of the layout.
    #[error("unknown parameter: {name}; available: {available:?}")]
    UnknownParam {
        /// Requested name.
        name: String,
        /// Names the layout knows.
        available: Vec<String>,
    },

    /// A row is too short to hold the requested parameter slice.
    #[error("row of length {len} is too short for parameter {name} (needs {needed})")]
    RowTooShort {
        /// Parameter being sliced.
        name: String,
        /// Actual row length.
        len: usize,
        /// Minimum length required.
        needed: usize,
    },

    /// A series has no values where at least one was required.
    #[error("parameter {0} has no values")]
    Empty(String),

    /// A row or matrix does not have the shape the layout implies.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape, rendered.
        expected: String,
        /// Actual shape, rendered.
        actual: String,
    },

    /// The layout's cut window does not fit inside the matrix.
    #[error("cut window {start}..{end} exceeds {columns} columns")]
    CutOutOfRange {
        /// Window start.
        start: usize,
        /// Window end.
        end: usize,
        /// Matrix width.
        columns: usize,
    },
}

/// Errors from the regression and correlation helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Not enough points to fit or evaluate.
    #[error("at least {needed} points are required, got {got}")]
    NotEnoughPoints {
        /// Required count.
        needed: usize,
        /// Supplied count.
        got: usize,
    },

    /// Feature and target vectors differ in length.
    #[error("length mismatch: {xs} features vs {ys} targets")]
    LengthMismatch {
        /// Feature count.
        xs: usize,
        /// Target count.
        ys: usize,
    },
}
