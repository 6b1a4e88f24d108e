#![deny(missing_docs)]

//! # agrocast-core: Foundational Types for agrocast
//!
//! Everything in this crate is pure: no I/O, no async, no global mutable
//! state. The service crates (`agrocast-store`, `agrocast-api`) and the
//! `agrocast` CLI build on these types.
//!
//! ## Contents
//!
//! - [`RegionDistrictMap`]: the immutable region → districts lookup table.
//! - [`CascadingSelectBinder`]: keeps a district select consistent with the
//!   selected region.
//! - [`ParamLayout`]: the ordered meteo/stat parameter layout of a meteo row,
//!   with the slicing, merging and normalization operations over it.
//! - [`analytics`]: least-squares fit, regression forecast, Pearson
//!   correlation.

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod layout;
pub mod select;
pub mod series;

pub use analytics::{
    forecast_error, pearson, regression_forecast, Forecast, LinearFit, RegressionForecast, YearPoint,
};
pub use catalog::RegionDistrictMap;
pub use error::{AnalyticsError, CatalogError, LayoutError, SelectError, SeriesError};
pub use layout::{ParamLayout, ParamSpec};
pub use select::{
    district_options, CascadingSelectBinder, DistrictControl, DistrictSelectState, SelectOption,
    SelectionState, DISTRICT_PLACEHOLDER, REGION_FIRST_PLACEHOLDER,
};
pub use series::{ModelInput, SeriesMatrix};
