//! # agrocast-store: Region Tables on Disk
//!
//! The storage service's backend: a JSON district index and per-region CSV
//! tables of yield statistics and meteo rows, cached in memory after first
//! read.

pub mod error;
pub mod index;
pub mod store;
pub mod table;

pub use error::StoreError;
pub use index::DistrictIndex;
pub use store::{DistrictYear, MeteoStore, WithPrevious, DEFAULT_HISTORY};
pub use table::{RegionTable, ScalarRecord};
