//! # Meteo Store
//!
//! Read-only queries over the district index and the region tables. Region
//! tables are loaded lazily on first use and cached for the life of the
//! store; the cache lock is never held during file I/O.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::index::DistrictIndex;
use crate::table::{RegionTable, ScalarRecord};

/// Number of preceding years returned by [`MeteoStore::multi_year`] by default.
pub const DEFAULT_HISTORY: u32 = 5;

/// One district-year: scalar stats plus its meteo row.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictYear {
    /// Row position within the region table.
    pub row_index: usize,
    /// Harvest year.
    pub year: i32,
    /// Yield statistics.
    pub scalar: ScalarRecord,
    /// Flat meteo row.
    pub meteo: Vec<f64>,
}

/// A district-year together with the meteo row of the preceding year.
#[derive(Debug, Clone, PartialEq)]
pub struct WithPrevious {
    /// The requested year.
    pub current: DistrictYear,
    /// Meteo row of `year - 1`.
    pub meteo_prev: Vec<f64>,
}

/// Cached, file-backed store of region tables.
#[derive(Debug)]
pub struct MeteoStore {
    data_dir: PathBuf,
    index: DistrictIndex,
    cache: RwLock<HashMap<String, Arc<RegionTable>>>,
}

impl MeteoStore {
    /// A store reading tables from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, index: DistrictIndex) -> Self {
        Self {
            data_dir: data_dir.into(),
            index,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// A store whose index is `{data_dir}/districts.json`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let index = DistrictIndex::load(&data_dir.join("districts.json"))?;
        tracing::info!(
            data_dir = %data_dir.display(),
            regions = index.len(),
            "district index loaded"
        );
        Ok(Self::new(data_dir, index))
    }

    /// Directory the tables are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The district index.
    pub fn index(&self) -> &DistrictIndex {
        &self.index
    }

    /// Region names with their district names.
    pub fn districts(&self) -> Vec<(String, Vec<String>)> {
        self.index.districts()
    }

    /// Sorted years with data for a district.
    pub fn years(&self, region: &str, district: &str) -> Result<Vec<i32>, StoreError> {
        let (id, table) = self.resolve(region, district)?;
        let mut years: Vec<i32> = table
            .district_rows(id)
            .into_iter()
            .filter_map(|i| table.scalar(i).map(|s| s.year))
            .collect();
        years.sort_unstable();
        Ok(years)
    }

    /// The district-year row.
    pub fn meteo_row(&self, region: &str, district: &str, year: i32) -> Result<DistrictYear, StoreError> {
        let (id, table) = self.resolve(region, district)?;
        district_year(&table, id, district, year)
    }

    /// Every row of a district, sorted by year.
    pub fn all_years(&self, region: &str, district: &str) -> Result<Vec<DistrictYear>, StoreError> {
        let (id, table) = self.resolve(region, district)?;
        let mut rows: Vec<DistrictYear> = table
            .district_rows(id)
            .into_iter()
            .filter_map(|i| row_at(&table, i))
            .collect();
        if rows.is_empty() {
            return Err(StoreError::NoRows(district.to_string()));
        }
        rows.sort_by_key(|r| r.year);
        Ok(rows)
    }

    /// The district-year plus the previous year's meteo row; both must exist.
    pub fn with_yield(&self, region: &str, district: &str, year: i32) -> Result<WithPrevious, StoreError> {
        let (id, table) = self.resolve(region, district)?;
        let current = district_year(&table, id, district, year)?;
        let previous = district_year(&table, id, district, year - 1)?;
        Ok(WithPrevious {
            current,
            meteo_prev: previous.meteo,
        })
    }

    /// Rows for every year in `year - history ..= year`, ascending; all must exist.
    pub fn multi_year(
        &self,
        region: &str,
        district: &str,
        year: i32,
        history: u32,
    ) -> Result<Vec<DistrictYear>, StoreError> {
        let (id, table) = self.resolve(region, district)?;
        let first = year.saturating_sub(i32::try_from(history).unwrap_or(i32::MAX));
        (first..=year)
            .map(|y| district_year(&table, id, district, y))
            .collect()
    }

    fn resolve(&self, region: &str, district: &str) -> Result<(i64, Arc<RegionTable>), StoreError> {
        let id = self
            .index
            .district_id(region, district)
            .ok_or_else(|| StoreError::UnknownDistrict {
                region: region.to_string(),
                district: district.to_string(),
            })?;
        Ok((id, self.table(region)?))
    }

    /// The cached table of `region`, loading it on first use.
    pub fn table(&self, region: &str) -> Result<Arc<RegionTable>, StoreError> {
        if let Some(table) = self.cache.read().get(region) {
            return Ok(Arc::clone(table));
        }
        let prefix = self
            .index
            .prefix(region)
            .ok_or_else(|| StoreError::MissingPrefix(region.to_string()))?;
        let loaded = Arc::new(RegionTable::load(&self.data_dir, prefix)?);
        tracing::info!(region, prefix, rows = loaded.len(), "region table cached");
        let mut cache = self.cache.write();
        Ok(Arc::clone(
            cache.entry(region.to_string()).or_insert(loaded),
        ))
    }
}

fn row_at(table: &RegionTable, row: usize) -> Option<DistrictYear> {
    let scalar = *table.scalar(row)?;
    Some(DistrictYear {
        row_index: row,
        year: scalar.year,
        scalar,
        meteo: table.meteo(row)?.to_vec(),
    })
}

fn district_year(table: &RegionTable, id: i64, district: &str, year: i32) -> Result<DistrictYear, StoreError> {
    table
        .find_row(id, year)
        .and_then(|i| row_at(table, i))
        .ok_or_else(|| {
            tracing::warn!(district, year, "no data");
            StoreError::NoData {
                district: district.to_string(),
                year,
            }
        })
}
