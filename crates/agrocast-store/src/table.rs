//! # Region Tables
//!
//! Each region has two CSV files with a header row:
//!
//! - `{prefix}_scalar.csv`: `id_dist, year, productive, mean_productive,
//!   trend, prod_disperssion_norm` (extra columns ignored).
//! - `{prefix}.csv`: the flat meteo row of each district-year.
//!
//! Row *i* of both files describes the same district-year.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;

/// Yield statistics of one district-year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    /// District id, as in the district index.
    #[serde(deserialize_with = "int_or_float")]
    pub id_dist: i64,
    /// Harvest year.
    #[serde(deserialize_with = "int_or_float")]
    pub year: i32,
    /// Observed yield.
    pub productive: f64,
    /// Long-run mean yield of the district.
    pub mean_productive: f64,
    /// Yield trend.
    pub trend: f64,
    /// Normalized yield dispersion.
    pub prod_disperssion_norm: f64,
}

/// Accepts `7` and `7.0` alike; CSV exports often write integer columns as floats.
fn int_or_float<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    let whole = match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64),
    };
    whole
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got '{raw}'")))
}

/// The scalar and meteo rows of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    scalars: Vec<ScalarRecord>,
    meteo: Vec<Vec<f64>>,
}

impl RegionTable {
    /// Pair up already-parsed rows.
    pub fn new(prefix: &str, scalars: Vec<ScalarRecord>, meteo: Vec<Vec<f64>>) -> Result<Self, StoreError> {
        if scalars.len() != meteo.len() {
            return Err(StoreError::RowMismatch {
                prefix: prefix.to_string(),
                scalar: scalars.len(),
                meteo: meteo.len(),
            });
        }
        Ok(Self { scalars, meteo })
    }

    /// Read `{prefix}_scalar.csv` and `{prefix}.csv` from `data_dir`.
    pub fn load(data_dir: &Path, prefix: &str) -> Result<Self, StoreError> {
        let scalar_path = data_dir.join(format!("{prefix}_scalar.csv"));
        let meteo_path = data_dir.join(format!("{prefix}.csv"));
        tracing::debug!(path = %scalar_path.display(), "loading scalar table");
        let scalars = read_scalars(&scalar_path)?;
        tracing::debug!(path = %meteo_path.display(), "loading meteo table");
        let meteo = read_meteo(&meteo_path)?;
        Self::new(prefix, scalars, meteo)
    }

    /// Index of the row for `district_id` in `year`.
    pub fn find_row(&self, district_id: i64, year: i32) -> Option<usize> {
        self.scalars
            .iter()
            .position(|s| s.id_dist == district_id && s.year == year)
    }

    /// Indices of every row of `district_id`, in file order.
    pub fn district_rows(&self, district_id: i64) -> Vec<usize> {
        self.scalars
            .iter()
            .enumerate()
            .filter(|(_, s)| s.id_dist == district_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Scalar record of a row.
    pub fn scalar(&self, row: usize) -> Option<&ScalarRecord> {
        self.scalars.get(row)
    }

    /// Meteo values of a row.
    pub fn meteo(&self, row: usize) -> Option<&[f64]> {
        self.meteo.get(row).map(Vec::as_slice)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, StoreError> {
    let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().has_headers(true).from_reader(file))
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv {
        path: PathBuf::from(path),
        source,
    }
}

fn read_scalars(path: &Path) -> Result<Vec<ScalarRecord>, StoreError> {
    let mut reader = open(path)?;
    reader
        .deserialize::<ScalarRecord>()
        .map(|r| r.map_err(csv_error(path)))
        .collect()
}

fn read_meteo(path: &Path) -> Result<Vec<Vec<f64>>, StoreError> {
    let mut reader = open(path)?;
    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error(path))?;
        let values = record
            .iter()
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| StoreError::BadValue {
                    path: path.to_path_buf(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }
    Ok(rows)
}
