//! # Meteo Series Operations
//!
//! Slicing, two-season merging, stat augmentation, and normalization of
//! meteo rows according to a [`ParamLayout`].
//!
//! ```text
//!  prev row ─┐                       ┌─ stat rows (constant) ─┐
//!            ├─ merge_two_years ─▶ [P × 2L] ─▶ add_stat_params ─▶ [(P+S) × 2L]
//!  curr row ─┘                                                      │
//!                                                  normalize_and_cut ▼
//!                                        flat [(P+S) × (cut_end − cut_start)]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::layout::{ParamLayout, NDVI};

/// A row-major matrix: one row per parameter, one column per day.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMatrix {
    rows: Vec<Vec<f64>>,
}

impl SeriesMatrix {
    /// Wrap rows that all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SeriesError> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some(bad) = rows.iter().find(|r| r.len() != width) {
                return Err(SeriesError::ShapeMismatch {
                    expected: format!("rows of {width} columns"),
                    actual: format!("a row of {} columns", bad.len()),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (0 for an empty matrix).
    pub fn num_columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    fn shape(&self) -> String {
        format!("{}x{}", self.num_rows(), self.num_columns())
    }
}

/// Normalized model input for one district-year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    /// Flattened `num_of_params × window` values.
    pub data: Vec<f64>,
    /// Number of rows (meteo + stat) the data was flattened from.
    pub num_of_params: usize,
}

impl ParamLayout {
    /// The daily values of one parameter within a single-season row.
    pub fn extract_param<'a>(&self, row: &'a [f64], name: &str) -> Result<&'a [f64], SeriesError> {
        let index = self
            .param_index(name)
            .ok_or_else(|| SeriesError::UnknownParam {
                name: name.to_string(),
                available: self.param_names(),
            })?;
        let start = index * self.len_of_param();
        let end = start + self.len_of_param();
        row.get(start..end).ok_or_else(|| SeriesError::RowTooShort {
            name: name.to_string(),
            len: row.len(),
            needed: end,
        })
    }

    /// Peak NDVI of a single-season row.
    pub fn ndvi_max(&self, row: &[f64]) -> Result<f64, SeriesError> {
        let values = self.extract_param(row, NDVI)?;
        values
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| SeriesError::Empty(NDVI.to_string()))
    }

    /// Reshape two season rows into `P × L` and join them along the day axis.
    pub fn merge_two_years(&self, prev: &[f64], curr: &[f64]) -> Result<SeriesMatrix, SeriesError> {
        let expected = self.row_len();
        for row in [prev, curr] {
            if row.len() != expected {
                return Err(SeriesError::ShapeMismatch {
                    expected: format!("{expected} values"),
                    actual: format!("{} values", row.len()),
                });
            }
        }
        let len = self.len_of_param();
        let rows = prev
            .chunks_exact(len)
            .zip(curr.chunks_exact(len))
            .map(|(p, c)| {
                let mut merged = Vec::with_capacity(2 * len);
                merged.extend_from_slice(p);
                merged.extend_from_slice(c);
                merged
            })
            .collect();
        Ok(SeriesMatrix { rows })
    }

    /// Append one constant row per stat parameter present in `values`.
    ///
    /// Stat parameters absent from `values` are skipped, so the row count
    /// then no longer matches the coefficient list and normalization fails.
    pub fn add_stat_params(&self, mut matrix: SeriesMatrix, values: &BTreeMap<String, f64>) -> SeriesMatrix {
        let width = matrix.num_columns();
        for spec in self.stat_params() {
            if let Some(value) = values.get(&spec.name) {
                matrix.rows.push(vec![*value; width]);
            }
        }
        matrix
    }

    /// Divide each row by its coefficient, keep the cut window, flatten.
    pub fn normalize_and_cut(&self, matrix: &SeriesMatrix) -> Result<Vec<f64>, SeriesError> {
        let coefs: Vec<f64> = self
            .params()
            .iter()
            .chain(self.stat_params())
            .map(|p| p.norm_coef)
            .collect();
        if matrix.num_rows() != coefs.len() {
            return Err(SeriesError::ShapeMismatch {
                expected: format!("{} rows", coefs.len()),
                actual: matrix.shape(),
            });
        }
        let (start, end) = self.cut();
        if end > matrix.num_columns() {
            return Err(SeriesError::CutOutOfRange {
                start,
                end,
                columns: matrix.num_columns(),
            });
        }
        let mut out = Vec::with_capacity(coefs.len() * (end - start));
        for (row, coef) in matrix.rows.iter().zip(&coefs) {
            out.extend(row[start..end].iter().map(|v| v / coef));
        }
        Ok(out)
    }

    /// Merge, augment with stats, then normalize and cut.
    pub fn prepare_model_input(
        &self,
        prev: &[f64],
        curr: &[f64],
        stats: &BTreeMap<String, f64>,
    ) -> Result<ModelInput, SeriesError> {
        let merged = self.merge_two_years(prev, curr)?;
        let with_stats = self.add_stat_params(merged, stats);
        let data = self.normalize_and_cut(&with_stats)?;
        let num_of_params = data.len() / self.window_len();
        Ok(ModelInput {
            data,
            num_of_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ParamSpec;

    /// Two params of 4 days, one stat param, window 2..6.
    fn small() -> ParamLayout {
        ParamLayout::new(
            vec![ParamSpec::new("ndvi", 1.0), ParamSpec::new("mean_temp", 10.0)],
            vec![ParamSpec::new("trend", 2.0)],
            4,
            2,
            6,
        )
        .unwrap()
    }

    fn stats(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn extract_param_slices_by_index() {
        let layout = small();
        let row = [0.1, 0.5, 0.3, 0.2, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(layout.extract_param(&row, "ndvi").unwrap(), &[0.1, 0.5, 0.3, 0.2]);
        assert_eq!(
            layout.extract_param(&row, "mean_temp").unwrap(),
            &[10.0, 20.0, 30.0, 40.0]
        );
    }

    #[test]
    fn extract_unknown_param() {
        let err = small().extract_param(&[0.0; 8], "rain").unwrap_err();
        assert!(matches!(err, SeriesError::UnknownParam { ref name, ref available }
            if name == "rain" && available.len() == 2));
    }

    #[test]
    fn extract_from_short_row() {
        let err = small().extract_param(&[0.0; 6], "mean_temp").unwrap_err();
        assert_eq!(
            err,
            SeriesError::RowTooShort {
                name: "mean_temp".into(),
                len: 6,
                needed: 8
            }
        );
    }

    #[test]
    fn ndvi_max_picks_peak() {
        let row = [0.1, 0.7, 0.3, 0.2, 99.0, 99.0, 99.0, 99.0];
        assert_eq!(small().ndvi_max(&row).unwrap(), 0.7);
    }

    #[test]
    fn ndvi_max_without_ndvi_param() {
        let layout = ParamLayout::new(vec![ParamSpec::new("mean_temp", 1.0)], vec![], 2, 0, 2).unwrap();
        assert!(matches!(
            layout.ndvi_max(&[1.0, 2.0]),
            Err(SeriesError::UnknownParam { .. })
        ));
    }

    #[test]
    fn merge_concatenates_per_param() {
        let layout = small();
        let prev = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let curr = [9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let m = layout.merge_two_years(&prev, &curr).unwrap();
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.num_columns(), 8);
        assert_eq!(m.rows()[0], vec![1.0, 2.0, 3.0, 4.0, 9.0, 10.0, 11.0, 12.0]);
        assert_eq!(m.rows()[1], vec![5.0, 6.0, 7.0, 8.0, 13.0, 14.0, 15.0, 16.0]);
    }

    #[test]
    fn merge_rejects_wrong_length() {
        let err = small().merge_two_years(&[0.0; 8], &[0.0; 7]).unwrap_err();
        assert!(matches!(err, SeriesError::ShapeMismatch { .. }));
    }

    #[test]
    fn add_stat_params_appends_constant_rows_in_layout_order() {
        let layout = small();
        let m = layout.merge_two_years(&[0.0; 8], &[0.0; 8]).unwrap();
        let m = layout.add_stat_params(m, &stats(&[("trend", 3.0), ("ignored", 9.0)]));
        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.rows()[2], vec![3.0; 8]);
    }

    #[test]
    fn add_stat_params_skips_missing_values() {
        let layout = small();
        let m = layout.merge_two_years(&[0.0; 8], &[0.0; 8]).unwrap();
        let m = layout.add_stat_params(m, &BTreeMap::new());
        assert_eq!(m.num_rows(), 2);
        assert!(matches!(
            layout.normalize_and_cut(&m),
            Err(SeriesError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn normalize_and_cut_divides_and_windows() {
        let layout = small();
        let prev = [1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0];
        let curr = [5.0, 6.0, 7.0, 8.0, 50.0, 60.0, 70.0, 80.0];
        let m = layout.merge_two_years(&prev, &curr).unwrap();
        let m = layout.add_stat_params(m, &stats(&[("trend", 4.0)]));
        let flat = layout.normalize_and_cut(&m).unwrap();
        assert_eq!(
            flat,
            vec![
                3.0, 4.0, 5.0, 6.0, // ndvi / 1
                3.0, 4.0, 5.0, 6.0, // mean_temp / 10
                2.0, 2.0, 2.0, 2.0, // trend / 2
            ]
        );
    }

    #[test]
    fn normalize_rejects_cut_beyond_matrix() {
        let layout = small();
        let m = SeriesMatrix::from_rows(vec![vec![0.0; 5]; 3]).unwrap();
        assert_eq!(
            layout.normalize_and_cut(&m).unwrap_err(),
            SeriesError::CutOutOfRange {
                start: 2,
                end: 6,
                columns: 5
            }
        );
    }

    #[test]
    fn from_rows_rejects_ragged() {
        assert!(SeriesMatrix::from_rows(vec![vec![0.0; 2], vec![0.0; 3]]).is_err());
        assert_eq!(SeriesMatrix::from_rows(vec![]).unwrap().num_columns(), 0);
    }

    #[test]
    fn prepare_model_input_counts_params() {
        let layout = small();
        let input = layout
            .prepare_model_input(&[1.0; 8], &[1.0; 8], &stats(&[("trend", 1.0)]))
            .unwrap();
        assert_eq!(input.num_of_params, 3);
        assert_eq!(input.data.len(), 12);
    }

    #[test]
    fn winter_wheat_model_input_is_24_by_245() {
        let layout = ParamLayout::winter_wheat();
        let row = vec![1.0; layout.row_len()];
        let input = layout
            .prepare_model_input(
                &row,
                &row,
                &stats(&[("mean_prod", 30.0), ("trend", 1.0), ("disp", 0.5)]),
            )
            .unwrap();
        assert_eq!(input.num_of_params, 24);
        assert_eq!(input.data.len(), 24 * 245);
    }
}
