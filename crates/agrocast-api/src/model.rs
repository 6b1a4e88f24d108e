//! # Yield Model
//!
//! The ML service scores a normalized `num_params × seq_len` input with a
//! [`YieldModel`]. The shipped implementation is [`LinearWeightsModel`], a
//! weight per input cell plus a bias, loaded from JSON:
//!
//! ```json
//! { "num_params": 24, "seq_len": 245, "weights": [ ... ], "bias": 0.0 }
//! ```
//!
//! [`ModelSlot`] owns the currently loaded model. Readers clone an `Arc`
//! out of the slot; reload replaces it under a short write lock.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

/// Errors from loading or evaluating a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model file could not be read.
    #[error("failed to read model {path}: {source}")]
    Io {
        /// Model path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The model file is not valid model JSON.
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The weight vector does not match `num_params * seq_len`.
    #[error("model declares {num_params}x{seq_len} inputs but has {actual} weights")]
    WeightCount {
        /// Declared parameter rows.
        num_params: usize,
        /// Declared sequence length.
        seq_len: usize,
        /// Weights present.
        actual: usize,
    },

    /// The input has the wrong number of values.
    #[error("model expects {expected} input values, got {actual}")]
    InputShape {
        /// Expected length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// The caller's `num_of_params` disagrees with the model.
    #[error("model expects {expected} parameters, request says {actual}")]
    NumParams {
        /// Model's parameter count.
        expected: usize,
        /// Request's parameter count.
        actual: usize,
    },
}

/// A model that predicts yield from a flattened, normalized input.
pub trait YieldModel: Send + Sync + fmt::Debug {
    /// `(num_params, seq_len)` the model was trained on.
    fn input_shape(&self) -> (usize, usize);

    /// Predict yield from `num_of_params` rows of flattened data.
    fn predict(&self, data: &[f64], num_of_params: usize) -> Result<f64, ModelError>;
}

/// Linear model over every input cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearWeightsModel {
    num_params: usize,
    seq_len: usize,
    weights: Vec<f64>,
    #[serde(default)]
    bias: f64,
}

impl LinearWeightsModel {
    /// Build and validate a model.
    pub fn new(num_params: usize, seq_len: usize, weights: Vec<f64>, bias: f64) -> Result<Self, ModelError> {
        let model = Self {
            num_params,
            seq_len,
            weights,
            bias,
        };
        model.check()?;
        Ok(model)
    }

    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.check()?;
        Ok(model)
    }

    /// Read and parse a model file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.num_params.checked_mul(self.seq_len) != Some(self.weights.len()) {
            return Err(ModelError::WeightCount {
                num_params: self.num_params,
                seq_len: self.seq_len,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }
}

impl YieldModel for LinearWeightsModel {
    fn input_shape(&self) -> (usize, usize) {
        (self.num_params, self.seq_len)
    }

    fn predict(&self, data: &[f64], num_of_params: usize) -> Result<f64, ModelError> {
        if num_of_params != self.num_params {
            return Err(ModelError::NumParams {
                expected: self.num_params,
                actual: num_of_params,
            });
        }
        if data.len() != self.weights.len() {
            return Err(ModelError::InputShape {
                expected: self.weights.len(),
                actual: data.len(),
            });
        }
        let dot: f64 = data.iter().zip(&self.weights).map(|(x, w)| x * w).sum();
        Ok(dot + self.bias)
    }
}

/// The model path plus whatever model is currently loaded from it.
#[derive(Debug)]
pub struct ModelSlot {
    path: PathBuf,
    model: RwLock<Option<Arc<dyn YieldModel>>>,
}

impl ModelSlot {
    /// A slot bound to `path`, loaded immediately. A missing or invalid file
    /// leaves the slot empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let slot = Self {
            path: path.into(),
            model: RwLock::new(None),
        };
        slot.reload();
        slot
    }

    /// A slot holding an in-memory model.
    pub fn with_model(path: impl Into<PathBuf>, model: Arc<dyn YieldModel>) -> Self {
        Self {
            path: path.into(),
            model: RwLock::new(Some(model)),
        }
    }

    /// Re-read the model file and swap it in. Returns whether a model is loaded.
    pub fn reload(&self) -> bool {
        let loaded: Option<Arc<dyn YieldModel>> = match LinearWeightsModel::load(&self.path) {
            Ok(model) => {
                tracing::info!(path = %self.path.display(), shape = ?model.input_shape(), "model loaded");
                Some(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "model not loaded: {e}");
                None
            }
        };
        let is_loaded = loaded.is_some();
        *self.model.write() = loaded;
        is_loaded
    }

    /// The current model, if any.
    pub fn current(&self) -> Option<Arc<dyn YieldModel>> {
        self.model.read().clone()
    }

    /// Model file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> LinearWeightsModel {
        LinearWeightsModel::new(2, 2, vec![1.0, 2.0, 3.0, 4.0], 0.5).unwrap()
    }

    #[test]
    fn predict_is_dot_plus_bias() {
        let model = tiny();
        assert_eq!(model.predict(&[1.0, 1.0, 1.0, 1.0], 2).unwrap(), 10.5);
        assert_eq!(model.input_shape(), (2, 2));
    }

    #[test]
    fn predict_checks_shape() {
        let model = tiny();
        assert!(matches!(
            model.predict(&[1.0; 3], 2),
            Err(ModelError::InputShape { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            model.predict(&[1.0; 4], 3),
            Err(ModelError::NumParams { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn from_json_validates_weight_count() {
        let err = LinearWeightsModel::from_json(
            r#"{"num_params": 2, "seq_len": 3, "weights": [1, 2], "bias": 0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::WeightCount { actual: 2, .. }));
        let ok = LinearWeightsModel::from_json(r#"{"num_params": 1, "seq_len": 2, "weights": [1, 2]}"#)
            .unwrap();
        assert_eq!(ok.predict(&[1.0, 1.0], 1).unwrap(), 3.0);
    }

    #[test]
    fn oversized_shape_is_a_weight_count_error() {
        let err = LinearWeightsModel::new(usize::MAX, 2, vec![1.0, 2.0], 0.0).unwrap_err();
        assert!(matches!(err, ModelError::WeightCount { seq_len: 2, actual: 2, .. }));
    }

    #[test]
    fn slot_without_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = ModelSlot::load(dir.path().join("model.json"));
        assert!(slot.current().is_none());
    }

    #[test]
    fn reload_picks_up_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let slot = ModelSlot::load(&path);
        assert!(!slot.reload());

        std::fs::write(&path, r#"{"num_params": 1, "seq_len": 1, "weights": [2.0], "bias": 1.0}"#).unwrap();
        assert!(slot.reload());
        let model = slot.current().unwrap();
        assert_eq!(model.predict(&[3.0], 1).unwrap(), 7.0);

        std::fs::remove_file(&path).unwrap();
        assert!(!slot.reload());
        assert!(slot.current().is_none());
        // Readers holding the old model keep it.
        assert_eq!(model.predict(&[1.0], 1).unwrap(), 3.0);
    }
}
