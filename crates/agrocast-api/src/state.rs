//! # Application State
//!
//! One state type per service, passed to handlers via the `State`
//! extractor. Every state is cheap to clone: shared parts sit behind `Arc`.
//! Locks are `parking_lot` and never held across `.await`.

use std::path::Path;
use std::sync::Arc;

use agrocast_client::AgrocastClient;
use agrocast_core::{LayoutError, ParamLayout, RegionDistrictMap};
use agrocast_store::MeteoStore;

use crate::model::ModelSlot;

/// Storage service state.
#[derive(Debug, Clone)]
pub struct StorageState {
    pub store: Arc<MeteoStore>,
}

impl StorageState {
    pub fn new(store: MeteoStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Collector service state.
#[derive(Debug, Clone)]
pub struct CollectorState {
    pub layout: Arc<ParamLayout>,
    pub upstream: AgrocastClient,
}

impl CollectorState {
    pub fn new(layout: ParamLayout, upstream: AgrocastClient) -> Self {
        Self {
            layout: Arc::new(layout),
            upstream,
        }
    }
}

/// Read the layout file, falling back to the winter wheat layout when the
/// file cannot be read. A file that reads but does not parse is an error.
pub fn load_layout(path: &Path) -> Result<ParamLayout, LayoutError> {
    match std::fs::read_to_string(path) {
        Ok(json) => {
            let layout = ParamLayout::from_json(&json)?;
            tracing::info!(path = %path.display(), params = layout.params().len(), "layout loaded");
            Ok(layout)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "layout not readable ({e}), using winter wheat defaults");
            Ok(ParamLayout::winter_wheat())
        }
    }
}

/// ML service state.
#[derive(Debug, Clone)]
pub struct MlState {
    pub model: Arc<ModelSlot>,
}

impl MlState {
    pub fn new(model: ModelSlot) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

/// Gateway state.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub upstream: AgrocastClient,
}

/// Visualization state.
#[derive(Debug, Clone)]
pub struct VisualizationState {
    pub catalog: &'static RegionDistrictMap,
    pub upstream: AgrocastClient,
}

impl VisualizationState {
    /// State over the built-in region table.
    pub fn new(upstream: AgrocastClient) -> Self {
        Self {
            catalog: RegionDistrictMap::builtin(),
            upstream,
        }
    }
}
