//! # ML Service Routes
//!
//! Model forecast and regression forecast. `/predict` needs a loaded model
//! and answers 503 without one; `/regression` needs no model.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use agrocast_client::types::{
    Health, ModelInfo, PredictRequest, PredictResponse, RegressionRequest, RegressionResponse,
    ReloadResponse, STATUS_OK,
};
use agrocast_core::{forecast_error, regression_forecast};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::MlState;

/// Build the ML router.
pub fn router(state: MlState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/model/info", get(model_info))
        .route("/model/reload", post(reload))
        .route("/predict", post(predict))
        .route("/regression", post(regression))
        .with_state(state)
}

async fn root(State(state): State<MlState>) -> Json<Value> {
    Json(json!({
        "service": "ML",
        "status": "running",
        "model_loaded": state.model.current().is_some(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn health() -> Json<Health> {
    Json(Health::ok(Utc::now().to_rfc3339()))
}

async fn model_info(State(state): State<MlState>) -> Json<ModelInfo> {
    let model = state.model.current();
    Json(ModelInfo {
        model_path: state.model.path().display().to_string(),
        model_loaded: model.is_some(),
        input_shape: model.map(|m| m.input_shape()),
    })
}

async fn reload(State(state): State<MlState>) -> Json<ReloadResponse> {
    let loaded = state.model.reload();
    tracing::info!(loaded, "model reload requested");
    Json(ReloadResponse {
        status: if loaded { STATUS_OK } else { "no_model" }.to_string(),
        model_loaded: loaded,
    })
}

async fn predict(
    State(state): State<MlState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let req = extract_json(body)?;
    let model = state
        .model
        .current()
        .ok_or_else(|| AppError::ServiceUnavailable("model is not loaded".into()))?;
    let data = req
        .data
        .ok_or_else(|| AppError::BadRequest("field 'data' is required".into()))?;
    let num_of_params = req.num_of_params.unwrap_or(model.input_shape().0);
    tracing::info!(
        region = req.region.as_deref().unwrap_or(""),
        district = req.district.as_deref().unwrap_or(""),
        values = data.len(),
        num_of_params,
        "POST /predict"
    );

    let prediction = model.predict(&data, num_of_params)?;
    let forecast = forecast_error(prediction, req.productive);
    tracing::info!(prediction, actual = req.productive, "forecast ready");

    Ok(Json(PredictResponse {
        status: STATUS_OK.to_string(),
        region: req.region,
        district: req.district,
        year: req.year,
        forecast,
    }))
}

async fn regression(body: Result<Json<RegressionRequest>, JsonRejection>) -> Result<Json<RegressionResponse>, AppError> {
    let req = extract_json(body)?;
    tracing::info!(points = req.data.len(), target_year = ?req.target_year, "POST /regression");
    let result = regression_forecast(&req.data)?;
    Ok(Json(RegressionResponse {
        status: STATUS_OK.to_string(),
        region: req.region,
        district: req.district,
        result,
    }))
}
