//! # Collector Service Routes
//!
//! Pulls rows from storage and shapes them with the parameter layout.
//!
//! | Method | Path | Upstream | Result |
//! |--------|------|----------|--------|
//! | GET | `/params` | | meteo parameter names |
//! | GET | `/timeseries` | `/meteo/row` | one parameter's slice |
//! | GET | `/correlation` | `/meteo/all_years` | (year, NDVI max, yield) |
//! | GET | `/predict_data` | `/meteo/with_yield` | normalized model input |
//! | GET | `/regression_data` | `/meteo/multi_year` | (year, NDVI max, yield) |
//!
//! An unknown parameter is 400. A storage 404 or 400 is passed through with
//! the same status; any other storage failure is 502.

use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use agrocast_client::types::{
    CorrelationResponse, Health, ParamsResponse, PredictDataResponse, RegressionDataResponse,
    TimeseriesResponse, STATUS_OK,
};
use agrocast_core::{ParamLayout, SeriesError, YearPoint};
use agrocast_store::DEFAULT_HISTORY;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::routes::storage::{DistrictQuery, HistoryQuery, YearQuery};
use crate::state::CollectorState;

/// Keys of the stat values fed to the model, paired with the storage fields.
const MEAN_PROD: &str = "mean_prod";
const TREND: &str = "trend";
const DISP: &str = "disp";

/// `region` + `district` + `year` + `param` query.
#[derive(Debug, Deserialize)]
pub struct ParamQuery {
    pub region: String,
    pub district: String,
    pub year: i32,
    pub param: String,
}

/// Build the collector router.
pub fn router(state: CollectorState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/params", get(params))
        .route("/timeseries", get(timeseries))
        .route("/correlation", get(correlation))
        .route("/predict_data", get(predict_data))
        .route("/regression_data", get(regression_data))
        .with_state(state)
}

async fn root(State(state): State<CollectorState>) -> Json<Value> {
    Json(json!({
        "service": "Collector",
        "status": "running",
        "storage_url": state.upstream.storage().base_url().as_str(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn health(State(state): State<CollectorState>) -> Json<Health> {
    let storage_status = match state.upstream.storage().health().await {
        Ok(h) => h.status,
        Err(e) => {
            tracing::warn!("storage health check failed: {e}");
            "unavailable".to_string()
        }
    };
    let mut report = Health::ok(Utc::now().to_rfc3339());
    report.storage_status = Some(storage_status);
    Json(report)
}

async fn params(State(state): State<CollectorState>) -> Json<ParamsResponse> {
    Json(ParamsResponse {
        params: state.layout.param_names(),
    })
}

async fn timeseries(
    State(state): State<CollectorState>,
    query: Result<Query<ParamQuery>, QueryRejection>,
) -> Result<Json<TimeseriesResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, param = %q.param, "GET /timeseries");
    if state.layout.param_index(&q.param).is_none() {
        return Err(SeriesError::UnknownParam {
            name: q.param,
            available: state.layout.param_names(),
        }
        .into());
    }

    let row = state
        .upstream
        .storage()
        .meteo_row(&q.region, &q.district, q.year)
        .await?;
    let series = state.layout.extract_param(&row.data, &q.param)?.to_vec();
    tracing::info!(values = series.len(), "timeseries extracted");

    Ok(Json(TimeseriesResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        year: q.year,
        param: q.param,
        timeseries: series,
    }))
}

async fn correlation(
    State(state): State<CollectorState>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<CorrelationResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, "GET /correlation");
    let resp = state.upstream.storage().all_years(&q.region, &q.district).await?;

    let points = resp
        .rows
        .iter()
        .map(|row| {
            Ok(YearPoint {
                year: row.year,
                ndvi_max: state.layout.ndvi_max(&row.meteo_data)?,
                productive: row.productive,
            })
        })
        .collect::<Result<Vec<_>, SeriesError>>()?;
    tracing::info!(years = points.len(), "correlation points built");

    Ok(Json(CorrelationResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        count: points.len(),
        data: points,
    }))
}

async fn predict_data(
    State(state): State<CollectorState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<PredictDataResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, "GET /predict_data");
    let resp = state
        .upstream
        .storage()
        .with_yield(&q.region, &q.district, q.year)
        .await?;

    let stats = BTreeMap::from([
        (MEAN_PROD.to_string(), resp.mean_productive),
        (TREND.to_string(), resp.trend),
        (DISP.to_string(), resp.prod_disperssion_norm),
    ]);
    let input = state
        .layout
        .prepare_model_input(&resp.meteo_data_prev, &resp.meteo_data, &stats)?;
    tracing::info!(
        values = input.data.len(),
        num_of_params = input.num_of_params,
        "model input prepared"
    );

    Ok(Json(PredictDataResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        year: q.year,
        data: input.data,
        num_of_params: input.num_of_params,
        productive: resp.productive,
    }))
}

async fn regression_data(
    State(state): State<CollectorState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<RegressionDataResponse>, AppError> {
    let q = extract_query(query)?;
    let history = q.history.unwrap_or(DEFAULT_HISTORY);
    tracing::info!(region = %q.region, district = %q.district, year = q.year, history, "GET /regression_data");
    let resp = state
        .upstream
        .storage()
        .multi_year(&q.region, &q.district, q.year, history)
        .await?;

    let points = year_points(&state.layout, &resp.years, &resp.meteo_rows, &resp.yields)?;

    Ok(Json(RegressionDataResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        target_year: q.year,
        count: points.len(),
        data: points,
    }))
}

/// Zip parallel year/row/yield columns into points.
fn year_points(
    layout: &ParamLayout,
    years: &[i32],
    rows: &[Vec<f64>],
    yields: &[f64],
) -> Result<Vec<YearPoint>, AppError> {
    if rows.len() != years.len() || yields.len() != years.len() {
        return Err(AppError::Upstream(format!(
            "storage returned {} years, {} rows, {} yields",
            years.len(),
            rows.len(),
            yields.len()
        )));
    }
    years
        .iter()
        .zip(rows)
        .zip(yields)
        .map(|((year, row), productive)| {
            Ok(YearPoint {
                year: *year,
                ndvi_max: layout.ndvi_max(row)?,
                productive: *productive,
            })
        })
        .collect()
}
