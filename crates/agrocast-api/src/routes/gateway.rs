//! # Gateway Routes
//!
//! The four analysis scenarios. Each one calls the collector, and scenarios
//! 3 and 4 pass the collector's output on to the ML service.
//!
//! | Scenario | Collector | ML |
//! |----------|-----------|----|
//! | 1: one parameter's series | `/timeseries` | |
//! | 2: NDVI max vs yield | `/correlation` | |
//! | 3: model forecast | `/predict_data` | `/predict` |
//! | 4: regression forecast | `/regression_data` | `/regression` |

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use agrocast_client::types::{
    Health, PredictRequest, RegressionRequest, Scenario1Response, Scenario2Response,
    Scenario3Response, Scenario4Response, STATUS_OK,
};
use agrocast_client::ClientError;
use agrocast_core::{pearson, LinearFit};
use agrocast_store::DEFAULT_HISTORY;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::routes::collector::ParamQuery;
use crate::routes::storage::{DistrictQuery, HistoryQuery, YearQuery};
use crate::state::GatewayState;

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/scenario1", get(scenario1))
        .route("/scenario2", get(scenario2))
        .route("/scenario3", get(scenario3))
        .route("/scenario4", get(scenario4))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Gateway",
        "status": "running",
        "scenarios": ["scenario1", "scenario2", "scenario3", "scenario4"],
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn upstream_status(result: Result<Health, ClientError>, name: &str) -> String {
    match result {
        Ok(h) => h.status,
        Err(e) => {
            tracing::warn!("{name} health check failed: {e}");
            "unavailable".to_string()
        }
    }
}

async fn health(State(state): State<GatewayState>) -> Json<Health> {
    let (collector, ml) = tokio::join!(
        state.upstream.collector().health(),
        state.upstream.ml().health()
    );
    let mut report = Health::ok(Utc::now().to_rfc3339());
    report.collector_status = Some(upstream_status(collector, "collector"));
    report.ml_status = Some(upstream_status(ml, "ml"));
    Json(report)
}

async fn scenario1(
    State(state): State<GatewayState>,
    query: Result<Query<ParamQuery>, QueryRejection>,
) -> Result<Json<Scenario1Response>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, param = %q.param, "scenario 1");
    let ts = state
        .upstream
        .collector()
        .timeseries(&q.region, &q.district, q.year, &q.param)
        .await?;
    Ok(Json(Scenario1Response {
        status: STATUS_OK.to_string(),
        region: ts.region,
        district: ts.district,
        year: ts.year,
        param: ts.param,
        data_length: ts.timeseries.len(),
        timeseries: ts.timeseries,
    }))
}

async fn scenario2(
    State(state): State<GatewayState>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<Scenario2Response>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, "scenario 2");
    let corr = state
        .upstream
        .collector()
        .correlation(&q.region, &q.district)
        .await?;

    let xs: Vec<f64> = corr.data.iter().map(|p| p.ndvi_max).collect();
    let ys: Vec<f64> = corr.data.iter().map(|p| p.productive).collect();
    let correlation = pearson(&xs, &ys);
    let trend = LinearFit::fit(&xs, &ys).ok();
    tracing::info!(points = corr.data.len(), ?correlation, "scenario 2 computed");

    Ok(Json(Scenario2Response {
        status: STATUS_OK.to_string(),
        region: corr.region,
        district: corr.district,
        count: corr.data.len(),
        correlation,
        trend,
        points: corr.data,
    }))
}

async fn scenario3(
    State(state): State<GatewayState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<Scenario3Response>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, "scenario 3");
    let input = state
        .upstream
        .collector()
        .predict_data(&q.region, &q.district, q.year)
        .await?;
    let forecast = state
        .upstream
        .ml()
        .predict(&PredictRequest {
            region: Some(input.region.clone()),
            district: Some(input.district.clone()),
            year: Some(input.year),
            data: Some(input.data),
            num_of_params: Some(input.num_of_params),
            productive: input.productive,
        })
        .await?;
    Ok(Json(Scenario3Response {
        status: STATUS_OK.to_string(),
        region: input.region,
        district: input.district,
        year: input.year,
        forecast: forecast.forecast,
    }))
}

async fn scenario4(
    State(state): State<GatewayState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Scenario4Response>, AppError> {
    let q = extract_query(query)?;
    let history = q.history.unwrap_or(DEFAULT_HISTORY);
    tracing::info!(region = %q.region, district = %q.district, year = q.year, history, "scenario 4");
    let points = state
        .upstream
        .collector()
        .regression_data(&q.region, &q.district, q.year, history)
        .await?;
    let fit = state
        .upstream
        .ml()
        .regression(&RegressionRequest {
            region: Some(points.region.clone()),
            district: Some(points.district.clone()),
            target_year: Some(points.target_year),
            data: points.data.clone(),
        })
        .await?;
    Ok(Json(Scenario4Response {
        status: STATUS_OK.to_string(),
        region: points.region,
        district: points.district,
        history,
        result: fit.result,
        points: points.data,
    }))
}
