//! # Storage Service Routes
//!
//! | Method | Path | Query | Response |
//! |--------|------|-------|----------|
//! | GET | `/` | | service info |
//! | GET | `/health` | | `{status, timestamp}` |
//! | GET | `/districts` | | region → district names |
//! | GET | `/years` | region, district | sorted years |
//! | GET | `/meteo/row` | region, district, year | one meteo row |
//! | GET | `/meteo/all_years` | region, district | every year, sorted |
//! | GET | `/meteo/with_yield` | region, district, year | year and year − 1 |
//! | GET | `/meteo/multi_year` | region, district, year, history | `year - history ..= year` |
//!
//! Unknown districts and missing years are 404; unreadable tables are 500.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use agrocast_client::types::{
    AllYearsResponse, Health, MeteoRowResponse, MultiYearResponse, WithYieldResponse, YearRow,
    YearsResponse, STATUS_OK,
};
use agrocast_store::DEFAULT_HISTORY;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::StorageState;

/// `region` + `district` query.
#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    pub region: String,
    pub district: String,
}

/// `region` + `district` + `year` query.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub region: String,
    pub district: String,
    pub year: i32,
}

/// `region` + `district` + `year` + optional `history` query.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub region: String,
    pub district: String,
    pub year: i32,
    #[serde(default)]
    pub history: Option<u32>,
}

/// Build the storage router.
pub fn router(state: StorageState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/districts", get(districts))
        .route("/years", get(years))
        .route("/meteo/row", get(meteo_row))
        .route("/meteo/all_years", get(all_years))
        .route("/meteo/with_yield", get(with_yield))
        .route("/meteo/multi_year", get(multi_year))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Storage",
        "status": "running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn health() -> Json<Health> {
    Json(Health::ok(Utc::now().to_rfc3339()))
}

async fn districts(State(state): State<StorageState>) -> Json<Map<String, Value>> {
    let listing = state
        .store
        .districts()
        .into_iter()
        .map(|(region, names)| (region, json!(names)))
        .collect();
    Json(listing)
}

async fn years(
    State(state): State<StorageState>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<YearsResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, "GET /years");
    let years = state.store.years(&q.region, &q.district)?;
    Ok(Json(YearsResponse {
        region: q.region,
        district: q.district,
        years,
    }))
}

async fn meteo_row(
    State(state): State<StorageState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<MeteoRowResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, "GET /meteo/row");
    let row = state.store.meteo_row(&q.region, &q.district, q.year)?;
    Ok(Json(MeteoRowResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        year: q.year,
        row_index: row.row_index,
        data: row.meteo,
    }))
}

async fn all_years(
    State(state): State<StorageState>,
    query: Result<Query<DistrictQuery>, QueryRejection>,
) -> Result<Json<AllYearsResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, "GET /meteo/all_years");
    let rows: Vec<YearRow> = state
        .store
        .all_years(&q.region, &q.district)?
        .into_iter()
        .map(|r| YearRow {
            year: r.year,
            productive: r.scalar.productive,
            meteo_data: r.meteo,
        })
        .collect();
    Ok(Json(AllYearsResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        count: rows.len(),
        rows,
    }))
}

async fn with_yield(
    State(state): State<StorageState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<WithYieldResponse>, AppError> {
    let q = extract_query(query)?;
    tracing::info!(region = %q.region, district = %q.district, year = q.year, "GET /meteo/with_yield");
    let pair = state.store.with_yield(&q.region, &q.district, q.year)?;
    let s = pair.current.scalar;
    Ok(Json(WithYieldResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        year: q.year,
        row_index: pair.current.row_index,
        meteo_data: pair.current.meteo,
        meteo_data_prev: pair.meteo_prev,
        productive: s.productive,
        mean_productive: s.mean_productive,
        trend: s.trend,
        prod_disperssion_norm: s.prod_disperssion_norm,
    }))
}

async fn multi_year(
    State(state): State<StorageState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<MultiYearResponse>, AppError> {
    let q = extract_query(query)?;
    let history = q.history.unwrap_or(DEFAULT_HISTORY);
    tracing::info!(
        region = %q.region,
        district = %q.district,
        year = q.year,
        history,
        "GET /meteo/multi_year"
    );
    let rows = state.store.multi_year(&q.region, &q.district, q.year, history)?;
    let mut years = Vec::with_capacity(rows.len());
    let mut meteo_rows = Vec::with_capacity(rows.len());
    let mut yields = Vec::with_capacity(rows.len());
    for row in rows {
        years.push(row.year);
        yields.push(row.scalar.productive);
        meteo_rows.push(row.meteo);
    }
    Ok(Json(MultiYearResponse {
        status: STATUS_OK.to_string(),
        region: q.region,
        district: q.district,
        target_year: q.year,
        years,
        meteo_rows,
        yields,
    }))
}
