//! # Visualization Routes
//!
//! Serves the browser page, the region/district select data, and proxies
//! the scenarios to the gateway.
//!
//! Scenario proxies always answer 200. On success the body is the gateway's
//! JSON unchanged; on failure it is `{"status": "error", "message": ...}`
//! with a message meant for the end user. A region/district pair is
//! replayed through [`CascadingSelectBinder`] first; a district outside the
//! region's list never reaches the gateway.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use agrocast_client::ClientError;
use agrocast_core::{
    district_options, CascadingSelectBinder, DistrictControl, DistrictSelectState, RegionDistrictMap,
    SelectError,
};
use agrocast_store::DEFAULT_HISTORY;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::VisualizationState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `GET /api/district-options` query. A missing region counts as empty.
#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    #[serde(default)]
    pub region: String,
}

/// `POST /api/scenario1` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario1Request {
    pub region: String,
    pub district: String,
    pub year: i32,
    pub param: String,
}

/// `POST /api/scenario2` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario2Request {
    pub region: String,
    pub district: String,
}

/// `POST /api/scenario3` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario3Request {
    pub region: String,
    pub district: String,
    pub year: i32,
}

/// `POST /api/scenario4` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario4Request {
    pub region: String,
    pub district: String,
    pub year: i32,
    #[serde(default)]
    pub history: Option<u32>,
}

/// Build the visualization router.
pub fn router(state: VisualizationState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/regions", get(regions))
        .route("/api/district-options", get(district_options_handler))
        .route("/api/scenario1", post(scenario1))
        .route("/api/scenario2", post(scenario2))
        .route("/api/scenario3", post(scenario3))
        .route("/api/scenario4", post(scenario4))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn regions(State(state): State<VisualizationState>) -> Json<Vec<String>> {
    Json(state.catalog.regions().map(str::to_string).collect())
}

async fn district_options_handler(
    State(state): State<VisualizationState>,
    query: Result<Query<RegionQuery>, QueryRejection>,
) -> Result<Json<DistrictControl>, AppError> {
    let q = extract_query(query)?;
    Ok(Json(district_options(state.catalog, &q.region)))
}

/// User-facing text for a failed gateway call.
pub fn error_message(err: &ClientError) -> String {
    match err.status() {
        Some(502) => "502 Bad Gateway - данные не найдены".to_string(),
        Some(404) => "Данные не найдены для выбранных параметров".to_string(),
        Some(500) => "500 Internal Server Error".to_string(),
        Some(code) => format!("HTTP ошибка: {code}"),
        None if err.is_timeout() => "Timeout - превышено время ожидания".to_string(),
        None if err.is_connect() => "Ошибка соединения с сервером".to_string(),
        None => err.to_string(),
    }
}

/// Check that `district` is a concrete choice of `region`'s district list.
pub fn validate_selection(
    catalog: &RegionDistrictMap,
    region: &str,
    district: &str,
) -> Result<(), String> {
    let mut binder = CascadingSelectBinder::new(catalog);
    binder.on_region_changed(region);
    match binder.select_district(district) {
        Ok(control) if control.state == DistrictSelectState::EnabledSelected => Ok(()),
        Ok(_) => Err("Выберите район".to_string()),
        Err(SelectError::Disabled) => Err("Сначала выберите регион".to_string()),
        Err(SelectError::NotAnOption { region, district }) => {
            Err(format!("Район «{district}» не относится к региону «{region}»"))
        }
    }
}

fn reply<T: Serialize>(scenario: &str, result: Result<T, ClientError>) -> Response {
    match result {
        Ok(resp) => Json(resp).into_response(),
        Err(err) => {
            tracing::warn!("{scenario} failed: {err}");
            error_reply(error_message(&err))
        }
    }
}

fn error_reply(message: String) -> Response {
    Json(json!({"status": "error", "message": message})).into_response()
}

fn bad_body(err: JsonRejection) -> Response {
    error_reply(err.body_text())
}

async fn scenario1(
    State(state): State<VisualizationState>,
    body: Result<Json<Scenario1Request>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    if let Err(message) = validate_selection(state.catalog, &req.region, &req.district) {
        tracing::debug!(region = %req.region, district = %req.district, "rejected selection");
        return error_reply(message);
    }
    let result = state
        .upstream
        .gateway()
        .scenario1(&req.region, &req.district, req.year, &req.param)
        .await;
    reply("scenario1", result)
}

async fn scenario2(
    State(state): State<VisualizationState>,
    body: Result<Json<Scenario2Request>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    if let Err(message) = validate_selection(state.catalog, &req.region, &req.district) {
        tracing::debug!(region = %req.region, district = %req.district, "rejected selection");
        return error_reply(message);
    }
    let result = state.upstream.gateway().scenario2(&req.region, &req.district).await;
    reply("scenario2", result)
}

async fn scenario3(
    State(state): State<VisualizationState>,
    body: Result<Json<Scenario3Request>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    if let Err(message) = validate_selection(state.catalog, &req.region, &req.district) {
        tracing::debug!(region = %req.region, district = %req.district, "rejected selection");
        return error_reply(message);
    }
    let result = state
        .upstream
        .gateway()
        .scenario3(&req.region, &req.district, req.year)
        .await;
    reply("scenario3", result)
}

async fn scenario4(
    State(state): State<VisualizationState>,
    body: Result<Json<Scenario4Request>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(e),
    };
    if let Err(message) = validate_selection(state.catalog, &req.region, &req.district) {
        tracing::debug!(region = %req.region, district = %req.district, "rejected selection");
        return error_reply(message);
    }
    let history = req.history.unwrap_or(DEFAULT_HISTORY);
    let result = state
        .upstream
        .gateway()
        .scenario4(&req.region, &req.district, req.year, history)
        .await;
    reply("scenario4", result)
}
