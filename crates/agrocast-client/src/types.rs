//! Wire types shared by the services and their clients.
//!
//! Every successful data response carries `"status": "OK"`. Field names are
//! snake_case and match the JSON verbatim.

use agrocast_core::{Forecast, LinearFit, RegressionForecast, YearPoint};
use serde::{Deserialize, Serialize};

/// The `status` value of a successful response.
pub const STATUS_OK: &str = "OK";

fn ok_status() -> String {
    STATUS_OK.to_string()
}

/// `GET /health` of any service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// `OK` when the service is up.
    pub status: String,
    /// Service clock at response time (RFC 3339).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Storage status, reported by the collector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_status: Option<String>,
    /// Collector status, reported by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_status: Option<String>,
    /// ML status, reported by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_status: Option<String>,
}

impl Health {
    /// An `OK` health report stamped with `timestamp`.
    pub fn ok(timestamp: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            timestamp: Some(timestamp.into()),
            storage_status: None,
            collector_status: None,
            ml_status: None,
        }
    }
}

// -- Storage -------------------------------------------------------------------

/// `GET /years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearsResponse {
    pub region: String,
    pub district: String,
    pub years: Vec<i32>,
}

/// `GET /meteo/row`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteoRowResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    pub row_index: usize,
    pub data: Vec<f64>,
}

/// One year of `GET /meteo/all_years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: i32,
    pub productive: f64,
    pub meteo_data: Vec<f64>,
}

/// `GET /meteo/all_years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllYearsResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub count: usize,
    pub rows: Vec<YearRow>,
}

/// `GET /meteo/with_yield`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithYieldResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    pub row_index: usize,
    pub meteo_data: Vec<f64>,
    pub meteo_data_prev: Vec<f64>,
    pub productive: f64,
    pub mean_productive: f64,
    pub trend: f64,
    pub prod_disperssion_norm: f64,
}

/// `GET /meteo/multi_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiYearResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub target_year: i32,
    pub years: Vec<i32>,
    pub meteo_rows: Vec<Vec<f64>>,
    pub yields: Vec<f64>,
}

// -- Collector -----------------------------------------------------------------

/// `GET /params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsResponse {
    pub params: Vec<String>,
}

/// `GET /timeseries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    pub param: String,
    pub timeseries: Vec<f64>,
}

/// `GET /correlation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub count: usize,
    pub data: Vec<YearPoint>,
}

/// `GET /predict_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictDataResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    pub data: Vec<f64>,
    pub num_of_params: usize,
    pub productive: f64,
}

/// `GET /regression_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionDataResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub target_year: i32,
    pub count: usize,
    pub data: Vec<YearPoint>,
}

// -- ML ------------------------------------------------------------------------

/// `GET /model/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub model_loaded: bool,
    /// Expected `(num_params, seq_len)` of the loaded model.
    #[serde(default)]
    pub input_shape: Option<(usize, usize)>,
}

/// `POST /model/reload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// `POST /predict` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub data: Option<Vec<f64>>,
    #[serde(default)]
    pub num_of_params: Option<usize>,
    pub productive: f64,
}

/// `POST /predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: Option<String>,
    pub district: Option<String>,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub forecast: Forecast,
}

/// `POST /regression` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub target_year: Option<i32>,
    pub data: Vec<YearPoint>,
}

/// `POST /regression` response; `year` is the held-out year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResponse {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: Option<String>,
    pub district: Option<String>,
    #[serde(flatten)]
    pub result: RegressionForecast,
}

// -- Gateway -------------------------------------------------------------------

/// `GET /scenario1`: one parameter's daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario1Response {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    pub param: String,
    pub data_length: usize,
    pub timeseries: Vec<f64>,
}

/// `GET /scenario2`: NDVI max against yield across years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario2Response {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub count: usize,
    /// Pearson r, absent when undefined.
    pub correlation: Option<f64>,
    /// Least-squares trend line, absent without points.
    pub trend: Option<LinearFit>,
    pub points: Vec<YearPoint>,
}

/// `GET /scenario3`: model forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario3Response {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub year: i32,
    #[serde(flatten)]
    pub forecast: Forecast,
}

/// `GET /scenario4`: regression forecast over the history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario4Response {
    #[serde(default = "ok_status")]
    pub status: String,
    pub region: String,
    pub district: String,
    pub history: u32,
    #[serde(flatten)]
    pub result: RegressionForecast,
    pub points: Vec<YearPoint>,
}
