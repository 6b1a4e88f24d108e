//! Typed client for the collector service.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/health` | Liveness, with storage status |
//! | GET | `/params` | Meteo parameter names |
//! | GET | `/timeseries` | One parameter of a district-year |
//! | GET | `/correlation` | NDVI max and yield per year |
//! | GET | `/predict_data` | Normalized model input |
//! | GET | `/regression_data` | NDVI max and yield over a history window |

use crate::error::ClientError;
use crate::http::{Endpoint, NO_QUERY};
use crate::types::{
    CorrelationResponse, Health, ParamsResponse, PredictDataResponse, RegressionDataResponse,
    TimeseriesResponse,
};

/// Client for the collector service.
#[derive(Debug, Clone)]
pub struct CollectorClient {
    endpoint: Endpoint,
}

impl CollectorClient {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &url::Url {
        self.endpoint.base_url()
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Health, ClientError> {
        self.endpoint.get("/health", NO_QUERY).await
    }

    /// `GET /params`.
    pub async fn params(&self) -> Result<ParamsResponse, ClientError> {
        self.endpoint.get("/params", NO_QUERY).await
    }

    /// `GET /timeseries`.
    pub async fn timeseries(
        &self,
        region: &str,
        district: &str,
        year: i32,
        param: &str,
    ) -> Result<TimeseriesResponse, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/timeseries",
                &[
                    ("region", region),
                    ("district", district),
                    ("year", year.as_str()),
                    ("param", param),
                ],
            )
            .await
    }

    /// `GET /correlation`.
    pub async fn correlation(&self, region: &str, district: &str) -> Result<CorrelationResponse, ClientError> {
        self.endpoint
            .get("/correlation", &[("region", region), ("district", district)])
            .await
    }

    /// `GET /predict_data`.
    pub async fn predict_data(
        &self,
        region: &str,
        district: &str,
        year: i32,
    ) -> Result<PredictDataResponse, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/predict_data",
                &[("region", region), ("district", district), ("year", year.as_str())],
            )
            .await
    }

    /// `GET /regression_data`.
    pub async fn regression_data(
        &self,
        region: &str,
        district: &str,
        year: i32,
        history: u32,
    ) -> Result<RegressionDataResponse, ClientError> {
        let year = year.to_string();
        let history = history.to_string();
        self.endpoint
            .get(
                "/regression_data",
                &[
                    ("region", region),
                    ("district", district),
                    ("year", year.as_str()),
                    ("history", history.as_str()),
                ],
            )
            .await
    }
}
