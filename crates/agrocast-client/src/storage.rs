//! Typed client for the storage service.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/health` | Liveness |
//! | GET | `/districts` | Region → district names |
//! | GET | `/years` | Years with data for a district |
//! | GET | `/meteo/row` | One district-year |
//! | GET | `/meteo/all_years` | Every year of a district |
//! | GET | `/meteo/with_yield` | District-year plus the previous year |
//! | GET | `/meteo/multi_year` | A run of consecutive years |

use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::http::{Endpoint, NO_QUERY};
use crate::types::{
    AllYearsResponse, Health, MeteoRowResponse, MultiYearResponse, WithYieldResponse,
    YearsResponse,
};

/// Client for the storage service.
#[derive(Debug, Clone)]
pub struct StorageClient {
    endpoint: Endpoint,
}

impl StorageClient {
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

    /// `GET /districts`, as (region, districts) pairs in service order.
    pub async fn districts(&self) -> Result<Vec<(String, Vec<String>)>, ClientError> {
        let map: Map<String, Value> = self.endpoint.get("/districts", NO_QUERY).await?;
        Ok(map
            .into_iter()
            .map(|(region, ds)| {
                let names = match ds {
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                (region, names)
            })
            .collect())
    }

    /// `GET /years`.
    pub async fn years(&self, region: &str, district: &str) -> Result<YearsResponse, ClientError> {
        self.endpoint
            .get("/years", &[("region", region), ("district", district)])
            .await
    }

    /// `GET /meteo/row`.
    pub async fn meteo_row(
        &self,
        region: &str,
        district: &str,
        year: i32,
    ) -> Result<MeteoRowResponse, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/meteo/row",
                &[("region", region), ("district", district), ("year", year.as_str())],
            )
            .await
    }

    /// `GET /meteo/all_years`.
    pub async fn all_years(&self, region: &str, district: &str) -> Result<AllYearsResponse, ClientError> {
        self.endpoint
            .get("/meteo/all_years", &[("region", region), ("district", district)])
            .await
    }

    /// `GET /meteo/with_yield`.
    pub async fn with_yield(
        &self,
        region: &str,
        district: &str,
        year: i32,
    ) -> Result<WithYieldResponse, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/meteo/with_yield",
                &[("region", region), ("district", district), ("year", year.as_str())],
            )
            .await
    }

    /// `GET /meteo/multi_year`.
    pub async fn multi_year(
        &self,
        region: &str,
        district: &str,
        year: i32,
        history: u32,
    ) -> Result<MultiYearResponse, ClientError> {
        let year = year.to_string();
        let history = history.to_string();
        self.endpoint
            .get(
                "/meteo/multi_year",
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
