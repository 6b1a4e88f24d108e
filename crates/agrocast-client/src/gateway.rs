//! Typed client for the gateway's scenario endpoints.

use crate::error::ClientError;
use crate::http::{Endpoint, NO_QUERY};
use crate::types::{Health, Scenario1Response, Scenario2Response, Scenario3Response, Scenario4Response};

/// Client for the gateway service.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    endpoint: Endpoint,
}

impl GatewayClient {
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

    /// `GET /scenario1`: one parameter's series for a district-year.
    pub async fn scenario1(
        &self,
        region: &str,
        district: &str,
        year: i32,
        param: &str,
    ) -> Result<Scenario1Response, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/scenario1",
                &[
                    ("region", region),
                    ("district", district),
                    ("year", year.as_str()),
                    ("param", param),
                ],
            )
            .await
    }

    /// `GET /scenario2`: NDVI max against yield.
    pub async fn scenario2(&self, region: &str, district: &str) -> Result<Scenario2Response, ClientError> {
        self.endpoint
            .get("/scenario2", &[("region", region), ("district", district)])
            .await
    }

    /// `GET /scenario3`: model forecast.
    pub async fn scenario3(
        &self,
        region: &str,
        district: &str,
        year: i32,
    ) -> Result<Scenario3Response, ClientError> {
        let year = year.to_string();
        self.endpoint
            .get(
                "/scenario3",
                &[("region", region), ("district", district), ("year", year.as_str())],
            )
            .await
    }

    /// `GET /scenario4`: regression forecast.
    pub async fn scenario4(
        &self,
        region: &str,
        district: &str,
        year: i32,
        history: u32,
    ) -> Result<Scenario4Response, ClientError> {
        let year = year.to_string();
        let history = history.to_string();
        self.endpoint
            .get(
                "/scenario4",
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
