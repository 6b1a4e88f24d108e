//! Typed client for the ML service.

use crate::error::ClientError;
use crate::http::{Endpoint, NO_QUERY};
use crate::types::{
    Health, ModelInfo, PredictRequest, PredictResponse, RegressionRequest, RegressionResponse,
    ReloadResponse,
};

/// Client for the ML service.
#[derive(Debug, Clone)]
pub struct MlClient {
    endpoint: Endpoint,
}

impl MlClient {
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

    /// `GET /model/info`.
    pub async fn model_info(&self) -> Result<ModelInfo, ClientError> {
        self.endpoint.get("/model/info", NO_QUERY).await
    }

    /// `POST /model/reload`.
    pub async fn reload(&self) -> Result<ReloadResponse, ClientError> {
        self.endpoint.post::<(), _>("/model/reload", None).await
    }

    /// `POST /predict`.
    pub async fn predict(&self, req: &PredictRequest) -> Result<PredictResponse, ClientError> {
        self.endpoint.post("/predict", Some(req)).await
    }

    /// `POST /regression`.
    pub async fn regression(&self, req: &RegressionRequest) -> Result<RegressionResponse, ClientError> {
        self.endpoint.post("/regression", Some(req)).await
    }
}
