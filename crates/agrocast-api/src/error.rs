//! # API Error Types
//!
//! Maps store, series, model and upstream errors to HTTP status codes with a
//! JSON body `{"error": {"code", "message"}}`. Internal and upstream error
//! messages are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agrocast_client::ClientError;
use agrocast_core::{AnalyticsError, SeriesError};
use agrocast_store::StoreError;

use crate::model::ModelError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request parameter (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Well-formed request the data cannot satisfy (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown district or no data for the requested year (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// Upstream service failed or is unreachable (502).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A required resource, such as the model, is not loaded (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "An upstream service error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "upstream service error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => tracing::info!(error = %self, "request rejected"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        // Client-side rejections pass through so callers can tell "no data"
        // apart from a broken upstream.
        match err.status() {
            Some(400) => Self::BadRequest(err.to_string()),
            Some(404) => Self::NotFound(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::UnknownParam { .. } => Self::BadRequest(err.to_string()),
            // Anything else means the stored rows disagree with the layout.
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InputShape { .. } | ModelError::NumParams { .. } => {
                Self::Validation(err.to_string())
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_code().0, expected, "{err}");
        }
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let resp = AppError::Internal("/srv/data/penza.csv: permission denied".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body["error"]["message"].as_str().unwrap().contains("penza"));
    }

    #[tokio::test]
    async fn not_found_message_is_kept() {
        let resp = AppError::NotFound("no data for d, 1999".into()).into_response();
        let body = body_json(resp).await;
        assert!(body["error"]["message"].as_str().unwrap().contains("1999"));
    }

    #[test]
    fn store_errors_split_by_kind() {
        let nf = AppError::from(StoreError::NoData {
            district: "d".into(),
            year: 2000,
        });
        assert!(matches!(nf, AppError::NotFound(_)));
        let internal = AppError::from(StoreError::MissingPrefix("r".into()));
        assert!(matches!(internal, AppError::Internal(_)));
    }

    #[test]
    fn unknown_param_is_bad_request() {
        let err = AppError::from(SeriesError::UnknownParam {
            name: "rain".into(),
            available: vec![],
        });
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn upstream_not_found_passes_through() {
        let api = |status| ClientError::Api {
            endpoint: "GET /meteo/row".into(),
            status,
            body: "{}".into(),
        };
        assert!(matches!(AppError::from(api(404)), AppError::NotFound(_)));
        assert!(matches!(AppError::from(api(400)), AppError::BadRequest(_)));
        assert!(matches!(AppError::from(api(500)), AppError::Upstream(_)));
        assert!(matches!(AppError::from(api(503)), AppError::Upstream(_)));
    }
}
