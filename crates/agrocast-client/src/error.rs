//! Client error types.

/// Errors from calls to an agrocast service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, ...).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// Logical endpoint, e.g. `GET /meteo/row`.
        endpoint: String,
        /// Underlying error.
        source: reqwest::Error,
    },
    /// The service answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        /// Logical endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
    /// The response body did not match the expected type.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        /// Logical endpoint.
        endpoint: String,
        /// Underlying error.
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ClientError {
    /// Upstream status code, for non-2xx responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http { source, .. } if source.is_timeout())
    }

    /// Whether the service could not be reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Http { source, .. } if source.is_connect())
    }
}
