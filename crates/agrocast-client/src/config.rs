//! Upstream service addresses.
//!
//! Defaults match the service names of the compose deployment. Override via
//! environment variables or explicit construction for local runs and tests.

use url::Url;

/// Default storage service address.
pub const DEFAULT_STORAGE_URL: &str = "http://storage-service:8000";
/// Default collector service address.
pub const DEFAULT_COLLECTOR_URL: &str = "http://collector-service:8001";
/// Default ML service address.
pub const DEFAULT_ML_URL: &str = "http://ml-service:8002";
/// Default gateway address.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8003";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default timeout for the ML and gateway services, which sit at the top of
/// a call chain and must outlast the hops below them.
pub const DEFAULT_LONG_TIMEOUT_SECS: u64 = 60;

/// Base URLs of the agrocast services plus the request timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUrls {
    /// Storage service.
    pub storage_url: Url,
    /// Collector service.
    pub collector_url: Url,
    /// ML service.
    pub ml_url: Url,
    /// Gateway service.
    pub gateway_url: Url,
    /// Request timeout in seconds for storage and collector.
    pub timeout_secs: u64,
    /// Request timeout in seconds for ML and gateway.
    pub long_timeout_secs: u64,
}

impl ServiceUrls {
    /// Load from environment variables.
    ///
    /// Variables:
    /// - `STORAGE_URL` (default: `http://storage-service:8000`)
    /// - `COLLECTOR_URL` (default: `http://collector-service:8001`)
    /// - `ML_URL` (default: `http://ml-service:8002`)
    /// - `GATEWAY_URL` (default: `http://localhost:8003`)
    /// - `HTTP_TIMEOUT_SECS` (default: 30)
    /// - `HTTP_LONG_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            storage_url: env_url("STORAGE_URL", DEFAULT_STORAGE_URL)?,
            collector_url: env_url("COLLECTOR_URL", DEFAULT_COLLECTOR_URL)?,
            ml_url: env_url("ML_URL", DEFAULT_ML_URL)?,
            gateway_url: env_url("GATEWAY_URL", DEFAULT_GATEWAY_URL)?,
            timeout_secs: env_secs("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            long_timeout_secs: env_secs("HTTP_LONG_TIMEOUT_SECS", DEFAULT_LONG_TIMEOUT_SECS),
        })
    }

    /// Point every service at the same base URL (mock servers in tests).
    pub fn all_at(base: &str) -> Result<Self, ConfigError> {
        let url =
            Url::parse(base).map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))?;
        Ok(Self {
            storage_url: url.clone(),
            collector_url: url.clone(),
            ml_url: url.clone(),
            gateway_url: url,
            timeout_secs: 5,
            long_timeout_secs: 5,
        })
    }
}

fn env_secs(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
