//! # agrocast-client: Typed Clients for the agrocast Services
//!
//! One client per service, all sharing a single connection pool. Storage
//! and collector calls use the short timeout; ML and gateway calls use the
//! long one, since each waits on a chain of calls below it. The wire types in [`types`] are used on both ends: the
//! services serialize them, the clients deserialize them.
//!
//! ```text
//!  visualization ──▶ gateway ──▶ collector ──▶ storage
//!                          └───▶ ml
//! ```
//!
//! Transport failures are retried with exponential backoff. Non-2xx
//! responses surface as [`ClientError::Api`] with the status and body.

pub mod collector;
pub mod config;
pub mod error;
pub mod gateway;
pub(crate) mod http;
pub mod ml;
pub(crate) mod retry;
pub mod storage;
pub mod types;

pub use collector::CollectorClient;
pub use config::{ConfigError, ServiceUrls};
pub use error::ClientError;
pub use gateway::GatewayClient;
pub use ml::MlClient;
pub use storage::StorageClient;

use std::time::Duration;

use crate::http::Endpoint;

/// Clients for every agrocast service.
#[derive(Debug, Clone)]
pub struct AgrocastClient {
    storage: StorageClient,
    collector: CollectorClient,
    ml: MlClient,
    gateway: GatewayClient,
}

impl AgrocastClient {
    /// Build the clients from service addresses.
    pub fn new(urls: ServiceUrls) -> Result<Self, ClientError> {
        let short = Duration::from_secs(urls.timeout_secs);
        let long = Duration::from_secs(urls.long_timeout_secs);
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            storage: StorageClient::new(Endpoint::new(http.clone(), urls.storage_url, short)),
            collector: CollectorClient::new(Endpoint::new(http.clone(), urls.collector_url, short)),
            ml: MlClient::new(Endpoint::new(http.clone(), urls.ml_url, long)),
            gateway: GatewayClient::new(Endpoint::new(http, urls.gateway_url, long)),
        })
    }

    /// Storage service client.
    pub fn storage(&self) -> &StorageClient {
        &self.storage
    }

    /// Collector service client.
    pub fn collector(&self) -> &CollectorClient {
        &self.collector
    }

    /// ML service client.
    pub fn ml(&self) -> &MlClient {
        &self.ml
    }

    /// Gateway client.
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }
}
