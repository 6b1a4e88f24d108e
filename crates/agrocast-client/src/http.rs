//! Request plumbing shared by the service clients.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::ClientError;
use crate::retry::retry_send;

/// Empty query string.
pub(crate) const NO_QUERY: &[(&str, &str)] = &[];

/// A base URL, its request timeout, and the shared connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl Endpoint {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET {base}{path}?{query}` and decode the JSON body.
    pub(crate) async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = format!("GET /{}", path.trim_start_matches('/'));
        let url = self.url(path);
        tracing::debug!(%url, "upstream request");
        let resp = retry_send(|| self.http.get(&url).timeout(self.timeout).query(query).send())
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        decode(endpoint, resp).await
    }

    /// `POST {base}{path}` with a JSON body (or none) and decode the JSON reply.
    pub(crate) async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = format!("POST /{}", path.trim_start_matches('/'));
        let url = self.url(path);
        tracing::debug!(%url, "upstream request");
        let resp = retry_send(|| {
            let req = self.http.post(&url).timeout(self.timeout);
            match body {
                Some(b) => req.json(b).send(),
                None => req.send(),
            }
        })
        .await
        .map_err(|e| ClientError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        decode(endpoint, resp).await
    }
}

async fn decode<T: DeserializeOwned>(endpoint: String, resp: reqwest::Response) -> Result<T, ClientError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            endpoint,
            status,
            body,
        });
    }
    resp.json()
        .await
        .map_err(|e| ClientError::Deserialization { endpoint, source: e })
}
