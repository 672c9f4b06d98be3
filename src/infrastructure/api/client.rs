//! Record API client.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::ApiError;
use crate::domain::errors::DomainResult;
use crate::domain::models::{ApiConfig, RecordId};
use crate::domain::ports::{RecordQuery, RecordStore};

/// HTTP client for a json-server style API.
///
/// Every call is a single request: no retries and no caching.
pub struct RestClient {
    http_client: ReqwestClient,
    base_url: Url,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .with_context(|| format!("Invalid API base URL: {raw}"))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot hold a path: {raw}");
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects bases that cannot hold a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn collection_url(&self, collection: &str) -> Url {
        self.endpoint(&[collection])
    }

    fn record_url(&self, collection: &str, id: &RecordId) -> Url {
        self.endpoint(&[collection, id.as_str()])
    }

    /// Send a request, turning non-success statuses into [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = %status, url = %response.url(), "record API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        if status != StatusCode::NOT_FOUND {
            warn!(status = %status, body = %body, "record API request failed");
        }
        Err(ApiError::from_status(status, body))
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RecordStore for RestClient {
    async fn list(&self, collection: &str, query: &RecordQuery) -> DomainResult<Vec<Value>> {
        let request = self
            .http_client
            .get(self.collection_url(collection))
            .query(&query.filters);

        match self.send_json(request).await {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(ApiError::UnknownError(
                StatusCode::OK,
                format!("expected a JSON array, got {other}"),
            )
            .into_domain(collection, None)),
            Err(err) => Err(err.into_domain(collection, None)),
        }
    }

    async fn get(&self, collection: &str, id: &RecordId) -> DomainResult<Option<Value>> {
        let request = self.http_client.get(self.record_url(collection, id));
        match self.send_json(request).await {
            Ok(document) => Ok(Some(document)),
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err.into_domain(collection, Some(id.as_str()))),
        }
    }

    async fn create(&self, collection: &str, body: Value) -> DomainResult<Value> {
        let request = self
            .http_client
            .post(self.collection_url(collection))
            .json(&body);
        self.send_json(request)
            .await
            .map_err(|err| err.into_domain(collection, None))
    }

    async fn replace(&self, collection: &str, id: &RecordId, body: Value) -> DomainResult<Value> {
        let request = self
            .http_client
            .put(self.record_url(collection, id))
            .json(&body);
        self.send_json(request)
            .await
            .map_err(|err| err.into_domain(collection, Some(id.as_str())))
    }

    async fn patch(&self, collection: &str, id: &RecordId, changes: Value) -> DomainResult<Value> {
        let request = self
            .http_client
            .patch(self.record_url(collection, id))
            .json(&changes);
        self.send_json(request)
            .await
            .map_err(|err| err.into_domain(collection, Some(id.as_str())))
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> DomainResult<()> {
        let request = self.http_client.delete(self.record_url(collection, id));
        self.send(request)
            .await
            .map(|_| ())
            .map_err(|err| err.into_domain(collection, Some(id.as_str())))
    }
}
