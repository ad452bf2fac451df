//! Typed REST client for the gateway's inbox API.
//!
//! Thin wrapper over an [`HttpClient`]: builds URLs under the API base,
//! checks status codes and decodes bodies. It never retries; callers decide
//! what to do with a [`FetchFailure`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::ReqwestHttpClient;
use crate::cache::{QueryData, QueryKey};
use crate::error::FetchFailure;
use crate::models::{Record, ResourceKind, Stats};
use crate::traits::{Headers, HttpClient, QueryFetcher, Response};

/// Default API base of a locally running gateway.
pub const DEFAULT_BASE_URL: &str = "http://localhost:10101/api/v1";

/// Client for the inbox REST endpoints.
#[derive(Clone)]
pub struct InboxClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl InboxClient {
    /// Create a client over a custom HTTP implementation.
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Create a client using reqwest.
    pub fn with_reqwest(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The HTTP implementation, shared with the event connector.
    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }

    /// URL of the SSE endpoint.
    pub fn events_url(&self) -> String {
        self.url("events")
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }

    /// `{segment}/{id}`, with the id percent-encoded.
    fn record_resource(kind: ResourceKind, id: &str) -> Result<String, FetchFailure> {
        if id.is_empty() {
            return Err(FetchFailure::InvalidRequest {
                resource: kind.path_segment().to_string(),
                message: "record id must not be empty".to_string(),
            });
        }
        Ok(format!(
            "{}/{}",
            kind.path_segment(),
            urlencoding::encode(id)
        ))
    }

    async fn get(&self, resource: &str) -> Result<Response, FetchFailure> {
        let url = self.url(resource);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url, &Self::headers())
            .await
            .map_err(|e| FetchFailure::from_http(resource, e))?;
        Self::check_status(resource, response)
    }

    async fn delete(&self, resource: &str) -> Result<(), FetchFailure> {
        let url = self.url(resource);
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url, &Self::headers())
            .await
            .map_err(|e| FetchFailure::from_http(resource, e))?;
        Self::check_status(resource, response).map(|_| ())
    }

    fn check_status(resource: &str, response: Response) -> Result<Response, FetchFailure> {
        if response.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(FetchFailure::status(resource, response.status, &body))
        }
    }

    /// `GET /stats`
    pub async fn fetch_stats(&self) -> Result<Stats, FetchFailure> {
        let response = self.get("stats").await?;
        response
            .json::<Stats>()
            .map_err(|e| FetchFailure::decode("stats", &e))
    }

    /// `GET /{kind}`; a `null` body is an empty collection.
    pub async fn fetch_collection(&self, kind: ResourceKind) -> Result<Vec<Record>, FetchFailure> {
        let resource = kind.path_segment();
        let response = self.get(resource).await?;
        Record::parse_list(kind, &response.body).map_err(|e| FetchFailure::decode(resource, &e))
    }

    /// `GET /{kind}/{id}`
    pub async fn fetch_record(&self, kind: ResourceKind, id: &str) -> Result<Record, FetchFailure> {
        let resource = Self::record_resource(kind, id)?;
        let response = self.get(&resource).await?;
        Record::parse_one(kind, &response.body).map_err(|e| FetchFailure::decode(resource, &e))
    }

    /// `DELETE /{kind}/{id}`
    pub async fn delete_record(&self, kind: ResourceKind, id: &str) -> Result<(), FetchFailure> {
        let resource = Self::record_resource(kind, id)?;
        self.delete(&resource).await
    }

    /// `DELETE /messages`
    pub async fn clear_all(&self) -> Result<(), FetchFailure> {
        self.delete("messages").await
    }
}

impl std::fmt::Debug for InboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl QueryFetcher for InboxClient {
    async fn fetch(&self, key: QueryKey) -> Result<QueryData, FetchFailure> {
        match key.kind() {
            None => self.fetch_stats().await.map(QueryData::Stats),
            Some(kind) => self.fetch_collection(kind).await.map(QueryData::Records),
        }
    }
}
