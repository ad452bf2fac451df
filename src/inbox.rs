//! Wires the client, cache, mutations and event listener together.

use std::sync::Arc;

use crate::adapters::{HttpEventConnector, ReqwestHttpClient};
use crate::cache::{QueryCache, QueryKey, Subscription};
use crate::client::InboxClient;
use crate::config::DevboxConfig;
use crate::error::FetchFailure;
use crate::listener::EventListener;
use crate::models::{Record, ResourceKind, Stats};
use crate::mutation::MutationCoordinator;
use crate::traits::{EventConnector, HttpClient, Invalidator};

/// A synchronized view of the gateway inbox.
///
/// Reads go through the [`QueryCache`]; writes go through the
/// [`MutationCoordinator`]; [`Inbox::listen`] starts the live-update stream
/// that invalidates the cache as the gateway reports changes.
#[derive(Clone)]
pub struct Inbox {
    config: DevboxConfig,
    client: InboxClient,
    cache: QueryCache,
    mutations: MutationCoordinator,
}

impl Inbox {
    /// Build an inbox talking to the gateway over reqwest.
    pub fn new(config: DevboxConfig) -> Self {
        Self::with_http(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http(http: Arc<dyn HttpClient>, config: DevboxConfig) -> Self {
        let client = InboxClient::new(http, config.base_url.clone());
        let cache = QueryCache::with_poll_interval(Arc::new(client.clone()), config.poll_interval);
        let invalidator: Arc<dyn Invalidator> = Arc::new(cache.clone());
        let mutations = MutationCoordinator::new(client.clone(), invalidator);

        Self {
            config,
            client,
            cache,
            mutations,
        }
    }

    pub fn config(&self) -> &DevboxConfig {
        &self.config
    }

    pub fn client(&self) -> &InboxClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    /// Start the event listener against the gateway's `/events` endpoint.
    pub fn listen(&self) -> EventListener {
        let connector = HttpEventConnector::new(self.client.http(), self.client.events_url());
        self.listen_with(Arc::new(connector))
    }

    /// Start the event listener with a custom connector.
    pub fn listen_with(&self, connector: Arc<dyn EventConnector>) -> EventListener {
        EventListener::spawn(
            connector,
            Arc::new(self.cache.clone()),
            self.config.reconnect_policy(),
        )
    }

    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        self.cache.subscribe(key)
    }

    /// Subscribe to stats and all four collections.
    pub fn subscribe_all(&self) -> Vec<Subscription> {
        QueryKey::ALL
            .into_iter()
            .map(|key| self.cache.subscribe(key))
            .collect()
    }

    /// Aggregate counts, from cache when fresh.
    pub async fn stats(&self) -> Result<Stats, FetchFailure> {
        let data = self.cache.query(QueryKey::Stats).await?;
        Ok(data.as_stats().copied().unwrap_or_default())
    }

    /// Records of one kind, from cache when fresh.
    pub async fn records(&self, kind: ResourceKind) -> Result<Vec<Record>, FetchFailure> {
        let data = self.cache.query(QueryKey::from(kind)).await?;
        Ok(data.as_records().map(<[Record]>::to_vec).unwrap_or_default())
    }

    /// One record, always fetched from the gateway.
    pub async fn record(&self, kind: ResourceKind, id: &str) -> Result<Record, FetchFailure> {
        self.client.fetch_record(kind, id).await
    }

    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), FetchFailure> {
        self.mutations.delete_one(kind, id).await
    }

    pub async fn clear_all(&self) -> Result<(), FetchFailure> {
        self.mutations.clear_all().await
    }
}

impl std::fmt::Debug for Inbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inbox")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}
