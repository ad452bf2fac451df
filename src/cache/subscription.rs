use std::sync::Arc;

use tokio::sync::watch;

use super::key::QueryKey;
use super::query_cache::CacheShared;
use super::snapshot::{QueryData, QuerySnapshot};
use crate::error::FetchFailure;

/// A live interest in one cache key.
///
/// While at least one subscription for a key exists, the key is polled.
/// Dropping the last one stops polling.
pub struct Subscription {
    key: QueryKey,
    receiver: watch::Receiver<QuerySnapshot>,
    cache: Arc<CacheShared>,
}

impl Subscription {
    pub(crate) fn new(
        key: QueryKey,
        receiver: watch::Receiver<QuerySnapshot>,
        cache: Arc<CacheShared>,
    ) -> Self {
        Self {
            key,
            receiver,
            cache,
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    /// Current snapshot, marking it seen.
    pub fn snapshot(&mut self) -> QuerySnapshot {
        self.receiver.borrow_and_update().clone()
    }

    /// Current snapshot without marking it seen.
    pub fn peek(&self) -> QuerySnapshot {
        self.receiver.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<QueryData>> {
        self.receiver.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_loading()
    }

    pub fn error(&self) -> Option<FetchFailure> {
        self.receiver.borrow().error.clone()
    }

    /// Wait until the entry changes after the last seen snapshot.
    pub async fn changed(&mut self) {
        // The sender lives in the cache entry, which this subscription keeps
        // alive, so the channel cannot close.
        let _ = self.receiver.changed().await;
    }

    /// Wait until a snapshot satisfies `predicate`, returning it.
    pub async fn wait_until<F>(&mut self, mut predicate: F) -> QuerySnapshot
    where
        F: FnMut(&QuerySnapshot) -> bool,
    {
        loop {
            let snapshot = self.snapshot();
            if predicate(&snapshot) {
                return snapshot;
            }
            self.changed().await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(mut entry) = self.cache.entries.get_mut(&self.key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                if let Some(poller) = entry.poller.take() {
                    poller.abort();
                }
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}
