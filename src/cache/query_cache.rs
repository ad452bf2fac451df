//! Keyed, poll-driven cache of gateway queries.
//!
//! Every key has one [`CacheEntry`] holding a `watch` channel of
//! [`QuerySnapshot`]s, a staleness flag with an invalidation epoch, the
//! in-flight fetch (if any) and the subscriber count that keeps the key's
//! poll task alive. Entries live in a `DashMap`; guards are only held for
//! short synchronous bookkeeping and never across an `.await`.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::key::QueryKey;
use super::snapshot::{QueryData, QuerySnapshot};
use super::subscription::Subscription;
use crate::error::FetchFailure;
use crate::traits::{Invalidator, QueryFetcher};

/// Default poll period for subscribed keys.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

pub(crate) type FetchResult = Result<Arc<QueryData>, FetchFailure>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct InFlight {
    epoch: u64,
    fetch: SharedFetch,
}

pub(crate) struct CacheEntry {
    snapshot: watch::Sender<QuerySnapshot>,
    /// Bumped by every invalidation.
    epoch: u64,
    stale: bool,
    in_flight: Option<InFlight>,
    pub(crate) subscribers: usize,
    pub(crate) poller: Option<JoinHandle<()>>,
}

impl CacheEntry {
    fn new() -> Self {
        let (snapshot, _) = watch::channel(QuerySnapshot::default());
        Self {
            snapshot,
            epoch: 0,
            stale: false,
            in_flight: None,
            subscribers: 0,
            poller: None,
        }
    }

    fn has_data(&self) -> bool {
        self.snapshot.borrow().data.is_some()
    }
}

pub(crate) struct CacheShared {
    fetcher: Arc<dyn QueryFetcher>,
    pub(crate) entries: DashMap<QueryKey, CacheEntry>,
    poll_interval: Duration,
}

impl CacheShared {
    fn entry_mut(&self, key: QueryKey) -> RefMut<'_, QueryKey, CacheEntry> {
        self.entries.entry(key).or_insert_with(CacheEntry::new)
    }

    /// Join the in-flight fetch for `key`, or start one.
    ///
    /// The fetch is driven by a spawned task so it completes (and commits
    /// its result) even when every caller stops awaiting it.
    fn start_fetch(self: &Arc<Self>, key: QueryKey) -> SharedFetch {
        let fetch = {
            let mut entry = self.entry_mut(key);
            if let Some(in_flight) = &entry.in_flight {
                debug!(key = %key, epoch = in_flight.epoch, "Joining in-flight fetch");
                return in_flight.fetch.clone();
            }

            let epoch = entry.epoch;
            let fetcher = Arc::clone(&self.fetcher);
            let cache = Arc::downgrade(self);
            let fetch = async move {
                let result = fetcher.fetch(key).await.map(Arc::new);
                if let Some(cache) = cache.upgrade() {
                    cache.complete(key, epoch, &result);
                }
                result
            }
            .boxed()
            .shared();

            debug!(key = %key, epoch, "Starting fetch");
            entry.in_flight = Some(InFlight {
                epoch,
                fetch: fetch.clone(),
            });
            entry.snapshot.send_modify(|s| s.is_fetching = true);
            fetch
        };

        tokio::spawn(fetch.clone());
        fetch
    }

    /// Commit a finished fetch into the entry.
    fn complete(self: &Arc<Self>, key: QueryKey, epoch: u64, result: &FetchResult) {
        let follow_up = {
            let Some(mut entry) = self.entries.get_mut(&key) else {
                return;
            };
            entry.in_flight = None;

            let invalidated = entry.epoch != epoch;
            if result.is_ok() && !invalidated {
                entry.stale = false;
            }
            let stale = entry.stale;

            match result {
                Ok(data) => {
                    debug!(key = %key, invalidated, "Fetch succeeded");
                    let data = Arc::clone(data);
                    entry.snapshot.send_modify(|s| {
                        s.data = Some(data);
                        s.last_fetched_at = Some(Instant::now());
                        s.error = None;
                        s.is_fetching = false;
                        s.is_stale = stale;
                    });
                }
                Err(err) => {
                    warn!(key = %key, code = err.error_code(), "Fetch failed: {}", err);
                    let err = err.clone();
                    entry.snapshot.send_modify(|s| {
                        s.error = Some(err);
                        s.is_fetching = false;
                        s.is_stale = stale;
                    });
                }
            }

            invalidated && entry.subscribers > 0
        };

        if follow_up {
            debug!(key = %key, "Invalidated during fetch, refetching");
            let _ = self.start_fetch(key);
        }
    }

    fn invalidate(self: &Arc<Self>, key: QueryKey) {
        let refetch = {
            let mut entry = self.entry_mut(key);
            entry.epoch += 1;
            entry.stale = true;
            entry.snapshot.send_modify(|s| s.is_stale = true);
            entry.in_flight.is_none() && entry.subscribers > 0
        };

        debug!(key = %key, refetch, "Invalidated");
        if refetch {
            let _ = self.start_fetch(key);
        }
    }

    fn spawn_poller(self: &Arc<Self>, key: QueryKey) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                debug!(key = %key, "Poll tick");
                let _ = cache.start_fetch(key);
            }
        })
    }
}

/// Query cache with polling, invalidation and in-flight coalescing.
///
/// Cloning yields another handle to the same cache. All methods that may
/// start a fetch spawn onto the current tokio runtime.
///
/// # Example
///
/// ```ignore
/// let cache = QueryCache::new(Arc::new(client));
/// let mut emails = cache.subscribe(QueryKey::Emails);
/// emails.changed().await;
/// println!("{:?}", emails.snapshot().records());
/// ```
#[derive(Clone)]
pub struct QueryCache {
    shared: Arc<CacheShared>,
}

impl QueryCache {
    /// Create a cache with the default poll interval.
    pub fn new(fetcher: Arc<dyn QueryFetcher>) -> Self {
        Self::with_poll_interval(fetcher, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(fetcher: Arc<dyn QueryFetcher>, poll_interval: Duration) -> Self {
        Self {
            shared: Arc::new(CacheShared {
                fetcher,
                entries: DashMap::new(),
                poll_interval,
            }),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.shared.poll_interval
    }

    /// Register interest in `key`.
    ///
    /// Fetches right away when the entry has no data or is stale, and keeps
    /// the key polling until the last subscription for it is dropped.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        let (receiver, needs_fetch) = {
            let mut entry = self.shared.entry_mut(key);
            entry.subscribers += 1;
            if entry.poller.is_none() {
                entry.poller = Some(self.shared.spawn_poller(key));
            }
            let needs_fetch = entry.in_flight.is_none() && (!entry.has_data() || entry.stale);
            (entry.snapshot.subscribe(), needs_fetch)
        };

        if needs_fetch {
            let _ = self.shared.start_fetch(key);
        }

        Subscription::new(key, receiver, Arc::clone(&self.shared))
    }

    /// Current value for `key`.
    ///
    /// Fresh data is returned without a network call. Otherwise this joins
    /// the in-flight fetch or starts one.
    pub async fn query(&self, key: QueryKey) -> Result<Arc<QueryData>, FetchFailure> {
        {
            let entry = self.shared.entry_mut(key);
            if !entry.stale {
                if let Some(data) = entry.snapshot.borrow().data.clone() {
                    return Ok(data);
                }
            }
        }
        self.shared.start_fetch(key).await
    }

    /// Fetch `key` now, sharing any fetch already in flight.
    pub async fn refresh(&self, key: QueryKey) -> Result<Arc<QueryData>, FetchFailure> {
        self.shared.start_fetch(key).await
    }

    /// Read the entry without side effects.
    pub fn snapshot(&self, key: QueryKey) -> QuerySnapshot {
        self.shared
            .entries
            .get(&key)
            .map(|entry| entry.snapshot.borrow().clone())
            .unwrap_or_default()
    }

    /// Mark `key` stale.
    ///
    /// Subscribed keys refetch in the background right away; others wait for
    /// the next read.
    pub fn invalidate(&self, key: QueryKey) {
        self.shared.invalidate(key);
    }

    pub fn invalidate_all(&self) {
        for key in QueryKey::ALL {
            self.shared.invalidate(key);
        }
    }

    /// Number of live subscriptions for `key`.
    pub fn subscriber_count(&self, key: QueryKey) -> usize {
        self.shared
            .entries
            .get(&key)
            .map(|entry| entry.subscribers)
            .unwrap_or(0)
    }

    /// Whether `key` currently has a poll task.
    pub fn is_polling(&self, key: QueryKey) -> bool {
        self.shared
            .entries
            .get(&key)
            .map(|entry| entry.poller.is_some())
            .unwrap_or(false)
    }
}

impl Invalidator for QueryCache {
    fn invalidate(&self, key: QueryKey) {
        QueryCache::invalidate(self, key);
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.shared.entries.len())
            .field("poll_interval", &self.shared.poll_interval)
            .finish()
    }
}
