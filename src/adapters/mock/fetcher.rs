//! Programmable query fetcher for cache tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{QueryData, QueryKey};
use crate::error::FetchFailure;
use crate::models::Stats;
use crate::traits::QueryFetcher;

#[derive(Debug, Default)]
struct FetcherState {
    results: HashMap<QueryKey, Result<QueryData, FetchFailure>>,
    calls: HashMap<QueryKey, usize>,
    latency: Duration,
}

/// Fetcher returning whatever the test last configured for a key.
///
/// Each fetch sleeps for the configured latency on the tokio clock first,
/// which lets paused-time tests act while a fetch is in flight. The result
/// is read after the sleep, so changing it mid-flight changes what the
/// in-flight fetch returns.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<FetcherState>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        let fetcher = Self::new();
        fetcher.state.lock().unwrap().latency = latency;
        fetcher
    }

    pub fn set_result(&self, key: QueryKey, result: Result<QueryData, FetchFailure>) {
        self.state.lock().unwrap().results.insert(key, result);
    }

    pub fn set_stats(&self, stats: Stats) {
        self.set_result(QueryKey::Stats, Ok(QueryData::Stats(stats)));
    }

    pub fn set_failure(&self, key: QueryKey, status: u16) {
        self.set_result(key, Err(FetchFailure::status(key.as_str(), status, "")));
    }

    /// Number of fetches started for `key`.
    pub fn calls(&self, key: QueryKey) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&key)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl QueryFetcher for MockFetcher {
    async fn fetch(&self, key: QueryKey) -> Result<QueryData, FetchFailure> {
        let latency = {
            let mut state = self.state.lock().unwrap();
            *state.calls.entry(key).or_default() += 1;
            state.latency
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let state = self.state.lock().unwrap();
        match state.results.get(&key) {
            Some(result) => result.clone(),
            None if key == QueryKey::Stats => Ok(QueryData::Stats(Stats::default())),
            None => Ok(QueryData::Records(Vec::new())),
        }
    }
}
