use std::sync::Arc;

use tokio::time::Instant;

use crate::error::FetchFailure;
use crate::models::{Record, Stats};

/// A fetched query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Stats(Stats),
    Records(Vec<Record>),
}

impl QueryData {
    pub fn as_stats(&self) -> Option<&Stats> {
        match self {
            QueryData::Stats(stats) => Some(stats),
            QueryData::Records(_) => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            QueryData::Records(records) => Some(records),
            QueryData::Stats(_) => None,
        }
    }
}

/// Point-in-time view of one cache entry.
///
/// Cloning is cheap: the data is shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct QuerySnapshot {
    /// Last successfully fetched value.
    pub data: Option<Arc<QueryData>>,
    /// When `data` was fetched.
    pub last_fetched_at: Option<Instant>,
    pub is_fetching: bool,
    /// Error from the most recent fetch, cleared by the next success.
    pub error: Option<FetchFailure>,
    /// Invalidated since the last successful fetch.
    pub is_stale: bool,
}

impl QuerySnapshot {
    /// No data yet and a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_fetching
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.data.as_deref().and_then(QueryData::as_stats)
    }

    pub fn records(&self) -> Option<&[Record]> {
        self.data.as_deref().and_then(QueryData::as_records)
    }
}
