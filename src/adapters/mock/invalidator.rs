//! Invalidator that records calls instead of touching a cache.

use std::sync::{Arc, Mutex};

use crate::cache::QueryKey;
use crate::traits::Invalidator;

/// Records every invalidated key, in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvalidator {
    calls: Arc<Mutex<Vec<QueryKey>>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<QueryKey> {
        self.calls.lock().unwrap().clone()
    }

    /// Distinct keys invalidated so far, in `QueryKey::ALL` order.
    pub fn keys(&self) -> Vec<QueryKey> {
        let calls = self.calls.lock().unwrap();
        QueryKey::ALL
            .into_iter()
            .filter(|key| calls.contains(key))
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Invalidator for RecordingInvalidator {
    fn invalidate(&self, key: QueryKey) {
        self.calls.lock().unwrap().push(key);
    }
}
