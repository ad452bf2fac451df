//! Seams between the query cache and its collaborators.

use async_trait::async_trait;

use crate::cache::{QueryData, QueryKey};
use crate::error::FetchFailure;

/// Loads the current server value for a query key.
///
/// Implemented by [`InboxClient`](crate::client::InboxClient) in production.
#[async_trait]
pub trait QueryFetcher: Send + Sync {
    async fn fetch(&self, key: QueryKey) -> Result<QueryData, FetchFailure>;
}

/// Marks query keys stale.
///
/// The event listener and mutation coordinator depend on this rather than on
/// the cache itself. Implementations must not block: invalidation is called
/// from the listener's read loop.
pub trait Invalidator: Send + Sync {
    fn invalidate(&self, key: QueryKey);

    fn invalidate_many(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key);
        }
    }
}
