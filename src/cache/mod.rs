//! Query cache for the five gateway resources.
//!
//! - [`QueryKey`] names a cached query (stats or one record collection)
//! - [`QuerySnapshot`] is what readers see: data, loading, error, staleness
//! - [`QueryCache`] owns the entries, polls subscribed keys, coalesces
//!   concurrent fetches and handles invalidation
//! - [`Subscription`] keeps a key polled and notifies on change

mod key;
mod query_cache;
mod snapshot;
mod subscription;

pub use key::QueryKey;
pub use query_cache::{QueryCache, DEFAULT_POLL_INTERVAL};
pub use snapshot::{QueryData, QuerySnapshot};
pub use subscription::Subscription;
