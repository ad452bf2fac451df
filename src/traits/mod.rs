//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, DELETE, streaming GET)
//! - [`EventConnector`] - Opens event stream connections
//! - [`QueryFetcher`] - Loads query data for the cache
//! - [`Invalidator`] - Marks cached queries stale

pub mod events;
pub mod http;
pub mod query;

pub use events::{EventConnector, FrameStream};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use query::{Invalidator, QueryFetcher};
