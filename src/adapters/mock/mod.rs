//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses per route
//! - [`MockEventConnector`] - Event stream with scripted connections
//! - [`MockFetcher`] - Query fetcher with programmable results and latency
//! - [`RecordingInvalidator`] - Records invalidated cache keys

pub mod events;
pub mod fetcher;
pub mod http;
pub mod invalidator;

pub use events::{MockConnection, MockEventConnector};
pub use fetcher::MockFetcher;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use invalidator::RecordingInvalidator;
