//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`HttpEventConnector`] - SSE connector over any [`HttpClient`](crate::traits::HttpClient)
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses
//! - [`mock::MockEventConnector`] - Scripted event stream connections
//! - [`mock::MockFetcher`] - Programmable query fetcher
//! - [`mock::RecordingInvalidator`] - Records invalidations

pub mod http_events;
pub mod mock;
pub mod reqwest_http;

pub use http_events::{frames_from_bytes, HttpEventConnector};
pub use mock::{MockEventConnector, MockFetcher, MockHttpClient, RecordingInvalidator};
pub use reqwest_http::ReqwestHttpClient;
