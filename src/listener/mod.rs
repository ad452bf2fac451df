//! Event stream listener.
//!
//! Keeps one SSE connection to the gateway open, reconnecting with
//! exponential backoff, and invalidates cached queries as change
//! notifications arrive.

mod event_listener;
mod state;

pub use event_listener::EventListener;
pub use state::{ConnectionState, ReconnectPolicy};
