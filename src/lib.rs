//! DevBox inbox client.
//!
//! Keeps a local view of a development message gateway's captured emails,
//! SMS, push notifications and chat messages consistent with the gateway by
//! combining polling, Server-Sent Events invalidation and refresh after
//! mutations.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod inbox;
pub mod listener;
pub mod models;
pub mod mutation;
pub mod prelude;
pub mod sse;
pub mod traits;
