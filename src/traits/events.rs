//! Event stream connection trait.
//!
//! The listener never touches HTTP directly. It asks an [`EventConnector`]
//! for a fresh stream of parsed SSE frames on every (re)connect, which lets
//! tests script connections that deliver frames, hang, or drop.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::StreamError;
use crate::sse::SseFrame;

/// A live event connection. Dropping it closes the connection.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<SseFrame, StreamError>> + Send>>;

/// Opens event stream connections.
#[async_trait]
pub trait EventConnector: Send + Sync {
    /// Open a new connection.
    ///
    /// Resolves once the server has accepted the stream. Frames are then
    /// read from the returned stream until it ends or yields an error.
    async fn connect(&self) -> Result<FrameStream, StreamError>;
}
