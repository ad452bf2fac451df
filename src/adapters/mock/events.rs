//! Scripted event stream connector for testing the listener.

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::error::StreamError;
use crate::sse::SseFrame;
use crate::traits::{EventConnector, FrameStream};

/// One scripted `connect()` outcome.
#[derive(Debug)]
pub enum MockConnection {
    /// `connect()` fails.
    Fail(StreamError),
    /// Deliver these items, then end the stream (or stay open).
    Frames {
        items: Vec<Result<SseFrame, StreamError>>,
        hold_open: bool,
    },
    /// Deliver whatever the test sends; ends when the sender is dropped.
    Live(mpsc::UnboundedReceiver<Result<SseFrame, StreamError>>),
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

/// Event connector that plays back scripted connections.
///
/// Once the script runs out, every further `connect()` yields an idle
/// connection that stays open. The connector tracks how many connections are
/// alive at once so tests can check that reconnects never leak one.
#[derive(Debug, Clone, Default)]
pub struct MockEventConnector {
    script: Arc<Mutex<VecDeque<MockConnection>>>,
    counters: Arc<Counters>,
}

impl MockEventConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, connection: MockConnection) {
        self.script.lock().unwrap().push_back(connection);
    }

    pub fn push_failure(&self, error: StreamError) {
        self.push(MockConnection::Fail(error));
    }

    /// Script a connection delivering `frames`.
    pub fn push_frames(&self, frames: Vec<SseFrame>, hold_open: bool) {
        self.push(MockConnection::Frames {
            items: frames.into_iter().map(Ok).collect(),
            hold_open,
        });
    }

    /// Script a connection fed by the returned sender.
    pub fn push_live(&self) -> mpsc::UnboundedSender<Result<SseFrame, StreamError>> {
        let (tx, rx) = mpsc::unbounded();
        self.push(MockConnection::Live(rx));
        tx
    }

    /// Total `connect()` calls so far.
    pub fn connect_count(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    /// Connections handed out and not yet dropped.
    pub fn live_connections(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously live connections seen.
    pub fn max_live_connections(&self) -> usize {
        self.counters.max_live.load(Ordering::SeqCst)
    }

    fn track(&self, inner: FrameStream) -> FrameStream {
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
        Box::pin(TrackedStream {
            inner,
            counters: Arc::clone(&self.counters),
        })
    }
}

#[async_trait]
impl EventConnector for MockEventConnector {
    async fn connect(&self) -> Result<FrameStream, StreamError> {
        use futures::StreamExt;

        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();

        let stream: FrameStream = match next {
            Some(MockConnection::Fail(err)) => return Err(err),
            Some(MockConnection::Frames { items, hold_open }) => {
                let frames = futures::stream::iter(items);
                if hold_open {
                    Box::pin(frames.chain(futures::stream::pending()))
                } else {
                    Box::pin(frames)
                }
            }
            Some(MockConnection::Live(rx)) => Box::pin(rx),
            None => Box::pin(futures::stream::pending()),
        };

        Ok(self.track(stream))
    }
}

/// Decrements the live counter when the connection is dropped.
struct TrackedStream {
    inner: FrameStream,
    counters: Arc<Counters>,
}

impl Stream for TrackedStream {
    type Item = Result<SseFrame, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}
