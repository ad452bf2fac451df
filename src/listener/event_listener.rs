//! Long-lived SSE listener that turns change notifications into cache
//! invalidations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::state::{ConnectionState, ReconnectPolicy};
use crate::error::StreamError;
use crate::events::InboxEvent;
use crate::sse::SseFrame;
use crate::traits::{EventConnector, FrameStream, Invalidator};

/// Handle to a running event listener.
///
/// The connection runs on a background task that reconnects on its own.
/// Dropping the handle stops the task; [`EventListener::close`] also waits
/// for it to finish.
pub struct EventListener {
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    events_processed: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl EventListener {
    /// Start listening. Must be called from within a tokio runtime.
    pub fn spawn(
        connector: Arc<dyn EventConnector>,
        invalidator: Arc<dyn Invalidator>,
        policy: ReconnectPolicy,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let cancel = CancellationToken::new();
        let events_processed = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(run_listener(
            connector,
            invalidator,
            policy,
            state_tx,
            cancel.clone(),
            Arc::clone(&events_processed),
        ));

        Self {
            state_rx,
            cancel,
            events_processed,
            task: Some(task),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to connection state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Number of well-formed `message` events handled so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed.load(Ordering::SeqCst)
    }

    /// Stop listening and wait for the connection to be dropped.
    pub async fn close(mut self) {
        info!("Closing event listener");
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("state", &self.state())
            .field("events_processed", &self.events_processed())
            .finish()
    }
}

/// Connect, read, back off, repeat until cancelled.
async fn run_listener(
    connector: Arc<dyn EventConnector>,
    invalidator: Arc<dyn Invalidator>,
    policy: ReconnectPolicy,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    events_processed: Arc<AtomicU64>,
) {
    let mut attempt: u32 = 0;

    loop {
        state_tx.send_replace(ConnectionState::Connecting);

        let connected = tokio::select! {
            _ = cancel.cancelled() => break,
            result = connector.connect() => result,
        };

        match connected {
            Ok(mut stream) => {
                attempt = 0;
                state_tx.send_replace(ConnectionState::Open);
                info!("Event stream open");

                let outcome = tokio::select! {
                    _ = cancel.cancelled() => break,
                    outcome = read_frames(&mut stream, invalidator.as_ref(), &events_processed) => outcome,
                };
                // Release the connection before any reconnect attempt
                drop(stream);

                match outcome {
                    Ok(()) => {
                        info!("Event stream closed by server");
                        state_tx.send_replace(ConnectionState::Closed);
                    }
                    Err(err) => {
                        warn!(code = err.error_code(), "Event stream failed: {}", err);
                        state_tx.send_replace(ConnectionState::Error);
                    }
                }
            }
            Err(err) => {
                warn!(code = err.error_code(), "Event stream connect failed: {}", err);
                state_tx.send_replace(ConnectionState::Error);
            }
        }

        attempt = attempt.saturating_add(1);
        let delay = policy.delay(attempt);
        debug!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting event stream");

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!("Event listener terminated");
    state_tx.send_replace(ConnectionState::Terminated);
}

/// Read until the server ends the stream (`Ok`) or it fails.
async fn read_frames(
    stream: &mut FrameStream,
    invalidator: &dyn Invalidator,
    events_processed: &AtomicU64,
) -> Result<(), StreamError> {
    while let Some(frame) = stream.next().await {
        let frame = frame?;
        if handle_frame(&frame, invalidator) {
            events_processed.fetch_add(1, Ordering::SeqCst);
        }
    }
    Ok(())
}

/// Apply one frame. Returns true when it was a well-formed change event.
pub(crate) fn handle_frame(frame: &SseFrame, invalidator: &dyn Invalidator) -> bool {
    match frame.event.as_str() {
        "connected" => {
            info!("Event stream acknowledged: {}", frame.data);
            false
        }
        "message" => match InboxEvent::parse(&frame.data) {
            Some(event) => {
                let keys = event.affected_keys();
                debug!(event_type = %event.event_type, ?keys, "Invalidating from event");
                invalidator.invalidate_many(&keys);
                true
            }
            None => {
                trace!(data = %frame.data, "Discarding malformed event payload");
                false
            }
        },
        other => {
            trace!(event = other, "Ignoring unhandled event type");
            false
        }
    }
}
