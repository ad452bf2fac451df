//! Event stream connector over an [`HttpClient`].
//!
//! Opens `GET /events` as a byte stream and turns it into [`SseFrame`]s by
//! splitting on newlines and feeding an [`SseParser`].

use async_trait::async_trait;
use bytes::BytesMut;
use futures::stream;
use futures_util::StreamExt;
use std::sync::Arc;

use crate::error::StreamError;
use crate::sse::SseParser;
use crate::traits::{ByteStream, EventConnector, FrameStream, Headers, HttpClient, HttpError};

/// Connects to the gateway's SSE endpoint.
#[derive(Clone)]
pub struct HttpEventConnector {
    http: Arc<dyn HttpClient>,
    url: String,
}

impl HttpEventConnector {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        headers
    }
}

impl std::fmt::Debug for HttpEventConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEventConnector")
            .field("url", &self.url)
            .finish()
    }
}

#[async_trait]
impl EventConnector for HttpEventConnector {
    async fn connect(&self) -> Result<FrameStream, StreamError> {
        let bytes = self
            .http
            .get_stream(&self.url, &Self::headers())
            .await
            .map_err(|err| match err {
                HttpError::ServerError { status, .. } => StreamError::Rejected { status },
                other => StreamError::ConnectFailed {
                    url: self.url.clone(),
                    message: other.to_string(),
                },
            })?;

        Ok(frames_from_bytes(bytes))
    }
}

/// Decode a raw SSE body into frames.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across chunks decode correctly. An event still missing
/// its terminating blank line when the body ends is discarded. A transport
/// error ends the stream after yielding [`StreamError::ConnectionLost`].
pub fn frames_from_bytes(bytes: ByteStream) -> FrameStream {
    let frames = stream::unfold(
        Some((bytes, SseParser::new(), BytesMut::new())),
        |state| async move {
            let (mut bytes, mut parser, mut buffer) = state?;
            loop {
                // First, drain complete lines already buffered
                if let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line = buffer.split_to(newline_pos + 1);
                    let line = String::from_utf8_lossy(&line[..newline_pos]);
                    if let Some(frame) = parser.feed_line(&line) {
                        return Some((Ok(frame), Some((bytes, parser, buffer))));
                    }
                    continue;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(err)) => {
                        let err = StreamError::ConnectionLost {
                            message: err.to_string(),
                        };
                        return Some((Err(err), None));
                    }
                    // A pending event without its blank line is dropped
                    None => return None,
                }
            }
        },
    );

    Box::pin(frames)
}
