//! Event stream errors.
//!
//! These describe transport-level problems with the SSE connection. They are
//! logged by the listener and never surfaced to the user: reconnection is
//! automatic.

use std::fmt;

/// SSE connection failure variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The connection could not be established.
    ConnectFailed { url: String, message: String },

    /// The server answered the stream request with a non-2xx status.
    Rejected { status: u16 },

    /// The connection broke while reading.
    ConnectionLost { message: String },

    /// The server ended the stream.
    ServerClosed,
}

impl StreamError {
    /// Whether reconnecting could help.
    ///
    /// Only client-side rejections (4xx other than 408/429) are permanent,
    /// and even those are retried by the listener with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Rejected { status } => *status >= 500 || *status == 408 || *status == 429,
            _ => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectFailed { .. } => {
                "Live updates are unavailable. Retrying in the background.".to_string()
            }
            StreamError::Rejected { status } => {
                format!("The gateway refused the live update stream (HTTP {}).", status)
            }
            StreamError::ConnectionLost { .. } | StreamError::ServerClosed => {
                "Live updates were interrupted. Reconnecting...".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectFailed { .. } => "E_STREAM_CONNECT",
            StreamError::Rejected { .. } => "E_STREAM_REJECTED",
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::ServerClosed => "E_STREAM_CLOSED",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectFailed { url, message } => {
                write!(f, "Failed to open event stream '{}': {}", url, message)
            }
            StreamError::Rejected { status } => {
                write!(f, "Event stream rejected with HTTP {}", status)
            }
            StreamError::ConnectionLost { message } => {
                write!(f, "Event stream connection lost: {}", message)
            }
            StreamError::ServerClosed => write!(f, "Server closed event stream"),
        }
    }
}

impl std::error::Error for StreamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(StreamError::ServerClosed.is_retryable());
        assert!(StreamError::ConnectionLost {
            message: "reset".to_string()
        }
        .is_retryable());
        assert!(StreamError::Rejected { status: 503 }.is_retryable());
        assert!(!StreamError::Rejected { status: 404 }.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = StreamError::ConnectFailed {
            url: "http://localhost/events".to_string(),
            message: "refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open event stream 'http://localhost/events': refused"
        );
        assert_eq!(err.error_code(), "E_STREAM_CONNECT");
    }
}
