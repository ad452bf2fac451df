//! REST call failures.
//!
//! Every failed read or write against the gateway's REST API becomes a
//! [`FetchFailure`]. The resource client never retries; the caller (query
//! cache or mutation coordinator) decides what to do.

use std::fmt;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// A failed REST call, tagged with the resource it targeted.
///
/// `resource` is the path below the API base, e.g. `"stats"`, `"emails"`,
/// `"sms/abc123"` or `"messages"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The gateway answered with a non-2xx status.
    Status {
        resource: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response (connection refused, reset,
    /// timeout).
    Transport { resource: String, message: String },

    /// The response body did not match the expected shape.
    Decode { resource: String, message: String },

    /// The request was rejected before being sent (e.g. empty id).
    InvalidRequest { resource: String, message: String },
}

impl FetchFailure {
    /// Build a failure from a non-success response.
    pub fn status(resource: impl Into<String>, status: u16, body: &str) -> Self {
        FetchFailure::Status {
            resource: resource.into(),
            status,
            message: error_message_from_body(body),
        }
    }

    /// Convert a transport-level error from the HTTP layer.
    pub fn from_http(resource: impl Into<String>, err: HttpError) -> Self {
        let resource = resource.into();
        match err {
            HttpError::ServerError { status, message } => FetchFailure::Status {
                resource,
                status,
                message,
            },
            HttpError::InvalidUrl(message) => FetchFailure::InvalidRequest { resource, message },
            other => FetchFailure::Transport {
                resource,
                message: other.to_string(),
            },
        }
    }

    pub fn decode(resource: impl Into<String>, err: &serde_json::Error) -> Self {
        FetchFailure::Decode {
            resource: resource.into(),
            message: err.to_string(),
        }
    }

    /// The resource path this failure refers to.
    pub fn resource(&self) -> &str {
        match self {
            FetchFailure::Status { resource, .. }
            | FetchFailure::Transport { resource, .. }
            | FetchFailure::Decode { resource, .. }
            | FetchFailure::InvalidRequest { resource, .. } => resource,
        }
    }

    /// HTTP status, when the gateway answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FetchFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchFailure::Transport { .. } => ErrorCategory::Network,
            FetchFailure::Status { status, .. } if *status >= 500 => ErrorCategory::Server,
            FetchFailure::Status { status: 404, .. } | FetchFailure::InvalidRequest { .. } => {
                ErrorCategory::User
            }
            FetchFailure::Status { .. } | FetchFailure::Decode { .. } => ErrorCategory::Client,
        }
    }

    /// Check if this failure is likely transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchFailure::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            FetchFailure::Transport { .. } => true,
            FetchFailure::Decode { .. } | FetchFailure::InvalidRequest { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            FetchFailure::Status {
                resource, status, ..
            } => match *status {
                404 => format!("'{}' was not found. It may already have been deleted.", resource),
                500..=599 => format!(
                    "The gateway failed while handling '{}' (HTTP {}). Please try again.",
                    resource, status
                ),
                _ => format!("The gateway rejected '{}' (HTTP {}).", resource, status),
            },
            FetchFailure::Transport { resource, .. } => format!(
                "Could not reach the gateway while loading '{}'. Is it running?",
                resource
            ),
            FetchFailure::Decode { resource, .. } => format!(
                "The gateway returned data for '{}' that could not be read.",
                resource
            ),
            FetchFailure::InvalidRequest { resource, message } => {
                format!("Invalid request for '{}': {}", resource, message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchFailure::Status { .. } => "E_FETCH_STATUS",
            FetchFailure::Transport { .. } => "E_FETCH_TRANSPORT",
            FetchFailure::Decode { .. } => "E_FETCH_DECODE",
            FetchFailure::InvalidRequest { .. } => "E_FETCH_INVALID",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status {
                resource,
                status,
                message,
            } => {
                if message.is_empty() {
                    write!(f, "Failed to fetch {}: HTTP {}", resource, status)
                } else {
                    write!(f, "Failed to fetch {}: HTTP {} ({})", resource, status, message)
                }
            }
            FetchFailure::Transport { resource, message } => {
                write!(f, "Failed to fetch {}: {}", resource, message)
            }
            FetchFailure::Decode { resource, message } => {
                write!(f, "Failed to decode {}: {}", resource, message)
            }
            FetchFailure::InvalidRequest { resource, message } => {
                write!(f, "Invalid request for {}: {}", resource, message)
            }
        }
    }
}

impl std::error::Error for FetchFailure {}

/// The gateway answers errors as `{"error": "..."}`; fall back to the raw
/// body otherwise.
fn error_message_from_body(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}
