//! Unified error type for the DevBox client.
//!
//! `DevboxError` consolidates the REST, event stream and configuration
//! failures so the CLI can report any of them uniformly.

use std::fmt;

use super::category::ErrorCategory;
use super::fetch::FetchFailure;
use super::stream::StreamError;
use crate::config::ConfigError;

/// Unified error type for the DevBox client.
#[derive(Debug)]
pub enum DevboxError {
    /// A REST call failed.
    Fetch(FetchFailure),

    /// The event stream failed.
    Stream(StreamError),

    /// The configuration could not be loaded.
    Config(ConfigError),
}

impl DevboxError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DevboxError::Fetch(err) => err.category(),
            DevboxError::Stream(StreamError::Rejected { status }) if *status < 500 => {
                ErrorCategory::Client
            }
            DevboxError::Stream(_) => ErrorCategory::Network,
            DevboxError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            DevboxError::Fetch(err) => err.is_retryable(),
            DevboxError::Stream(err) => err.is_retryable(),
            DevboxError::Config(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            DevboxError::Fetch(err) => err.user_message(),
            DevboxError::Stream(err) => err.user_message(),
            DevboxError::Config(err) => format!("Configuration error: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DevboxError::Fetch(err) => err.error_code(),
            DevboxError::Stream(err) => err.error_code(),
            DevboxError::Config(_) => "E_CONFIG",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for DevboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevboxError::Fetch(err) => write!(f, "{}", err),
            DevboxError::Stream(err) => write!(f, "{}", err),
            DevboxError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DevboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DevboxError::Fetch(err) => Some(err),
            DevboxError::Stream(err) => Some(err),
            DevboxError::Config(err) => Some(err),
        }
    }
}

impl From<FetchFailure> for DevboxError {
    fn from(err: FetchFailure) -> Self {
        DevboxError::Fetch(err)
    }
}

impl From<StreamError> for DevboxError {
    fn from(err: StreamError) -> Self {
        DevboxError::Stream(err)
    }
}

impl From<ConfigError> for DevboxError {
    fn from(err: ConfigError) -> Self {
        DevboxError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fetch_conversion_keeps_category() {
        let err: DevboxError = FetchFailure::status("stats", 500, "").into();
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_stream_rejection_is_client_error() {
        let err: DevboxError = StreamError::Rejected { status: 403 }.into();
        assert_eq!(err.category(), ErrorCategory::Client);

        let err: DevboxError = StreamError::ServerClosed.into();
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_config_error() {
        let err: DevboxError = ConfigError::InvalidPollInterval("abc".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "E_CONFIG");
        assert!(err.recovery_hint().contains("DEVBOX_"));
    }
}
