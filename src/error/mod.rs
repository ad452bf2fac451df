//! Error handling for the DevBox client.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Domain-specific Errors**: [`FetchFailure`] for REST calls,
//!   [`StreamError`] for the event stream
//! - **Unified Error Type**: [`DevboxError`] consolidates them for the CLI
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection refused, reset, timeout | Yes |
//! | Server | Gateway errors (5xx) | Yes |
//! | Client | Undecodable responses | No |
//! | User | Unknown id, invalid input | No |
//! | Configuration | Bad environment | No |

mod category;
mod devbox_error;
mod fetch;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use devbox_error::DevboxError;
pub use fetch::FetchFailure;
pub use result::DevboxResult;
pub use stream::StreamError;
