//! Result type alias for DevBox operations.

use super::devbox_error::DevboxError;

/// Type alias for Results using [`DevboxError`].
pub type DevboxResult<T> = Result<T, DevboxError>;
