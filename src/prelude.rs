//! Prelude module for convenient imports.
//!
//! ```ignore
//! use devbox::prelude::*;
//! ```

// Facade and configuration
pub use crate::config::DevboxConfig;
pub use crate::inbox::Inbox;

// Components
pub use crate::cache::{QueryCache, QueryData, QueryKey, QuerySnapshot, Subscription};
pub use crate::client::InboxClient;
pub use crate::listener::{ConnectionState, EventListener, ReconnectPolicy};
pub use crate::mutation::MutationCoordinator;

// Model types
pub use crate::models::{MessageRecord, Record, ResourceKind, Stats};

// Errors
pub use crate::error::{DevboxError, DevboxResult, FetchFailure, StreamError};
