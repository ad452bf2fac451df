//! SSE (Server-Sent Events) stream parser
//!
//! Parses the gateway's `/events` stream. The format consists of:
//! - `event: <type>` - event type line
//! - `data: <payload>` - data payload line (may repeat)
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! The gateway sends a `connected` event on open and a `message` event per
//! change, whose data is a JSON envelope decoded by [`crate::events`].

mod frame;
mod parser;

pub use frame::{SseFrame, SseLine, DEFAULT_EVENT_TYPE};
pub use parser::{parse_sse_line, SseParser};
