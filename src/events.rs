//! Inbound change notifications and their routing to cache keys.
//!
//! Each SSE `message` frame carries a JSON envelope such as
//! `{"type":"email_received","data":{...}}`. Only `type` matters here: it
//! decides which cached queries go stale. The `data` payload is ignored since
//! the cache always refetches from the REST API.

use serde_json::Value;

use crate::cache::QueryKey;
use crate::models::ResourceKind;

/// Event type sent after `DELETE /messages`.
pub const MESSAGES_CLEARED: &str = "messages_cleared";

/// A decoded change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEvent {
    /// The envelope's `type` field
    pub event_type: String,
}

impl InboxEvent {
    /// Decode a `message` frame's data.
    ///
    /// Returns `None` for anything that is not a JSON object with a string
    /// `type` field.
    pub fn parse(data: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(data).ok()?;
        let event_type = value.as_object()?.get("type").and_then(Value::as_str)?;
        Some(Self {
            event_type: event_type.to_string(),
        })
    }

    /// Cache keys this event makes stale.
    pub fn affected_keys(&self) -> Vec<QueryKey> {
        route_event(&self.event_type)
    }
}

/// Map an event type to the cache keys it invalidates.
///
/// `messages_cleared` touches everything. Any other type invalidates the
/// first kind whose name appears in it (checked email, sms, push, chat) plus
/// stats. Types naming no kind still invalidate stats.
pub fn route_event(event_type: &str) -> Vec<QueryKey> {
    if event_type == MESSAGES_CLEARED {
        return QueryKey::ALL.to_vec();
    }

    let mut keys = Vec::with_capacity(2);
    if let Some(kind) = ResourceKind::ALL
        .iter()
        .find(|kind| event_type.contains(kind.as_str()))
    {
        keys.push(QueryKey::from(*kind));
    }
    keys.push(QueryKey::Stats);
    keys
}
