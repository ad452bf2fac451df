//! The four message kinds captured by the gateway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A kind of captured message.
///
/// Each kind maps to one REST collection and one cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Email,
    Sms,
    Push,
    Chat,
}

impl ResourceKind {
    /// All kinds, in event-routing priority order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Email,
        ResourceKind::Sms,
        ResourceKind::Push,
        ResourceKind::Chat,
    ];

    /// Singular name, as it appears in event types (`email_received`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Email => "email",
            ResourceKind::Sms => "sms",
            ResourceKind::Push => "push",
            ResourceKind::Chat => "chat",
        }
    }

    /// REST collection path segment (`/emails`, `/sms`, ...).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Email => "emails",
            ResourceKind::Sms => "sms",
            ResourceKind::Push => "push",
            ResourceKind::Chat => "chat",
        }
    }

    /// Human-readable label for terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Email => "Email",
            ResourceKind::Sms => "SMS",
            ResourceKind::Push => "Push",
            ResourceKind::Chat => "Chat",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown message kind '{}' (expected email, sms, push or chat)",
            self.0
        )
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for ResourceKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "emails" => Ok(ResourceKind::Email),
            "sms" => Ok(ResourceKind::Sms),
            "push" | "pushes" => Ok(ResourceKind::Push),
            "chat" | "chats" => Ok(ResourceKind::Chat),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}
