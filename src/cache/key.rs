use std::fmt;

use crate::models::ResourceKind;

/// Identifies one cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Stats,
    Emails,
    Sms,
    Push,
    Chat,
}

impl QueryKey {
    /// Every key the cache knows about.
    pub const ALL: [QueryKey; 5] = [
        QueryKey::Stats,
        QueryKey::Emails,
        QueryKey::Sms,
        QueryKey::Push,
        QueryKey::Chat,
    ];

    /// The record collection behind this key, if any.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            QueryKey::Stats => None,
            QueryKey::Emails => Some(ResourceKind::Email),
            QueryKey::Sms => Some(ResourceKind::Sms),
            QueryKey::Push => Some(ResourceKind::Push),
            QueryKey::Chat => Some(ResourceKind::Chat),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Stats => "stats",
            QueryKey::Emails => "emails",
            QueryKey::Sms => "sms",
            QueryKey::Push => "push",
            QueryKey::Chat => "chat",
        }
    }
}

impl From<ResourceKind> for QueryKey {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Email => QueryKey::Emails,
            ResourceKind::Sms => QueryKey::Sms,
            ResourceKind::Push => QueryKey::Push,
            ResourceKind::Chat => QueryKey::Chat,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
