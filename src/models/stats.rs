//! Aggregate message counts.

use serde::{Deserialize, Serialize};

use super::ResourceKind;

/// Counts above this are shown as `99+`.
pub const BADGE_MAX_COUNT: usize = 99;

/// Per-kind message counts reported by `GET /stats`.
///
/// `total` is expected to equal the sum of the four counts. The server is
/// the source of truth, so the client reports inconsistencies but never
/// corrects them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub emails: usize,
    #[serde(default)]
    pub sms: usize,
    #[serde(default)]
    pub push: usize,
    #[serde(default)]
    pub chat: usize,
    #[serde(default)]
    pub total: usize,
}

impl Stats {
    /// Count for a single kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Email => self.emails,
            ResourceKind::Sms => self.sms,
            ResourceKind::Push => self.push,
            ResourceKind::Chat => self.chat,
        }
    }

    /// Whether `total` matches the per-kind counts.
    pub fn is_consistent(&self) -> bool {
        self.emails + self.sms + self.push + self.chat == self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Badge text for a count: empty for zero, capped at `99+`.
pub fn badge_label(count: usize) -> String {
    match count {
        0 => String::new(),
        n if n > BADGE_MAX_COUNT => format!("{}+", BADGE_MAX_COUNT),
        n => n.to_string(),
    }
}
