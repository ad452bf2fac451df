//! Typed payloads of the DevBox REST API.
//!
//! Every record returned by the gateway is an immutable snapshot: the client
//! deserializes it once and never mutates it afterwards.

mod kind;
mod record;
mod stats;
mod text_utils;

pub use kind::{ParseKindError, ResourceKind};
pub use record::{
    Attachment, ChatButton, ChatMessage, Email, MessageRecord, PushNotification, Record, Sms,
    StoredChat, StoredEmail, StoredPush, StoredSms,
};
pub use stats::{badge_label, Stats, BADGE_MAX_COUNT};
pub use text_utils::{collapse_whitespace, preview_text, strip_html_tags, PREVIEW_TEXT_LENGTH};

use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Helper to deserialize a nullable field as its default value.
///
/// The gateway encodes empty lists and maps as `null`, so every collection
/// field goes through this.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[derive(Debug, Deserialize)]
    struct ListHolder {
        #[serde(default, deserialize_with = "deserialize_null_default")]
        items: Vec<String>,
    }

    #[test]
    fn test_deserialize_id_from_string() {
        let holder: IdHolder = serde_json::from_str(r#"{"id": "abc-1"}"#).unwrap();
        assert_eq!(holder.id, "abc-1");
    }

    #[test]
    fn test_deserialize_id_from_integer() {
        let holder: IdHolder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(holder.id, "42");
    }

    #[test]
    fn test_null_list_becomes_empty() {
        let holder: ListHolder = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(holder.items.is_empty());
    }

    #[test]
    fn test_missing_list_becomes_empty() {
        let holder: ListHolder = serde_json::from_str("{}").unwrap();
        assert!(holder.items.is_empty());
    }
}
