//! Captured message records.
//!
//! The gateway stores each message as `{id, created_at, <kind>: payload}`.
//! The payload field name differs per kind, so each kind gets its own
//! `Stored*` wrapper and [`Record`] unifies them.

use std::collections::HashMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_utils::{preview_text, strip_html_tags};
use super::{deserialize_id, deserialize_null_default, ResourceKind};

/// Fields shared by every captured record.
pub trait MessageRecord {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    /// One-line summary for list views.
    fn preview(&self) -> String;
}

/// Email attachment. `data` is the base64 encoding used by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Attachment {
    /// Decode the attachment body.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub to: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub cc: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub bcc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub headers: HashMap<String, String>,
}

impl Email {
    /// Sender as shown in lists: the display name when present.
    pub fn sender(&self) -> &str {
        if self.from_name.is_empty() {
            &self.from
        } else {
            &self.from_name
        }
    }

    /// Readable body text, preferring the plain-text part.
    pub fn body_text(&self) -> String {
        match &self.plain_text {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => strip_html_tags(&self.html),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sms {
    #[serde(default)]
    pub from: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub to: Vec<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub device_tokens: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub data: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatButton {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub from: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub to: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub template_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub buttons: Vec<ChatButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEmail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub email: Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSms {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub sms: Sms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPush {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub push: PushNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChat {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub chat: ChatMessage,
}

impl MessageRecord for StoredEmail {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn preview(&self) -> String {
        let subject = if self.email.subject.is_empty() {
            "(no subject)"
        } else {
            &self.email.subject
        };
        preview_text(&format!("{} - {}", self.email.sender(), subject))
    }
}

impl MessageRecord for StoredSms {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn preview(&self) -> String {
        preview_text(&format!("{}: {}", self.sms.from, self.sms.message))
    }
}

impl MessageRecord for StoredPush {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn preview(&self) -> String {
        preview_text(&format!("{}: {}", self.push.title, self.push.body))
    }
}

impl MessageRecord for StoredChat {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn preview(&self) -> String {
        preview_text(&format!("{}: {}", self.chat.from, self.chat.message))
    }
}

/// A captured record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Email(StoredEmail),
    Sms(StoredSms),
    Push(StoredPush),
    Chat(StoredChat),
}

impl Record {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Record::Email(_) => ResourceKind::Email,
            Record::Sms(_) => ResourceKind::Sms,
            Record::Push(_) => ResourceKind::Push,
            Record::Chat(_) => ResourceKind::Chat,
        }
    }

    fn inner(&self) -> &dyn MessageRecord {
        match self {
            Record::Email(r) => r,
            Record::Sms(r) => r,
            Record::Push(r) => r,
            Record::Chat(r) => r,
        }
    }

    /// Parse a `GET /{kind}` body into records of that kind.
    pub fn parse_list(kind: ResourceKind, body: &[u8]) -> Result<Vec<Record>, serde_json::Error> {
        let records = match kind {
            ResourceKind::Email => parse_nullable_list::<StoredEmail>(body)?
                .into_iter()
                .map(Record::Email)
                .collect(),
            ResourceKind::Sms => parse_nullable_list::<StoredSms>(body)?
                .into_iter()
                .map(Record::Sms)
                .collect(),
            ResourceKind::Push => parse_nullable_list::<StoredPush>(body)?
                .into_iter()
                .map(Record::Push)
                .collect(),
            ResourceKind::Chat => parse_nullable_list::<StoredChat>(body)?
                .into_iter()
                .map(Record::Chat)
                .collect(),
        };
        Ok(records)
    }

    /// Parse a `GET /{kind}/{id}` body.
    pub fn parse_one(kind: ResourceKind, body: &[u8]) -> Result<Record, serde_json::Error> {
        Ok(match kind {
            ResourceKind::Email => Record::Email(serde_json::from_slice(body)?),
            ResourceKind::Sms => Record::Sms(serde_json::from_slice(body)?),
            ResourceKind::Push => Record::Push(serde_json::from_slice(body)?),
            ResourceKind::Chat => Record::Chat(serde_json::from_slice(body)?),
        })
    }
}

impl MessageRecord for Record {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.inner().created_at()
    }

    fn preview(&self) -> String {
        self.inner().preview()
    }
}

// The gateway serializes an empty store as `null` rather than `[]`.
fn parse_nullable_list<T: serde::de::DeserializeOwned>(
    body: &[u8],
) -> Result<Vec<T>, serde_json::Error> {
    Ok(serde_json::from_slice::<Option<Vec<T>>>(body)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAILS: &str = r#"[{
        "id": "e1",
        "created_at": "2024-05-01T10:00:00Z",
        "email": {
            "from": "noreply@example.com",
            "from_name": "Example",
            "to": ["dev@example.com"],
            "subject": "Welcome",
            "html": "<p>Hello <b>there</b></p>",
            "attachments": [{"filename": "a.txt", "content_type": "text/plain", "data": "aGk="}]
        }
    }]"#;

    #[test]
    fn test_parse_email_list() {
        let records = Record::parse_list(ResourceKind::Email, EMAILS.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), ResourceKind::Email);
        assert_eq!(records[0].id(), "e1");
        assert_eq!(records[0].preview(), "Example - Welcome");

        match &records[0] {
            Record::Email(stored) => {
                assert_eq!(stored.email.to, vec!["dev@example.com".to_string()]);
                assert!(stored.email.cc.is_empty());
                assert_eq!(stored.email.attachments[0].decode().unwrap(), b"hi");
                assert_eq!(stored.email.body_text().split_whitespace().collect::<Vec<_>>(), vec!["Hello", "there"]);
            }
            other => panic!("Expected email record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_null_list_is_empty() {
        let records = Record::parse_list(ResourceKind::Sms, b"null").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_sms_with_null_recipients() {
        let body = r#"[{"id": 7, "created_at": "2024-05-01T10:00:00+02:00",
            "sms": {"from": "+100", "to": null, "message": "Code 1234"}}]"#;
        let records = Record::parse_list(ResourceKind::Sms, body.as_bytes()).unwrap();
        assert_eq!(records[0].id(), "7");
        assert_eq!(records[0].preview(), "+100: Code 1234");
        assert_eq!(
            records[0].created_at(),
            "2024-05-01T08:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_parse_push_and_chat() {
        let push = r#"{"id": "p1", "created_at": "2024-05-01T10:00:00Z",
            "push": {"device_tokens": ["tok"], "title": "Hi", "body": "There", "badge": 3}}"#;
        let record = Record::parse_one(ResourceKind::Push, push.as_bytes()).unwrap();
        assert_eq!(record.preview(), "Hi: There");

        let chat = r#"{"id": "c1", "created_at": "2024-05-01T10:00:00Z",
            "chat": {"from": "bot", "to": ["u"], "message": "Pick one",
                     "buttons": [{"id": "b1", "text": "Yes"}]}}"#;
        match Record::parse_one(ResourceKind::Chat, chat.as_bytes()).unwrap() {
            Record::Chat(stored) => {
                assert_eq!(stored.chat.buttons.len(), 1);
                assert!(stored.chat.metadata.is_empty());
            }
            other => panic!("Expected chat record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrong_shape_fails() {
        assert!(Record::parse_list(ResourceKind::Chat, br#"{"not": "a list"}"#).is_err());
    }

    #[test]
    fn test_email_without_subject_preview() {
        let body = r#"{"id": "e2", "created_at": "2024-05-01T10:00:00Z",
            "email": {"from": "a@b.c", "to": [], "subject": ""}}"#;
        let record = Record::parse_one(ResourceKind::Email, body.as_bytes()).unwrap();
        assert_eq!(record.preview(), "a@b.c - (no subject)");
    }
}
