//! Common fixtures for integration tests.
//!
//! Builds gateway-shaped JSON bodies and an [`Inbox`] pointed at a wiremock
//! server.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! mount_json(&server, "GET", "/api/v1/stats", stats_json(1, 0, 0, 0)).await;
//! let inbox = inbox_for(&server);
//! ```

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devbox::config::DevboxConfig;
use devbox::inbox::Inbox;

pub const CREATED_AT: &str = "2024-05-01T10:00:00Z";

/// API base for `server`.
pub fn api_base(server: &MockServer) -> String {
    format!("{}/api/v1", server.uri())
}

/// Inbox using reqwest against `server`.
pub fn inbox_for(server: &MockServer) -> Inbox {
    Inbox::new(DevboxConfig::default().with_base_url(api_base(server)))
}

/// `GET /stats` body with a consistent total.
pub fn stats_json(emails: usize, sms: usize, push: usize, chat: usize) -> Value {
    json!({
        "emails": emails,
        "sms": sms,
        "push": push,
        "chat": chat,
        "total": emails + sms + push + chat,
    })
}

pub fn email_json(id: &str, subject: &str) -> Value {
    json!({
        "id": id,
        "created_at": CREATED_AT,
        "email": {
            "from": "noreply@shop.test",
            "from_name": "Shop",
            "to": ["alice@example.test"],
            "subject": subject,
            "html": "<p>Hello</p>",
            "attachments": null,
        }
    })
}

pub fn sms_json(id: &str, message: &str) -> Value {
    json!({
        "id": id,
        "created_at": CREATED_AT,
        "sms": {"from": "+15550001", "to": ["+15550002"], "message": message}
    })
}

pub fn push_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "created_at": CREATED_AT,
        "push": {"device_tokens": ["tok-1"], "title": title, "body": "Tap to open"}
    })
}

pub fn chat_json(id: &str, message: &str) -> Value {
    json!({
        "id": id,
        "created_at": CREATED_AT,
        "chat": {"from": "+15550003", "to": ["+15550004"], "message": message, "platform": "whatsapp"}
    })
}

/// Respond to `verb route` with `status` and a JSON body.
pub async fn mount_status(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Respond to `verb route` with 200 and a JSON body.
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
    mount_status(server, verb, route, 200, body).await;
}
