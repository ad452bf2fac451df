//! Plain-text rendering of inbox data for the terminal.
//!
//! Functions here build strings; printing is left to the command handlers.

use chrono::{DateTime, Local, Utc};

use crate::cache::{QueryKey, QuerySnapshot};
use crate::listener::ConnectionState;
use crate::models::{badge_label, MessageRecord, Record, ResourceKind, Stats};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Title followed by a heavy rule.
///
/// ```text
/// EMAILS (3)
/// ════════════════════════════════════════════════════════════
/// ```
pub fn header(title: &str) -> String {
    format!("{}\n{}", title, "═".repeat(LINE_WIDTH))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Counts table with badge labels.
pub fn stats_table(stats: &Stats) -> String {
    let mut lines = vec![header("INBOX")];
    for kind in ResourceKind::ALL {
        let count = stats.count(kind);
        let badge = badge_label(count);
        lines.push(format!(
            "  {:<6} {:>5}  {}",
            kind.label(),
            count,
            if badge.is_empty() { String::new() } else { format!("[{}]", badge) }
        ));
    }
    lines.push(format!("  {:<6} {:>5}", "Total", stats.total));
    lines.join("\n")
}

/// One list line: time, id, preview.
pub fn record_line(record: &Record) -> String {
    format!(
        "  {}  {:<12}  {}",
        timestamp(record.created_at()),
        record.id(),
        record.preview()
    )
}

pub fn record_list(kind: ResourceKind, records: &[Record]) -> String {
    let title = format!("{} ({})", kind.label().to_uppercase(), records.len());
    let mut lines = vec![header(&title)];
    if records.is_empty() {
        lines.push("  (empty)".to_string());
    }
    lines.extend(records.iter().map(record_line));
    lines.join("\n")
}

/// Every field of one record.
pub fn record_detail(record: &Record) -> String {
    let mut lines = vec![
        header(&format!("{} {}", record.kind().label().to_uppercase(), record.id())),
        format!("Received: {}", timestamp(record.created_at())),
    ];

    match record {
        Record::Email(stored) => {
            let email = &stored.email;
            if email.from_name.is_empty() {
                lines.push(format!("From:     {}", email.from));
            } else {
                lines.push(format!("From:     {} <{}>", email.from_name, email.from));
            }
            lines.push(format!("To:       {}", email.to.join(", ")));
            if !email.cc.is_empty() {
                lines.push(format!("Cc:       {}", email.cc.join(", ")));
            }
            if let Some(reply_to) = &email.reply_to {
                lines.push(format!("Reply-To: {}", reply_to));
            }
            lines.push(format!("Subject:  {}", email.subject));
            for attachment in &email.attachments {
                lines.push(format!(
                    "Attached: {} ({})",
                    attachment.filename, attachment.content_type
                ));
            }
            lines.push(String::new());
            lines.push(email.body_text().trim().to_string());
        }
        Record::Sms(stored) => {
            lines.push(format!("From:     {}", stored.sms.from));
            lines.push(format!("To:       {}", stored.sms.to.join(", ")));
            lines.push(String::new());
            lines.push(stored.sms.message.clone());
        }
        Record::Push(stored) => {
            let push = &stored.push;
            lines.push(format!("Devices:  {}", push.device_tokens.len()));
            if let Some(badge) = push.badge {
                lines.push(format!("Badge:    {}", badge));
            }
            lines.push(format!("Title:    {}", push.title));
            lines.push(String::new());
            lines.push(push.body.clone());
        }
        Record::Chat(stored) => {
            let chat = &stored.chat;
            lines.push(format!("From:     {}", chat.from));
            lines.push(format!("To:       {}", chat.to.join(", ")));
            if let Some(platform) = &chat.platform {
                lines.push(format!("Platform: {}", platform));
            }
            if let Some(media) = &chat.media_url {
                lines.push(format!("Media:    {}", media));
            }
            lines.push(String::new());
            lines.push(chat.message.clone());
            for button in &chat.buttons {
                lines.push(format!("  [{}]", button.text));
            }
        }
    }

    lines.join("\n")
}

/// One status line for watch mode.
pub fn snapshot_line(key: QueryKey, snapshot: &QuerySnapshot) -> String {
    let body = match (&snapshot.data, snapshot.is_loading()) {
        (_, true) => "loading...".to_string(),
        (None, false) => "no data".to_string(),
        (Some(_), false) => match (snapshot.stats(), snapshot.records()) {
            (Some(stats), _) => format!(
                "{} total (email {}, sms {}, push {}, chat {})",
                stats.total, stats.emails, stats.sms, stats.push, stats.chat
            ),
            (None, Some(records)) => match records.first() {
                Some(latest) => format!("{} records, latest: {}", records.len(), latest.preview()),
                None => "0 records".to_string(),
            },
            (None, None) => "no data".to_string(),
        },
    };

    match &snapshot.error {
        Some(err) => format!("[{:<6}] {} (error: {})", key, body, err.user_message()),
        None => format!("[{:<6}] {}", key, body),
    }
}

pub fn connection_line(state: ConnectionState) -> String {
    format!("[events] {}", state)
}
