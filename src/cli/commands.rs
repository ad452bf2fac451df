//! Command handlers.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use futures::future::select_all;
use std::collections::HashMap;
use tracing::info;

use super::render;
use crate::cache::{QueryKey, Subscription};
use crate::error::DevboxError;
use crate::inbox::Inbox;
use crate::models::ResourceKind;

pub async fn handle_stats_command(inbox: &Inbox) -> Result<()> {
    let stats = inbox.stats().await.map_err(DevboxError::from)?;
    println!("{}", render::stats_table(&stats));
    Ok(())
}

pub async fn handle_list_command(inbox: &Inbox, kind: ResourceKind) -> Result<()> {
    let records = inbox
        .records(kind)
        .await
        .map_err(DevboxError::from)
        .wrap_err_with(|| format!("Failed to list {}", kind.path_segment()))?;
    println!("{}", render::record_list(kind, &records));
    Ok(())
}

pub async fn handle_show_command(inbox: &Inbox, kind: ResourceKind, id: &str) -> Result<()> {
    let record = inbox.record(kind, id).await.map_err(DevboxError::from)?;
    println!("{}", render::record_detail(&record));
    Ok(())
}

pub async fn handle_delete_command(inbox: &Inbox, kind: ResourceKind, id: &str) -> Result<()> {
    inbox
        .delete(kind, id)
        .await
        .map_err(DevboxError::from)
        .wrap_err_with(|| format!("Failed to delete {} {}", kind, id))?;
    println!("Deleted {} {}", kind, id);
    Ok(())
}

pub async fn handle_clear_command(inbox: &Inbox) -> Result<()> {
    inbox
        .clear_all()
        .await
        .map_err(DevboxError::from)
        .wrap_err("Failed to clear messages")?;
    println!("Cleared all messages");
    Ok(())
}

/// Subscribe to everything, follow the event stream and print each change
/// until Ctrl-C.
pub async fn handle_watch_command(inbox: &Inbox) -> Result<()> {
    let mut subscriptions = inbox.subscribe_all();
    let listener = inbox.listen();
    let mut connection = listener.subscribe_state();
    let mut printed = LastLines::default();

    info!(url = %inbox.config().base_url, "Watching inbox");
    println!("{}", render::header(&format!("DEVBOX {}", inbox.config().base_url)));

    loop {
        let changes = subscriptions
            .iter_mut()
            .map(|sub| Box::pin(wait_for_change(sub)));

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = connection.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *connection.borrow_and_update();
                println!("{}", render::connection_line(state));
            }
            ((key, line), _, _) = select_all(changes) => {
                if printed.update(key, &line) {
                    println!("{}", line);
                }
            }
        }
    }

    listener.close().await;
    Ok(())
}

async fn wait_for_change(subscription: &mut Subscription) -> (QueryKey, String) {
    subscription.changed().await;
    let key = subscription.key();
    (key, render::snapshot_line(key, &subscription.snapshot()))
}

/// Last line printed per key. Poll ticks change a snapshot twice without
/// changing what it renders to, so only new text is printed.
#[derive(Debug, Default)]
struct LastLines {
    lines: HashMap<QueryKey, String>,
}

impl LastLines {
    /// Record `line` for `key`; returns true when it differs from the last one.
    fn update(&mut self, key: QueryKey, line: &str) -> bool {
        if self.lines.get(&key).map(String::as_str) == Some(line) {
            return false;
        }
        self.lines.insert(key, line.to_string());
        true
    }
}
