//! CLI module for devbox.
//!
//! - Argument parsing
//! - Version display
//! - Plain-text rendering
//! - Command handlers for one-shot commands and watch mode
//!
//! ```ignore
//! use devbox::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! runtime.block_on(run_cli_command(command, &inbox))?;
//! ```

pub mod args;
pub mod commands;
pub mod render;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand};
pub use version::{version_string, VERSION};

use color_eyre::Result;

use crate::inbox::Inbox;

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: devbox [COMMAND]

Commands:
  watch                 Follow the inbox live (default)
  stats                 Print message counts
  list <kind>           List captured messages
  show <kind> <id>      Show one message
  delete <kind> <id>    Delete one message
  clear                 Delete every message

Kinds: email, sms, push, chat

Options:
  -h, --help            Print help
  -V, --version         Print version

Environment:
  DEVBOX_API_URL            Gateway API base (default http://localhost:10101/api/v1)
  DEVBOX_POLL_INTERVAL_MS   Refresh period in milliseconds (default 5000)
  DEVBOX_RECONNECT_MAX_SECS Longest live-update reconnect delay (default 30)
  RUST_LOG                  Log filter (default devbox=info)";

/// Run a parsed command against `inbox`.
pub async fn run_cli_command(command: CliCommand, inbox: &Inbox) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version_string()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Watch => commands::handle_watch_command(inbox).await?,
        CliCommand::Stats => commands::handle_stats_command(inbox).await?,
        CliCommand::List { kind } => commands::handle_list_command(inbox, kind).await?,
        CliCommand::Show { kind, id } => commands::handle_show_command(inbox, kind, &id).await?,
        CliCommand::Delete { kind, id } => {
            commands::handle_delete_command(inbox, kind, &id).await?
        }
        CliCommand::Clear => commands::handle_clear_command(inbox).await?,
    }
    Ok(())
}
