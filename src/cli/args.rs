//! Command-line argument parsing for the devbox CLI.

use thiserror::Error;

use crate::models::{ParseKindError, ResourceKind};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Keep a live view of the inbox (default)
    Watch,
    /// Print message counts
    Stats,
    /// List records of one kind
    List { kind: ResourceKind },
    /// Show one record in full
    Show { kind: ResourceKind, id: String },
    /// Delete one record
    Delete { kind: ResourceKind, id: String },
    /// Delete every record
    Clear,
    /// Show version information
    Version,
    /// Show usage
    Help,
}

/// Errors from parsing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' requires a <{name}> argument")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error(transparent)]
    InvalidKind(#[from] ParseKindError),
}

/// Parse command-line arguments and return the command to run.
///
/// The first item is the program name and is skipped. Global flags
/// (`--version`, `--help`) win wherever they appear.
///
/// # Examples
///
/// ```
/// use devbox::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["devbox".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        return Ok(CliCommand::Version);
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(CliCommand::Help);
    }

    let mut rest = args.into_iter();
    let command = match rest.next().as_deref() {
        None | Some("watch") => CliCommand::Watch,
        Some("stats") => CliCommand::Stats,
        Some("clear") => CliCommand::Clear,
        Some("help") => CliCommand::Help,
        Some("list") => CliCommand::List {
            kind: required(&mut rest, "list", "kind")?.parse()?,
        },
        Some("show") => {
            let kind = required(&mut rest, "show", "kind")?.parse()?;
            let id = required(&mut rest, "show", "id")?;
            CliCommand::Show { kind, id }
        }
        Some("delete") => {
            let kind = required(&mut rest, "delete", "kind")?.parse()?;
            let id = required(&mut rest, "delete", "id")?;
            CliCommand::Delete { kind, id }
        }
        Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    match rest.next() {
        Some(extra) => Err(ArgsError::UnexpectedArgument(extra)),
        None => Ok(command),
    }
}

fn required<I>(args: &mut I, command: &'static str, name: &'static str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .filter(|value| !value.is_empty())
        .ok_or(ArgsError::MissingArgument { command, name })
}
