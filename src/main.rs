use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use devbox::cli::{parse_args, run_cli_command, version_string, CliCommand, USAGE};
use devbox::config::DevboxConfig;
use devbox::error::DevboxError;
use devbox::inbox::Inbox;

/// Log to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devbox=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {}\n\n{}", err, USAGE);
            std::process::exit(2);
        }
    };

    // Handle flags that need neither a runtime nor configuration
    match command {
        CliCommand::Version => {
            println!("{}", version_string());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    init_tracing();

    let config = match DevboxConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let err = DevboxError::from(err);
            eprintln!("{}\nHint: {}", err.user_message(), err.recovery_hint());
            std::process::exit(2);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let inbox = Inbox::new(config);
        tracing::debug!(base_url = %inbox.config().base_url, "Using gateway");
        run_cli_command(command, &inbox).await
    })
}
