//! `relicta-sentry`: runs the Sentry plugin for an out-of-process host.
//!
//! Requests and configuration arrive as JSON on stdin (or from a file);
//! responses are written to stdout. The exit code is 0 whenever a response
//! was written, including failed hook results, and 1 otherwise.

mod cli;
mod commands;
mod errors;
mod shutdown;
mod tracing;

use crate::cli::{Cli, Commands, parse};
use crate::tracing::TracingConfig;
use relicta_plugin::CancellationToken;
use relicta_sentry::SentryPlugin;
use ::tracing::instrument;

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    if let Err(error) = run_main().await {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> miette::Result<()> {
    let cli = parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..Default::default()
    })?;

    let cancel = CancellationToken::new();
    shutdown::install_signal_handlers(cancel.clone());

    let result = run_command(cli, cancel.clone()).await;
    cancel.cancel();
    result
}

#[instrument(skip_all, fields(command = ?cli.command))]
async fn run_command(cli: Cli, cancel: CancellationToken) -> miette::Result<()> {
    let plugin = SentryPlugin::new();
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Info => commands::info(&plugin, &mut stdout)?,
        Commands::Execute { request, dry_run } => {
            let input = commands::read_input("request", request.as_deref(), &mut stdin)?;
            commands::execute(&plugin, &input, dry_run, cancel, &mut stdout).await?;
        }
        Commands::Validate { config } => {
            let input = commands::read_input("configuration", config.as_deref(), &mut stdin)?;
            commands::validate(&plugin, &input, cancel, &mut stdout).await?;
        }
    }

    Ok(())
}
