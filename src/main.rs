//! Entry point: parse CLI, set up logging and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use fpl_gameweek::{
    cli::{Cli, Commands},
    commands::{costs::handle_costs, status::handle_status, sync::handle_sync},
};
use std::process::ExitCode;

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose {
        "fpl_gameweek=debug,warn"
    } else {
        "fpl_gameweek=info,warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let app = Cli::parse();
    init_tracing(app.global.verbose)?;

    match app.command {
        Commands::Sync => {
            let report = handle_sync(&app.global)
                .await
                .context("sync aborted before completing")?;
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Status { json } => handle_status(&app.global, json)
            .await
            .context("could not determine status")?,
        Commands::Costs => handle_costs(&app.global)
            .await
            .context("could not write the cost snapshot")?,
    }

    Ok(ExitCode::SUCCESS)
}
