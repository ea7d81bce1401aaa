//! Runbox Console
//!
//! Terminal front-end for the remote execution service: submit a snippet or
//! a multi-file project, then follow the job until it finishes.

mod commands;
mod config;
mod view;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runbox")]
#[command(about = "Run code on a remote execution service", long_about = None)]
struct Cli {
    /// Execution service URL
    #[arg(long, env = "RUNBOX_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Timeout in seconds, passed to the service as-is
    #[arg(short, long, env = "RUNBOX_TIMEOUT", default_value = "10")]
    timeout: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with program output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        timeout: cli.timeout,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
