//! Commands module
//!
//! Defines all console commands and their handlers.

mod run;
mod status;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level console commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run code on the execution service and wait for the result
    Run {
        /// File holding the code to run ("-" reads standard input)
        source: Option<String>,

        /// Project file to upload; repeat for several (switches to project mode)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Entry file for project mode (defaults to main.py, else the first file)
        #[arg(short, long)]
        entry: Option<String>,
    },
    /// Show the current status of an execution
    Status {
        /// Execution ID
        id: String,

        /// Print the raw status report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a console command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The console configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run {
            source,
            files,
            entry,
        } => run::handle_run_command(source, files, entry, config).await,
        Commands::Status { id, json } => status::handle_status_command(&id, json, config).await,
    }
}
