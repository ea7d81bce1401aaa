//! Run command handler
//!
//! Loads the code (or project files), hands them to the lifecycle controller
//! and follows the job until it finishes. Ctrl-C stops following the job;
//! the service is not asked to cancel it.

use anyhow::{Context, Result, anyhow, bail};
use colored::*;
use runbox_client::{ExecutionApi, ExecutorClient};
use runbox_core::domain::request::SourceFile;
use runbox_lifecycle::{JobOutcome, LifecycleController, Progress};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use crate::config::Config;
use crate::view::ConsoleView;

/// Handle the run command
pub async fn handle_run_command(
    source: Option<String>,
    files: Vec<PathBuf>,
    entry: Option<String>,
    config: &Config,
) -> Result<()> {
    let code = match source.as_deref() {
        Some(path) => read_source(path)?,
        None => String::new(),
    };
    let uploads = files
        .iter()
        .map(|path| load_source_file(path))
        .collect::<Result<Vec<_>>>()?;

    let api: Arc<dyn ExecutionApi> = Arc::new(ExecutorClient::new(&config.api_url));
    let mut controller = LifecycleController::new(api, code, ConsoleView::default());
    controller.set_timeout(config.timeout.as_str());

    if !uploads.is_empty() {
        if let Some(inferred) = controller.select_files(uploads) {
            info!("Inferred entry file: {}", inferred);
        }
        if let Some(entry) = entry {
            controller.set_entry_file(entry);
        }
    }

    controller.run().await?;

    let outcome = loop {
        let event = tokio::select! {
            progress = controller.next_update() => Some(progress),
            _ = signal::ctrl_c() => None,
        };

        match event {
            Some(Some(Progress::Updated(_))) => continue,
            Some(Some(Progress::Finished(outcome))) => break outcome,
            Some(None) => bail!("Lost track of the execution"),
            None => {
                if let Some(handle) = controller.cancel() {
                    println!(
                        "{}",
                        format!("Check on it later with: runbox status {}", handle).dimmed()
                    );
                }
                return Err(anyhow!("Interrupted"));
            }
        }
    };

    match outcome {
        JobOutcome::Completed => Ok(()),
        JobOutcome::Failed => bail!("Execution failed"),
        JobOutcome::TimedOut => bail!("Execution timed out"),
        JobOutcome::PollFailed => bail!("Lost contact with the execution service"),
    }
}

/// Read the code to run from a file, or from stdin for "-"
fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .context("Failed to read code from stdin")?;
        return Ok(code);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read source file: {}", path))
}

/// Load a project file, named after its final path component
fn load_source_file(path: &Path) -> Result<SourceFile> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?;
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(SourceFile::new(name, content))
}
