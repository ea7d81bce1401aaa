//! Status command handler

use anyhow::{Context, Result, bail};
use chrono::Utc;
use colored::*;
use runbox_client::ExecutorClient;
use runbox_core::domain::execution::{JobHandle, JobStatus};
use runbox_lifecycle::StatusView;

use crate::config::Config;
use crate::view::colorize_status;

/// Query one execution's status and print it
pub async fn handle_status_command(id: &str, json: bool, config: &Config) -> Result<()> {
    let client = ExecutorClient::new(&config.api_url);
    let handle = JobHandle::new(id);

    let status = match client.get_status(&handle).await {
        Ok(status) => status,
        Err(e) if e.is_not_found() => bail!("No execution with ID {}", handle),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to fetch status of execution {}", handle));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status_details(&handle, &status);
    }

    Ok(())
}

/// Print detailed status information
fn print_status_details(handle: &JobHandle, status: &JobStatus) {
    let view = StatusView::from_status(status, Utc::now());

    println!("{}", "Execution Details:".bold());
    println!("  ID:       {}", handle.to_string().cyan());
    println!(
        "  Status:   {}",
        colorize_status(view.status, &view.status_text())
    );
    println!("  Lines:    {}", view.lines_of_code);
    println!("  Elapsed:  {}", view.elapsed_text());
    if let Some(start) = view.start_text() {
        println!("  Started:  {}", start);
    }

    if let Some(output) = status.output() {
        println!("\n{}", "Output:".bold());
        println!("{}", output.trim_end_matches('\n'));
    }

    if let Some(error) = status.error() {
        println!("\n{}", "Error:".bold());
        println!("{}", error.trim_end_matches('\n').red());
    }
}
