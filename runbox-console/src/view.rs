//! Terminal front-end
//!
//! Plays the part of the output panel, run button and status panel.

use colored::*;
use runbox_core::domain::execution::ExecutionStatus;
use runbox_lifecycle::{ControlSurface, LineKind, OutputLine, OutputSink, StatusView};
use tracing::debug;

/// Prints lifecycle output to the terminal
#[derive(Debug, Default)]
pub struct ConsoleView {
    status_visible: bool,
    last_status: Option<ExecutionStatus>,
}

impl OutputSink for ConsoleView {
    fn append(&mut self, line: OutputLine) {
        let text = match line.kind {
            LineKind::Info => line.text.cyan(),
            LineKind::Success => line.text.green(),
            LineKind::Error => line.text.red(),
        };

        if line.text.ends_with('\n') {
            print!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    fn clear(&mut self) {
        // Printed lines cannot be taken back; start the status panel afresh.
        self.last_status = None;
    }
}

impl ControlSurface for ConsoleView {
    fn set_run_enabled(&mut self, enabled: bool) {
        debug!(enabled, "Run control");
    }

    fn set_status_visible(&mut self, visible: bool) {
        self.status_visible = visible;
    }

    fn show_status(&mut self, view: &StatusView) {
        // One panel line per status change rather than per poll.
        if !self.status_visible || self.last_status == Some(view.status) {
            return;
        }
        self.last_status = Some(view.status);
        println!("{}", format_status_line(view));
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message.yellow());
    }
}

/// Single-line rendering of the status panel
pub fn format_status_line(view: &StatusView) -> String {
    let mut line = format!(
        "{} {}  lines: {}  elapsed: {}",
        "▸".cyan(),
        colorize_status(view.status, &view.status_text()),
        view.lines_of_code,
        view.elapsed_text()
    );
    if let Some(start) = view.start_text() {
        line.push_str(&format!("  started: {}", start));
    }
    line
}

/// Colorize a status for display
pub fn colorize_status(status: ExecutionStatus, text: &str) -> ColoredString {
    match status {
        ExecutionStatus::Queued => text.yellow(),
        ExecutionStatus::Running => text.cyan(),
        ExecutionStatus::Completed => text.green(),
        ExecutionStatus::Failed => text.red(),
        ExecutionStatus::Timeout => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runbox_core::domain::execution::JobStatus;

    #[test]
    fn test_status_line_contents() {
        colored::control::set_override(false);

        let mut status = JobStatus::new(ExecutionStatus::Running);
        status.lines_of_code = Some(4);
        status.execution_time_seconds = Some(0.5);

        let line = format_status_line(&StatusView::from_status(&status, chrono::Utc::now()));
        assert_eq!(line, "▸ RUNNING  lines: 4  elapsed: 0.50s");
    }

    #[test]
    fn test_hidden_panel_ignores_status() {
        let mut view = ConsoleView::default();
        let status = StatusView::from_status(&JobStatus::new(ExecutionStatus::Queued), chrono::Utc::now());

        view.show_status(&status);
        assert_eq!(view.last_status, None);

        view.set_status_visible(true);
        view.show_status(&status);
        assert_eq!(view.last_status, Some(ExecutionStatus::Queued));
    }
}
