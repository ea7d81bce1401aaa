//! UI capabilities
//!
//! The lifecycle never touches a concrete UI. It reads code through a
//! [`TextSource`], writes categorized lines to an [`OutputSink`] and drives
//! the run button and status panel through a [`ControlSurface`].

use chrono::{DateTime, Local, Utc};
use runbox_core::domain::execution::{ExecutionStatus, JobStatus};

/// Where the code to run comes from (the editor)
pub trait TextSource {
    /// Current editor contents
    fn current_text(&self) -> String;
}

impl TextSource for String {
    fn current_text(&self) -> String {
        self.clone()
    }
}

/// Semantic category of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Success,
    Error,
}

/// One line of user-visible output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Error,
            text: text.into(),
        }
    }
}

/// Output panel
pub trait OutputSink {
    fn append(&mut self, line: OutputLine);

    /// Remove all previously appended lines
    fn clear(&mut self);
}

/// Run controls and the status panel
pub trait ControlSurface {
    fn set_run_enabled(&mut self, enabled: bool);

    fn set_status_visible(&mut self, visible: bool);

    fn show_status(&mut self, view: &StatusView);

    /// Blocking notice for problems found before anything is submitted
    fn alert(&mut self, message: &str);
}

/// What the status panel shows for one status report
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub status: ExecutionStatus,
    pub lines_of_code: u64,
    /// `None` when the report has neither an execution time nor a start time
    pub elapsed_seconds: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
}

impl StatusView {
    /// Build the panel contents from a report received at `now`
    ///
    /// Elapsed time is the reported execution time when present. Otherwise
    /// it is measured from the reported start time to `now` on the client
    /// clock, so it is skewed by any clock difference with the service.
    pub fn from_status(status: &JobStatus, now: DateTime<Utc>) -> Self {
        let elapsed_seconds = status.execution_time_seconds.or_else(|| {
            status
                .start_time
                .map(|start| (now - start).num_milliseconds() as f64 / 1000.0)
        });

        Self {
            status: status.status,
            lines_of_code: status.lines_of_code.unwrap_or(0),
            elapsed_seconds,
            started_at: status.start_time,
        }
    }

    pub fn status_text(&self) -> String {
        self.status.as_str().to_uppercase()
    }

    pub fn elapsed_text(&self) -> String {
        match self.elapsed_seconds {
            Some(secs) => format!("{:.2}s", secs),
            None => "-".to_string(),
        }
    }

    /// Start time in the local time zone
    pub fn start_text(&self) -> Option<String> {
        self.started_at
            .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string())
    }
}
