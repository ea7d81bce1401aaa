//! Lifecycle controller
//!
//! Owns the one slot for an active job and moves it through
//! `Idle -> Submitting -> Polling -> Idle`. Submission failures and poll
//! failures both go straight back to `Idle`. Starting a new run while a job
//! is tracked stops the old poll session first; the service is never asked
//! to cancel anything.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use runbox_client::{ClientError, ExecutionApi};
use runbox_core::builder::{FileSelection, build_request};
use runbox_core::domain::execution::{ExecutionStatus, JobHandle, JobStatus};
use runbox_core::domain::request::{ExecutionRequest, SourceFile, Timeout};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::poller::{Delivered, PollEvent, PollSession, StatusPoller};
use crate::view::{ControlSurface, OutputLine, OutputSink, StatusView, TextSource};

/// Externally visible state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Submitting,
    Polling,
}

/// How a tracked job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    /// The program itself failed on the service
    Failed,
    TimedOut,
    /// A status query failed; the job's fate is unknown
    PollFailed,
}

/// Result of handling one poll event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A non-terminal status was reported
    Updated(ExecutionStatus),
    /// The job left the controller and the run controls are enabled again
    Finished(JobOutcome),
}

enum Phase {
    Idle,
    Submitting,
    Polling(ActiveJob),
}

struct ActiveJob {
    session: PollSession,
    events: mpsc::Receiver<(PollEvent, Delivered)>,
}

/// Drives one execution at a time from the user's run action to its result
pub struct LifecycleController<S, V> {
    api: Arc<dyn ExecutionApi>,
    poller: StatusPoller,
    source: S,
    view: V,
    selection: FileSelection,
    timeout: Timeout,
    phase: Phase,
}

impl<S, V> LifecycleController<S, V>
where
    S: TextSource,
    V: OutputSink + ControlSurface,
{
    pub fn new(api: Arc<dyn ExecutionApi>, source: S, view: V) -> Self {
        let poller = StatusPoller::new(Arc::clone(&api));
        Self {
            api,
            poller,
            source,
            view,
            selection: FileSelection::default(),
            timeout: Timeout::default(),
            phase: Phase::Idle,
        }
    }

    /// Poll on a different cadence than [`POLL_INTERVAL`](crate::POLL_INTERVAL)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poller = self.poller.with_interval(interval);
        self
    }

    // =============================================================================
    // Form state
    // =============================================================================

    /// Select files for upload, returning the inferred entry file
    ///
    /// An empty list clears the selection and switches back to inline mode.
    pub fn select_files(&mut self, files: Vec<SourceFile>) -> Option<&str> {
        self.selection = FileSelection::new(files);
        self.selection.entry_file()
    }

    pub fn set_entry_file(&mut self, name: impl Into<String>) {
        self.selection.set_entry_file(name);
    }

    pub fn set_timeout(&mut self, timeout: impl Into<Timeout>) {
        self.timeout = timeout.into();
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> LifecycleState {
        match self.phase {
            Phase::Idle => LifecycleState::Idle,
            Phase::Submitting => LifecycleState::Submitting,
            Phase::Polling(_) => LifecycleState::Polling,
        }
    }

    /// Handle of the job currently being polled
    pub fn active_job(&self) -> Option<&JobHandle> {
        match &self.phase {
            Phase::Polling(active) => Some(active.session.handle()),
            _ => None,
        }
    }

    // =============================================================================
    // Transitions
    // =============================================================================

    /// Start a new execution from the current editor text or file selection
    ///
    /// Any job still tracked is dropped first. On success the new job is
    /// being polled; drive it with [`next_update`](Self::next_update).
    /// Validation failures leave the output panel untouched and never reach
    /// the network.
    pub async fn run(&mut self) -> Result<JobHandle, RunError> {
        if let Some(previous) = self.stop_active() {
            info!(execution_id = %previous, "Superseding active execution");
        }

        let code = self.source.current_text();
        let request = match build_request(&code, &self.selection, self.timeout.clone()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected run: {}", e);
                self.view.alert(&e.alert_text());
                self.view.set_run_enabled(true);
                return Err(e.into());
            }
        };

        self.view.set_run_enabled(false);
        self.view.clear();
        self.view.set_status_visible(false);
        self.phase = Phase::Submitting;

        let api = Arc::clone(&self.api);
        let (submitted, started_text) = match &request {
            ExecutionRequest::Inline(req) => {
                self.view
                    .append(OutputLine::info("Submitting code for execution..."));
                (api.submit_inline(req).await, "Execution started")
            }
            ExecutionRequest::Project(req) => {
                self.view.append(OutputLine::info("Uploading project files..."));
                (api.submit_project(req).await, "Project execution started")
            }
        };

        match submitted {
            Ok(handle) => {
                info!(execution_id = %handle, "Execution accepted");
                self.view.append(OutputLine::success(format!(
                    "{} (ID: {})",
                    started_text, handle
                )));
                self.view.set_status_visible(true);
                self.start_polling(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                self.phase = Phase::Idle;
                self.view.append(OutputLine::error(format!("Error: {}", e)));
                self.view.append(OutputLine::info(format!(
                    "Make sure the backend is running on {}",
                    self.api.base_url()
                )));
                self.view.set_run_enabled(true);
                Err(e.into())
            }
        }
    }

    /// Wait for and handle the next poll result
    ///
    /// The poller does not query again until the result has been handled
    /// here, so a terminal status ends polling even if the next call comes
    /// late. Returns `None` when no job is being polled.
    pub async fn next_update(&mut self) -> Option<Progress> {
        let delivery = match &mut self.phase {
            Phase::Polling(active) => active.events.recv().await,
            _ => return None,
        };

        let Some((event, delivered)) = delivery else {
            warn!("Poll session ended without a terminal status");
            self.stop_active();
            self.view.set_run_enabled(true);
            return None;
        };

        let progress = match event {
            PollEvent::Status(status) => self.on_status(status),
            PollEvent::Failed(e) => Progress::Finished(self.on_poll_failure(e)),
        };
        delivered.complete();
        Some(progress)
    }

    /// Handle poll results until the tracked job finishes
    ///
    /// Returns `None` if nothing was being polled.
    pub async fn wait_for_completion(&mut self) -> Option<JobOutcome> {
        loop {
            match self.next_update().await? {
                Progress::Updated(_) => continue,
                Progress::Finished(outcome) => return Some(outcome),
            }
        }
    }

    /// Stop tracking the current job, if any
    ///
    /// Client-local only: the service keeps running the job. Returns the
    /// handle that was dropped.
    pub fn cancel(&mut self) -> Option<JobHandle> {
        let previous = self.stop_active()?;
        info!(execution_id = %previous, "Stopped tracking execution");
        self.view.append(OutputLine::info(format!(
            "Stopped watching execution {}",
            previous
        )));
        self.view.set_run_enabled(true);
        Some(previous)
    }

    fn start_polling(&mut self, handle: JobHandle) {
        // One result in flight at a time: the poller waits for `Delivered`.
        let (tx, events) = mpsc::channel(1);
        let session = self.poller.start(handle, move |event, delivered| {
            // The receiver only goes away together with the session.
            let _ = tx.try_send((event, delivered));
        });
        self.phase = Phase::Polling(ActiveJob { session, events });
    }

    /// Return to `Idle`, stopping the poll session if there is one
    fn stop_active(&mut self) -> Option<JobHandle> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Polling(active) => {
                active.session.stop();
                Some(active.session.handle().clone())
            }
            Phase::Submitting | Phase::Idle => None,
        }
    }

    fn on_status(&mut self, status: JobStatus) -> Progress {
        self.view
            .show_status(&StatusView::from_status(&status, Utc::now()));

        if !status.is_terminal() {
            return Progress::Updated(status.status);
        }

        if let Some(handle) = self.stop_active() {
            info!(execution_id = %handle, status = %status.status, "Execution finished");
        }

        if let Some(output) = status.output() {
            self.view.append(OutputLine::info("--- Output ---"));
            self.view.append(OutputLine::success(output));
        }
        if let Some(error) = status.error() {
            self.view.append(OutputLine::error("--- Error ---"));
            self.view.append(OutputLine::error(error));
        }

        let outcome = match status.status {
            ExecutionStatus::Timeout => {
                self.view.append(OutputLine::error("Execution timed out!"));
                JobOutcome::TimedOut
            }
            ExecutionStatus::Failed => JobOutcome::Failed,
            _ => JobOutcome::Completed,
        };

        self.view.set_run_enabled(true);
        Progress::Finished(outcome)
    }

    fn on_poll_failure(&mut self, e: ClientError) -> JobOutcome {
        if let Some(handle) = self.stop_active() {
            warn!(execution_id = %handle, "Stopped polling after failure: {}", e);
        }
        debug!(status = ?e.status_code(), "Poll failure details");

        self.view
            .append(OutputLine::error(format!("Status check error: {}", e)));
        self.view.set_run_enabled(true);
        JobOutcome::PollFailed
    }
}
