//! Scripted execution service and recording UI for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use runbox_client::{ClientError, ExecutionApi, Result};
use runbox_core::domain::execution::{ExecutionStatus, JobHandle, JobStatus};
use runbox_core::domain::request::{InlineRequest, ProjectRequest};

use crate::view::{ControlSurface, OutputLine, OutputSink, StatusView};

/// Execution service answering from scripts
///
/// Submissions hand out `e1`, `e2`, ... unless scripted otherwise. Status
/// queries report `running` once the script runs out.
#[derive(Default)]
pub struct FakeApi {
    submissions: Mutex<VecDeque<Result<JobHandle>>>,
    statuses: Mutex<VecDeque<Result<JobStatus>>>,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
    polled: Mutex<Vec<String>>,
    submitted: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, statuses: Vec<Result<JobStatus>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_submissions(self, submissions: Vec<Result<JobHandle>>) -> Self {
        *self.submissions.lock().unwrap() = submissions.into();
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Execution ids queried so far, in order
    pub fn polled_ids(&self) -> Vec<String> {
        self.polled.lock().unwrap().clone()
    }

    /// Submission kinds seen so far (`inline:<code>` or `project:<entry>`)
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    fn next_submission(&self) -> Result<JobHandle> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(JobHandle::new(format!("e{}", n))))
    }
}

#[async_trait]
impl ExecutionApi for FakeApi {
    fn base_url(&self) -> &str {
        "http://fake:8000"
    }

    async fn submit_inline(&self, request: &InlineRequest) -> Result<JobHandle> {
        self.submitted
            .lock()
            .unwrap()
            .push(format!("inline:{}", request.code()));
        self.next_submission()
    }

    async fn submit_project(&self, request: &ProjectRequest) -> Result<JobHandle> {
        self.submitted
            .lock()
            .unwrap()
            .push(format!("project:{}", request.entry_file()));
        self.next_submission()
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled
            .lock()
            .unwrap()
            .push(handle.execution_id().to_string());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(JobStatus::new(ExecutionStatus::Running)))
    }
}

pub fn http_error(status: u16) -> ClientError {
    ClientError::api_error(status, "scripted failure")
}

/// UI double that records every call
#[derive(Debug, Default)]
pub struct RecordingView {
    pub lines: Vec<OutputLine>,
    pub clears: usize,
    pub run_enabled: Vec<bool>,
    pub status_visible: Vec<bool>,
    pub statuses: Vec<StatusView>,
    pub alerts: Vec<String>,
}

impl RecordingView {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn enable_count(&self) -> usize {
        self.run_enabled.iter().filter(|enabled| **enabled).count()
    }

    pub fn is_run_enabled(&self) -> bool {
        self.run_enabled.last().copied().unwrap_or(true)
    }
}

impl OutputSink for RecordingView {
    fn append(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.lines.clear();
    }
}

impl ControlSurface for RecordingView {
    fn set_run_enabled(&mut self, enabled: bool) {
        self.run_enabled.push(enabled);
    }

    fn set_status_visible(&mut self, visible: bool) {
        self.status_visible.push(visible);
    }

    fn show_status(&mut self, view: &StatusView) {
        self.statuses.push(view.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
