//! Execution request builder
//!
//! Turns the current editor text, or the current file selection, into exactly
//! one [`ExecutionRequest`]. A non-empty selection always means project mode.

use crate::domain::request::{ExecutionRequest, InlineRequest, ProjectRequest, SourceFile, Timeout};
use crate::error::ValidationError;

/// Name picked as entry file whenever it is part of the selection
pub const DEFAULT_ENTRY_FILE: &str = "main.py";

/// Files chosen for upload, with the entry file the user will run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SourceFile>,
    entry_file: Option<String>,
}

impl FileSelection {
    /// Select files, inferring the entry file from them
    pub fn new(files: Vec<SourceFile>) -> Self {
        let entry_file = infer_entry_file(&files).map(str::to_string);
        Self { files, entry_file }
    }

    /// Override the inferred entry file
    pub fn set_entry_file(&mut self, name: impl Into<String>) {
        self.entry_file = Some(name.into());
    }

    pub fn entry_file(&self) -> Option<&str> {
        self.entry_file.as_deref()
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Build a project request from this selection
    pub fn to_request(&self, timeout: Timeout) -> Result<ProjectRequest, ValidationError> {
        if self.files.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        let entry_file = self.entry_file.clone().unwrap_or_default();
        ProjectRequest::new(self.files.clone(), entry_file, timeout)
    }
}

/// `main.py` if present anywhere in the selection, otherwise the first file
pub fn infer_entry_file(files: &[SourceFile]) -> Option<&str> {
    files
        .iter()
        .find(|f| f.name == DEFAULT_ENTRY_FILE)
        .or_else(|| files.first())
        .map(|f| f.name.as_str())
}

/// Build the request for one run
///
/// Project mode when any files are selected, inline mode from `code` otherwise.
pub fn build_request(
    code: &str,
    selection: &FileSelection,
    timeout: Timeout,
) -> Result<ExecutionRequest, ValidationError> {
    if selection.is_empty() {
        InlineRequest::new(code, timeout).map(ExecutionRequest::Inline)
    } else {
        selection.to_request(timeout).map(ExecutionRequest::Project)
    }
}
