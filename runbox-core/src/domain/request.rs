//! Execution request types
//!
//! A request is built fresh for every run and discarded once submitted.
//! Construction validates the request, so a value of these types is always
//! fit to be sent.

use std::fmt;

use crate::error::ValidationError;

/// Default timeout, in seconds, offered to the user
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A file selected for upload in project mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Timeout parameter as entered by the user
///
/// The raw text is kept as-is. Parsing happens only where the wire format
/// needs a number, and a value that does not parse is left for the service
/// to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeout(String);

impl Timeout {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The timeout in seconds, if the raw text is a whole number
    pub fn seconds(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::from(DEFAULT_TIMEOUT_SECS)
    }
}

impl From<u64> for Timeout {
    fn from(seconds: u64) -> Self {
        Self(seconds.to_string())
    }
}

impl From<&str> for Timeout {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single snippet taken from the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRequest {
    code: String,
    timeout: Timeout,
}

impl InlineRequest {
    /// Fails with [`ValidationError::EmptyCode`] if the code is blank
    pub fn new(code: impl Into<String>, timeout: Timeout) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        Ok(Self { code, timeout })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn timeout(&self) -> &Timeout {
        &self.timeout
    }
}

/// A multi-file project with a designated entry file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    files: Vec<SourceFile>,
    entry_file: String,
    timeout: Timeout,
}

impl ProjectRequest {
    pub fn new(
        files: Vec<SourceFile>,
        entry_file: impl Into<String>,
        timeout: Timeout,
    ) -> Result<Self, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }

        let entry_file = entry_file.into();
        if !files.iter().any(|f| f.name == entry_file) {
            return Err(ValidationError::UnknownEntryFile(entry_file));
        }

        Ok(Self {
            files,
            entry_file,
            timeout,
        })
    }

    /// Files in selection order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn entry_file(&self) -> &str {
        &self.entry_file
    }

    pub fn timeout(&self) -> &Timeout {
        &self.timeout
    }
}

/// One submission, in either of the two modes the service accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionRequest {
    Inline(InlineRequest),
    Project(ProjectRequest),
}

impl ExecutionRequest {
    pub fn timeout(&self) -> &Timeout {
        match self {
            Self::Inline(req) => req.timeout(),
            Self::Project(req) => req.timeout(),
        }
    }
}
