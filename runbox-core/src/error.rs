//! Validation errors raised while building an execution request
//!
//! These never reach the network: a request that fails validation is
//! rejected before any submission is attempted.

use thiserror::Error;

/// Reasons an execution request cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Editor text is empty once surrounding whitespace is removed
    #[error("empty code")]
    EmptyCode,

    /// Project mode was requested without any files
    #[error("no files")]
    NoFiles,

    /// The entry file does not name one of the selected files
    #[error("entry file `{0}` is not among the selected files")]
    UnknownEntryFile(String),
}

impl ValidationError {
    /// Short message suitable for an alert shown to the user
    pub fn alert_text(&self) -> String {
        match self {
            Self::EmptyCode => "Please write some code first!".to_string(),
            Self::NoFiles => "Please upload Python files".to_string(),
            Self::UnknownEntryFile(name) if name.is_empty() => {
                "Please choose an entry file".to_string()
            }
            Self::UnknownEntryFile(name) => {
                format!("Entry file '{}' is not one of the uploaded files", name)
            }
        }
    }
}
