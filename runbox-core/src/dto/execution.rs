//! Execution DTOs for communication with the execution service

use serde::{Deserialize, Serialize};

use crate::domain::execution::JobHandle;
use crate::domain::request::InlineRequest;

/// Form field names used by the multi-file submission
pub mod form {
    pub const FILES: &str = "files";
    pub const ENTRY_FILE: &str = "entry_file";
    pub const TIMEOUT: &str = "timeout";
}

/// JSON body of an inline submission
///
/// `timeout` is `null` when the user-entered value is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteCode {
    pub code: String,
    pub timeout: Option<u64>,
}

impl From<&InlineRequest> for ExecuteCode {
    fn from(req: &InlineRequest) -> Self {
        Self {
            code: req.code().to_string(),
            timeout: req.timeout().seconds(),
        }
    }
}

/// Acknowledgement returned when the service creates a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionAccepted {
    pub execution_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ExecutionAccepted> for JobHandle {
    fn from(accepted: ExecutionAccepted) -> Self {
        JobHandle::new(accepted.execution_id)
    }
}
