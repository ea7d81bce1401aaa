//! Errors that end a run before any job is tracked

use runbox_client::ClientError;
use runbox_core::ValidationError;
use thiserror::Error;

/// Why [`LifecycleController::run`](crate::LifecycleController::run) did not start a job
#[derive(Debug, Error)]
pub enum RunError {
    /// The request was rejected locally; nothing was sent
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The service could not be reached or refused the submission
    #[error("submission failed: {0}")]
    Network(#[from] ClientError),
}
