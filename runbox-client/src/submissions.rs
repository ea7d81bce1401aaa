//! Submission endpoints
//!
//! Each call starts a new remote job and returns as soon as the service
//! acknowledges it. Nothing here polls.

use reqwest::multipart::{Form, Part};
use runbox_core::domain::execution::JobHandle;
use runbox_core::domain::request::{InlineRequest, ProjectRequest};
use runbox_core::dto::execution::{ExecuteCode, ExecutionAccepted, form};
use tracing::debug;

use crate::ExecutorClient;
use crate::error::Result;

impl ExecutorClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a single snippet for execution
    ///
    /// # Arguments
    /// * `request` - The validated inline request
    ///
    /// # Returns
    /// The handle of the newly created job
    pub async fn submit_inline(&self, request: &InlineRequest) -> Result<JobHandle> {
        let url = self.endpoint(&["execute"])?;
        let body = ExecuteCode::from(request);

        debug!(timeout = ?body.timeout, "Submitting inline code");
        let response = self.client.post(url).json(&body).send().await?;

        let accepted: ExecutionAccepted = self.handle_response(response).await?;
        Ok(accepted.into())
    }

    /// Submit a multi-file project for execution
    ///
    /// Every file is sent as a `files` part under its own file name, followed
    /// by the `entry_file` and `timeout` fields.
    ///
    /// # Arguments
    /// * `request` - The validated project request
    ///
    /// # Returns
    /// The handle of the newly created job
    pub async fn submit_project(&self, request: &ProjectRequest) -> Result<JobHandle> {
        let url = self.endpoint(&["execute-with-files"])?;

        let mut multipart = Form::new();
        for file in request.files() {
            let part = Part::bytes(file.content.clone()).file_name(file.name.clone());
            multipart = multipart.part(form::FILES, part);
        }
        let multipart = multipart
            .text(form::ENTRY_FILE, request.entry_file().to_string())
            .text(form::TIMEOUT, request.timeout().as_str().to_string());

        debug!(
            files = request.files().len(),
            entry_file = request.entry_file(),
            "Uploading project files"
        );
        let response = self.client.post(url).multipart(multipart).send().await?;

        let accepted: ExecutionAccepted = self.handle_response(response).await?;
        Ok(accepted.into())
    }
}
