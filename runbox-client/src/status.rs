//! Status endpoint

use runbox_core::domain::execution::{JobHandle, JobStatus};

use crate::ExecutorClient;
use crate::error::Result;

impl ExecutorClient {
    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `handle` - The job to query
    ///
    /// # Returns
    /// The status report as sent by the service
    pub async fn get_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        let url = self.endpoint(&["status", handle.execution_id()])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
