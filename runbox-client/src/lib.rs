//! Runbox HTTP Client
//!
//! A small, type-safe HTTP client for the remote execution service.
//!
//! The client starts jobs (inline snippets or multi-file projects) and queries
//! their status. It never polls on its own; recurring status queries are the
//! job of the lifecycle crate, which talks to the service through the
//! [`ExecutionApi`] trait.
//!
//! # Example
//!
//! ```no_run
//! use runbox_client::ExecutorClient;
//! use runbox_core::domain::request::{InlineRequest, Timeout};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ExecutorClient::new("http://localhost:8000");
//!
//!     let request = InlineRequest::new("print(1)", Timeout::from(10))?;
//!     let handle = client.submit_inline(&request).await?;
//!
//!     let status = client.get_status(&handle).await?;
//!     println!("{} is {}", handle, status.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod status;
mod submissions;

// Re-export commonly used types
pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::{Client, Url};
use runbox_core::domain::execution::{JobHandle, JobStatus};
use runbox_core::domain::request::{InlineRequest, ProjectRequest};
use serde::de::DeserializeOwned;

/// Operations the lifecycle needs from the execution service
///
/// Implemented by [`ExecutorClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    /// Base URL of the service, for user-facing hints
    fn base_url(&self) -> &str;

    /// Start a job from a single snippet
    async fn submit_inline(&self, request: &InlineRequest) -> Result<JobHandle>;

    /// Start a job from a multi-file project
    async fn submit_project(&self, request: &ProjectRequest) -> Result<JobHandle>;

    /// Query the current status of a job
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus>;
}

/// HTTP client for the execution service API
///
/// Endpoints:
/// - `POST /execute` starts an inline job
/// - `POST /execute-with-files` starts a project job (multipart)
/// - `GET /status/{execution_id}` reports job status
#[derive(Debug, Clone)]
pub struct ExecutorClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ExecutorClient {
    /// Create a new execution service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use runbox_client::ExecutorClient;
    ///
    /// let client = ExecutorClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL of an endpoint below the base URL
    ///
    /// Each segment is percent-encoded, so an opaque id can never change the
    /// route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Any non-2xx status becomes [`ClientError::ApiError`] carrying the code.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            };
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[async_trait]
impl ExecutionApi for ExecutorClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn submit_inline(&self, request: &InlineRequest) -> Result<JobHandle> {
        ExecutorClient::submit_inline(self, request).await
    }

    async fn submit_project(&self, request: &ProjectRequest) -> Result<JobHandle> {
        ExecutorClient::submit_project(self, request).await
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.get_status(handle).await
    }
}
