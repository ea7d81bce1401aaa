//! Configuration module
//!
//! Handles console configuration: where the execution service lives and the
//! timeout passed along with every run.

use anyhow::bail;

/// Console configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the execution service
    pub api_url: String,

    /// Timeout in seconds, as entered; sent to the service unvalidated
    pub timeout: String,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!("api_url must start with http:// or https://");
        }

        Ok(())
    }
}
