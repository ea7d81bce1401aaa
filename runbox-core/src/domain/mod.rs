//! Core domain types
//!
//! This module contains the structures the client works with: what gets
//! submitted (requests), what comes back on acceptance (job handles) and what
//! the service reports while a job runs (status reports).

pub mod execution;
pub mod request;
