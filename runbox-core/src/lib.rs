//! Runbox Core
//!
//! Core types and abstractions for the Runbox execution client.
//!
//! This crate contains:
//! - Domain types: execution requests, job handles and job status reports
//! - DTOs: wire payloads exchanged with the remote execution service
//! - The request builder that turns editor text or a file selection into a request

pub mod builder;
pub mod domain;
pub mod dto;
pub mod error;

pub use builder::{FileSelection, build_request};
pub use error::ValidationError;
