//! Data Transfer Objects for the execution service
//!
//! This module contains the payloads exchanged with the remote execution
//! service. Domain types are converted into these at the client boundary.

pub mod execution;
