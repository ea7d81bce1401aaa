//! Runbox Lifecycle
//!
//! Client-side lifecycle of one remote execution: build the request, submit
//! it, poll the job until it reaches a terminal status and present the
//! result.
//!
//! Architecture:
//! - View: capabilities the lifecycle needs from the UI (editor text, output
//!   panel, run controls, status panel)
//! - Poller: cancellable fixed-cadence status queries for one job
//! - Controller: owns the single active job and drives every transition
//!
//! Everything runs on the caller's Tokio runtime; the controller is driven by
//! awaiting [`LifecycleController::run`] and then
//! [`LifecycleController::next_update`] until the job finishes.

pub mod controller;
pub mod error;
pub mod poller;
pub mod view;

#[cfg(test)]
mod test_support;

pub use controller::{JobOutcome, LifecycleController, LifecycleState, Progress};
pub use error::RunError;
pub use poller::{Delivered, POLL_INTERVAL, PollEvent, PollSession, StatusPoller};
pub use view::{ControlSurface, LineKind, OutputLine, OutputSink, StatusView, TextSource};
