//! Status poller
//!
//! Queries the status of one job on a fixed cadence and hands every result
//! to a listener together with a [`Delivered`] token. The next query is
//! scheduled only once that token is completed or dropped, so a listener can
//! hold it until the result has been fully handled. The poller does not
//! interpret results: deciding that a status is terminal and stopping the
//! session is up to the caller. The only exception is a failed query, after
//! which the loop ends by itself since the job can no longer be confirmed to
//! exist.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use runbox_client::{ClientError, ExecutionApi};
use runbox_core::domain::execution::{JobHandle, JobStatus};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, warn};

/// Delay between the end of one status query and the start of the next
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of one status query
#[derive(Debug)]
pub enum PollEvent {
    Status(JobStatus),
    Failed(ClientError),
}

/// Marks one delivered result as handled
///
/// Completing or dropping it lets the poller re-arm its timer.
#[derive(Debug)]
pub struct Delivered(oneshot::Sender<()>);

impl Delivered {
    pub fn complete(self) {
        // The poll loop may already be gone.
        let _ = self.0.send(());
    }
}

type Listener = Box<dyn FnMut(PollEvent, Delivered) + Send>;

/// Starts poll sessions against an execution service
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn ExecutionApi>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn ExecutionApi>) -> Self {
        Self {
            api,
            interval: POLL_INTERVAL,
        }
    }

    /// Use a different cadence
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling `handle`, delivering each result to `on_update`
    ///
    /// The first query is issued one interval after the call. Queries are
    /// strictly serial: the timer is re-armed only after the previous
    /// result's [`Delivered`] token has been completed or dropped. Must be
    /// called from within a Tokio runtime.
    pub fn start<F>(&self, handle: JobHandle, on_update: F) -> PollSession
    where
        F: FnMut(PollEvent, Delivered) + Send + 'static,
    {
        debug!(execution_id = %handle, interval = ?self.interval, "Starting poll session");

        let on_update: Listener = Box::new(on_update);
        let listener = Arc::new(Mutex::new(Some(on_update)));

        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.api),
            handle.clone(),
            self.interval,
            Arc::clone(&listener),
        ));

        PollSession {
            handle,
            interval: self.interval,
            listener,
            task,
        }
    }
}

/// A running status-polling task for one job
///
/// Stopping is client-local: the service is not told and may keep running
/// the job. Once [`PollSession::stop`] returns, the listener has been
/// dropped and will not be called again. Dropping the session stops it.
pub struct PollSession {
    handle: JobHandle,
    interval: Duration,
    listener: Arc<Mutex<Option<Listener>>>,
    task: JoinHandle<()>,
}

impl PollSession {
    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    /// Whether the listener can still receive results
    pub fn is_active(&self) -> bool {
        lock(&self.listener).is_some()
    }

    /// Stop polling; idempotent
    ///
    /// Must not be called from inside the listener.
    pub fn stop(&self) {
        // Taking the listener waits out a delivery in progress on another thread.
        let listener = lock(&self.listener).take();
        self.task.abort();

        if listener.is_some() {
            debug!(execution_id = %self.handle, "Poll session stopped");
        }
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollSession")
            .field("handle", &self.handle)
            .field("interval", &self.interval)
            .field("active", &self.is_active())
            .finish()
    }
}

fn lock(listener: &Mutex<Option<Listener>>) -> MutexGuard<'_, Option<Listener>> {
    listener.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn poll_loop(
    api: Arc<dyn ExecutionApi>,
    handle: JobHandle,
    interval: Duration,
    listener: Arc<Mutex<Option<Listener>>>,
) {
    loop {
        time::sleep(interval).await;

        let event = match api.fetch_status(&handle).await {
            Ok(status) => {
                debug!(execution_id = %handle, status = %status.status, "Polled status");
                PollEvent::Status(status)
            }
            Err(e) => {
                warn!(execution_id = %handle, "Status query failed: {}", e);
                PollEvent::Failed(e)
            }
        };
        let failed = matches!(event, PollEvent::Failed(_));

        let (done, handled) = oneshot::channel();
        {
            let mut guard = lock(&listener);
            let Some(on_update) = guard.as_mut() else {
                break;
            };
            on_update(event, Delivered(done));
        }

        if failed {
            break;
        }

        // Completed and dropped tokens both count as handled.
        let _ = handled.await;
        if lock(&listener).is_none() {
            break;
        }
    }
}
