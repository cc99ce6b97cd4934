use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use leadgen_core::{Job, JobId, JobKind, JobStatus};
use leadgen_logging::{leadgen_debug, leadgen_info, leadgen_warn, POLL_TARGET};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::jobs::JobStatusSource;
use crate::types::ApiError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Receives poller notifications. Called from the runtime's worker threads.
pub trait JobCallbacks: Send + Sync {
    fn on_progress(&self, job: &Job);
    fn on_poll_error(&self, job_id: &str, error: &ApiError);
    fn on_completed(&self, job: &Job);
    /// Failed or stopped.
    fn on_failed(&self, job: &Job);
    fn on_close(&self, job_id: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(Job),
    Failed(Job),
    Closed,
}

/// Serializes callback delivery against `close`: once closed, nothing is delivered.
struct DeliveryGate {
    open: Mutex<bool>,
}

impl DeliveryGate {
    fn new() -> Self {
        Self {
            open: Mutex::new(true),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        match self.open.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn deliver(&self, callback: impl FnOnce()) -> bool {
        let open = self.lock();
        if *open {
            callback();
        }
        *open
    }

    fn close(&self, callback: impl FnOnce()) -> bool {
        let mut open = self.lock();
        if !*open {
            return false;
        }
        *open = false;
        callback();
        true
    }
}

/// Periodic status checks for one job until it reaches a terminal state.
///
/// The first check runs immediately, later ones on a fixed interval. At most
/// one check is in flight. Terminal callbacks fire exactly once.
pub struct JobPoller {
    job_id: JobId,
    cancel: CancellationToken,
    gate: Arc<DeliveryGate>,
    callbacks: Arc<dyn JobCallbacks>,
    task: JoinHandle<PollOutcome>,
}

impl JobPoller {
    /// Starts polling on the current tokio runtime.
    pub fn spawn(
        source: Arc<dyn JobStatusSource>,
        kind: JobKind,
        job_id: JobId,
        interval: Duration,
        callbacks: Arc<dyn JobCallbacks>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let gate = Arc::new(DeliveryGate::new());
        let task = tokio::spawn(poll_loop(PollLoop {
            source,
            kind,
            job_id: job_id.clone(),
            interval: interval.max(MIN_POLL_INTERVAL),
            callbacks: callbacks.clone(),
            gate: gate.clone(),
            cancel: cancel.clone(),
        }));

        Self {
            job_id,
            cancel,
            gate,
            callbacks,
            task,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the schedule and any in-flight check, then reports `on_close` once.
    pub fn close(&self) {
        self.cancel.cancel();
        let closed = self.gate.close(|| self.callbacks.on_close(&self.job_id));
        if closed {
            leadgen_debug!(target: POLL_TARGET, "Closed poller for job {}", self.job_id);
        }
    }

    /// Waits for the polling task to end.
    pub async fn finished(mut self) -> PollOutcome {
        match (&mut self.task).await {
            Ok(outcome) => outcome,
            Err(err) => {
                leadgen_warn!(
                    target: POLL_TARGET,
                    "Poller for job {} aborted: {}",
                    self.job_id,
                    err
                );
                PollOutcome::Closed
            }
        }
    }
}

// A dropped poller stops polling without reporting `on_close`.
impl Drop for JobPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct PollLoop {
    source: Arc<dyn JobStatusSource>,
    kind: JobKind,
    job_id: JobId,
    interval: Duration,
    callbacks: Arc<dyn JobCallbacks>,
    gate: Arc<DeliveryGate>,
    cancel: CancellationToken,
}

async fn poll_loop(ctx: PollLoop) -> PollOutcome {
    let PollLoop {
        source,
        kind,
        job_id,
        interval,
        callbacks,
        gate,
        cancel,
    } = ctx;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Closed,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return PollOutcome::Closed,
            fetched = source.job_status(kind, &job_id) => fetched,
        };

        match fetched {
            Ok(job) => match job.status {
                JobStatus::Completed => {
                    if !gate.deliver(|| callbacks.on_completed(&job)) {
                        return PollOutcome::Closed;
                    }
                    leadgen_info!(
                        target: POLL_TARGET,
                        "{} job {} completed ({} leads)",
                        kind.label(),
                        job_id,
                        job.processed_leads
                    );
                    return PollOutcome::Completed(job);
                }
                JobStatus::Failed | JobStatus::Stopped => {
                    if !gate.deliver(|| callbacks.on_failed(&job)) {
                        return PollOutcome::Closed;
                    }
                    leadgen_info!(
                        target: POLL_TARGET,
                        "{} job {} ended as {}",
                        kind.label(),
                        job_id,
                        job.status
                    );
                    return PollOutcome::Failed(job);
                }
                JobStatus::Pending | JobStatus::Running | JobStatus::Unknown => {
                    leadgen_debug!(
                        target: POLL_TARGET,
                        "Job {} is {} ({}/{})",
                        job_id,
                        job.status,
                        job.processed_leads,
                        job.total_leads
                    );
                    gate.deliver(|| callbacks.on_progress(&job));
                }
            },
            Err(err) => {
                leadgen_warn!(
                    target: POLL_TARGET,
                    "Status check for job {} failed: {}",
                    job_id,
                    err
                );
                gate.deliver(|| callbacks.on_poll_error(&job_id, &err));
            }
        }
    }
}
