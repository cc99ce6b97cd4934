use crate::model::{Job, JobId, JobKind, JobStatus};

/// Client-side view of the job currently shown to the user.
///
/// Snapshots only ever come from the backend. Once a terminal snapshot has
/// been recorded the tracker is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedJob {
    job_id: JobId,
    kind: JobKind,
    snapshot: Option<Job>,
    last_error: Option<String>,
}

impl TrackedJob {
    pub fn new(kind: JobKind, job_id: JobId) -> Self {
        Self {
            job_id,
            kind,
            snapshot: None,
            last_error: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn snapshot(&self) -> Option<&Job> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> Option<JobStatus> {
        self.snapshot.as_ref().map(|job| job.status)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_some_and(JobStatus::is_terminal)
    }

    /// Records a snapshot for this job. Returns false when the snapshot
    /// belongs to another job or the job already reached a terminal state.
    pub fn apply(&mut self, job: Job) -> bool {
        if job.id != self.job_id || self.is_terminal() {
            return false;
        }
        self.snapshot = Some(job);
        self.last_error = None;
        true
    }

    pub fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }
}
