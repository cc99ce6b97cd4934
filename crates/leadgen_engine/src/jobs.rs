use async_trait::async_trait;
use leadgen_core::{Job, JobKind, Message};
use leadgen_logging::leadgen_debug;

use crate::client::ApiClient;
use crate::types::ApiError;

/// Source of job snapshots for the poller.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, kind: JobKind, job_id: &str) -> Result<Job, ApiError>;
}

impl ApiClient {
    pub async fn job_status(&self, kind: JobKind, job_id: &str) -> Result<Job, ApiError> {
        match kind {
            JobKind::Scrape => self.scrape_status(job_id).await,
            JobKind::Apollo => self.apollo_status(job_id).await,
        }
    }

    /// The backend has a single stop endpoint shared by both job families.
    pub async fn stop_job(&self, kind: JobKind, job_id: &str) -> Result<Message, ApiError> {
        if kind == JobKind::Apollo {
            leadgen_debug!("Stopping Apollo job {} via the scraper endpoint", job_id);
        }
        self.stop_scrape(job_id).await
    }
}

#[async_trait]
impl JobStatusSource for ApiClient {
    async fn job_status(&self, kind: JobKind, job_id: &str) -> Result<Job, ApiError> {
        ApiClient::job_status(self, kind, job_id).await
    }
}
