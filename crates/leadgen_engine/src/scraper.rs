use leadgen_core::{
    Job, JobList, JobTicket, Message, ScrapeParams, ScrapePreview, ScrapePreviewParams,
    ScraperConfig,
};

use crate::client::ApiClient;
use crate::types::ApiError;

impl ApiClient {
    pub async fn start_scrape(&self, params: &ScrapeParams) -> Result<JobTicket, ApiError> {
        self.post(&["scraper", "start"], Some(params)).await
    }

    pub async fn scrape_status(&self, job_id: &str) -> Result<Job, ApiError> {
        self.get(&["scraper", "status", job_id]).await
    }

    pub async fn list_scrape_jobs(&self) -> Result<JobList, ApiError> {
        self.get(&["scraper", "jobs"]).await
    }

    pub async fn stop_scrape(&self, job_id: &str) -> Result<Message, ApiError> {
        self.post::<(), _>(&["scraper", "stop", job_id], None).await
    }

    pub async fn preview_scrape(
        &self,
        params: &ScrapePreviewParams,
    ) -> Result<ScrapePreview, ApiError> {
        self.post(&["scraper", "preview"], Some(params)).await
    }

    pub async fn scraper_config(&self) -> Result<ScraperConfig, ApiError> {
        self.get(&["scraper", "config"]).await
    }
}
