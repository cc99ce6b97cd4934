use leadgen_core::{
    ApolloConfig, ApolloEnrichParams, ApolloGenerateParams, ApolloSearchParams, Job, JobList,
    JobTicket,
};
use serde_json::Value;

use crate::client::ApiClient;
use crate::types::ApiError;

impl ApiClient {
    /// Raw Apollo people search; the result shape is owned by Apollo.
    pub async fn search_people(&self, params: &ApolloSearchParams) -> Result<Value, ApiError> {
        self.post(&["apollo", "search", "people"], Some(params)).await
    }

    pub async fn search_organizations(
        &self,
        params: &ApolloSearchParams,
    ) -> Result<Value, ApiError> {
        self.post(&["apollo", "search", "organizations"], Some(params)).await
    }

    pub async fn generate_apollo_leads(
        &self,
        params: &ApolloGenerateParams,
    ) -> Result<JobTicket, ApiError> {
        self.post(&["apollo", "generate"], Some(params)).await
    }

    pub async fn apollo_status(&self, job_id: &str) -> Result<Job, ApiError> {
        self.get(&["apollo", "status", job_id]).await
    }

    pub async fn list_apollo_jobs(&self) -> Result<JobList, ApiError> {
        self.get(&["apollo", "jobs"]).await
    }

    pub async fn enrich(&self, params: &ApolloEnrichParams) -> Result<Value, ApiError> {
        self.post(&["apollo", "enrich"], Some(params)).await
    }

    pub async fn apollo_config(&self) -> Result<ApolloConfig, ApiError> {
        self.get(&["apollo", "config"]).await
    }
}
