use leadgen_core::{
    BulkAnalyzeResult, BulkDeleteResult, Lead, LeadAnalysis, LeadId, LeadPage, LeadQuery,
    LeadStats, LeadUpdate, Message, NewLead,
};
use serde::Serialize;

use crate::client::ApiClient;
use crate::query::QueryBuilder;
use crate::types::ApiError;

#[derive(Serialize)]
struct LeadIds<'a> {
    lead_ids: &'a [LeadId],
}

impl ApiClient {
    pub async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, ApiError> {
        self.get_with_query(&["leads"], &QueryBuilder::from(query)).await
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead, ApiError> {
        self.get(&["leads", id]).await
    }

    pub async fn create_lead(&self, lead: &NewLead) -> Result<Lead, ApiError> {
        self.post(&["leads"], Some(lead)).await
    }

    /// Partial update; only fields set in `update` are sent.
    pub async fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Lead, ApiError> {
        self.put(&["leads", id], update).await
    }

    pub async fn delete_lead(&self, id: &str) -> Result<Message, ApiError> {
        self.delete(&["leads", id]).await
    }

    pub async fn analyze_lead(&self, id: &str) -> Result<LeadAnalysis, ApiError> {
        self.post::<(), _>(&["leads", id, "analyze"], None).await
    }

    pub async fn bulk_analyze(&self, lead_ids: &[LeadId]) -> Result<BulkAnalyzeResult, ApiError> {
        self.post(&["leads", "bulk-analyze"], Some(&LeadIds { lead_ids })).await
    }

    /// Ids unknown to the backend are reported in `not_found`, not as an error.
    pub async fn bulk_delete(&self, lead_ids: &[LeadId]) -> Result<BulkDeleteResult, ApiError> {
        self.post(&["leads", "bulk-delete"], Some(&LeadIds { lead_ids })).await
    }

    pub async fn lead_stats(&self) -> Result<LeadStats, ApiError> {
        self.get(&["leads", "stats"]).await
    }
}
