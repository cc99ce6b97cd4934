use crate::model::{
    ApolloGenerateParams, ExportFormat, ExportRequest, JobId, JobKind, LeadId, LeadQuery,
    LeadUpdate, ScrapeParams,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CheckHealth,
    LoadScraperConfig,
    LoadApolloConfig,
    LoadLeads { request: u64, query: LeadQuery },
    LoadStats,
    StartScrape(ScrapeParams),
    StartApollo(ApolloGenerateParams),
    WatchJob { kind: JobKind, job_id: JobId },
    CloseJob { job_id: JobId },
    StopJob { kind: JobKind, job_id: JobId },
    BulkAnalyze { lead_ids: Vec<LeadId> },
    BulkDelete { lead_ids: Vec<LeadId> },
    UpdateLead { id: LeadId, update: LeadUpdate },
    DeleteLead { id: LeadId },
    AnalyzeLead { id: LeadId },
    Export { format: ExportFormat, request: ExportRequest },
    /// Open a download in a new browsing context.
    OpenUrl(String),
}
