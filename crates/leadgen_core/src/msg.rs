use crate::editor::FormEdit;
use crate::model::{
    ApolloConfig, BulkAnalyzeResult, BulkDeleteResult, ExportResult, HealthStatus, Job, JobId,
    JobKind, JobTicket, Lead, LeadAnalysis, LeadId, LeadPage, LeadStats, LeadStatus,
    ScraperConfig,
};

/// Inputs to [`crate::update`]: user actions and backend results.
///
/// Backend failures arrive as the error's display text.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// View mounted; load configuration, statistics and the first page.
    Initialize,
    HealthChecked(Result<HealthStatus, String>),
    ScraperConfigLoaded(Result<ScraperConfig, String>),
    ApolloConfigLoaded(Result<ApolloConfig, String>),

    /// User edited the search box.
    SearchChanged(String),
    IndustryFilterChanged(String),
    StatusFilterChanged(String),
    PriorityFilterChanged(String),
    PageChanged(usize),
    RowsPerPageChanged(usize),
    ReloadClicked,
    LeadsLoaded {
        request: u64,
        result: Result<LeadPage, String>,
    },
    StatsLoaded(Result<LeadStats, String>),

    SelectionToggled(LeadId),
    /// Select every row on the current page.
    PageSelected,
    SelectionCleared,

    BulkAnalyzeClicked,
    BulkAnalyzeFinished(Result<BulkAnalyzeResult, String>),
    BulkDeleteClicked,
    BulkDeleteConfirmed,
    BulkDeleteCancelled,
    BulkDeleteFinished(Result<BulkDeleteResult, String>),
    ExportClicked,
    /// `download_url` in the result is already absolute.
    ExportFinished(Result<ExportResult, String>),

    LeadStatusChanged { id: LeadId, status: LeadStatus },
    LeadUpdated(Result<Lead, String>),
    LeadDeleteClicked(LeadId),
    LeadDeleted {
        id: LeadId,
        result: Result<(), String>,
    },
    AnalyzeLeadClicked(LeadId),
    LeadAnalyzed(Result<LeadAnalysis, String>),

    ScrapeFormEdited(FormEdit),
    ApolloFormEdited(FormEdit),
    ScrapeSubmitted,
    ApolloSubmitted,
    JobStarted {
        kind: JobKind,
        result: Result<JobTicket, String>,
    },
    /// Non-terminal status observed by the poller.
    JobProgress(Job),
    JobPollFailed { job_id: JobId, message: String },
    JobCompleted(Job),
    /// Failed or stopped.
    JobFailed(Job),
    StopJobClicked,
    JobStopRequested(Result<(), String>),
    CloseJobClicked,
    /// Poller acknowledged the close.
    JobClosed { job_id: JobId },

    NotificationDismissed,
    /// Render tick to coalesce rendering.
    Tick,
    NoOp,
}
