use crate::model::{JobId, JobKind, JobStatus, LeadId, LeadStats, LeadStatus, Priority};
use crate::score::{ScoreBand, ScoreTier};
use crate::state::Notification;
use crate::table::TableSummary;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub rows: Vec<LeadRowView>,
    pub visible_count: usize,
    pub server_total: u32,
    pub page: usize,
    pub page_count: usize,
    pub rows_per_page: usize,
    pub summary: TableSummary,
    pub selected_count: usize,
    pub delete_confirmation_pending: bool,
    pub loading: bool,
    pub stats: Option<LeadStats>,
    pub job: Option<JobProgressView>,
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub apollo_configured: bool,
    pub backend_online: Option<bool>,
    pub notifications: Vec<Notification>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRowView {
    pub id: LeadId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub score: u8,
    pub tier: ScoreTier,
    pub band: ScoreBand,
    pub status: LeadStatus,
    pub priority: Priority,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgressView {
    pub job_id: JobId,
    pub kind: JobKind,
    /// None until the first status check returns.
    pub status: Option<JobStatus>,
    pub processed: u32,
    pub total: u32,
    pub percent: u8,
    pub error_count: usize,
    pub error_preview: Vec<String>,
    pub duration: String,
    pub last_error: Option<String>,
}
