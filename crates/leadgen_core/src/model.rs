//! Records exchanged with the lead generation backend.
//!
//! Status and priority strings are closed enums with an `Unknown` fallback so
//! that values added on the backend later still deserialize.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::score::{score_band, score_tier, ScoreBand, ScoreTier};

pub type LeadId = String;
pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
    #[serde(other)]
    Unknown,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
            LeadStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub score: f64,
    pub priority: String,
    pub fit_assessment: String,
    pub reasoning: String,
    pub industry_relevance: f64,
    pub potential_value: String,
    pub recommended_products: Vec<String>,
    pub talking_points: Vec<String>,
    pub next_steps: Vec<String>,
    pub risk_factors: Vec<String>,
    pub confidence_level: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub company_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub annual_revenue: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_contacted: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub estimated_value: f64,
}

impl Lead {
    /// Score rounded and clamped into 0..=100 for display.
    pub fn display_score(&self) -> u8 {
        if self.score.is_nan() {
            return 0;
        }
        self.score.clamp(0.0, 100.0).round() as u8
    }

    pub fn score_tier(&self) -> ScoreTier {
        score_tier(self.score)
    }

    pub fn score_band(&self) -> ScoreBand {
        score_band(self.score)
    }
}

/// One page of `GET /leads`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadStats {
    pub total_leads: u32,
    pub by_status: BTreeMap<String, u32>,
    pub by_priority: BTreeMap<String, u32>,
    pub total_estimated_value: f64,
    pub average_score: f64,
    pub top_industries: BTreeMap<String, u32>,
    pub new_this_month: u32,
    pub high_priority_count: u32,
}

/// Query parameters for `GET /leads`. Absent and empty values are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NewLead {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Partial update for `PUT /leads/{id}`; only set fields are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LeadUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeadAnalysis {
    pub lead_id: LeadId,
    #[serde(default)]
    pub analysis: AiAnalysis,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkAnalyzeResult {
    pub results: Vec<serde_json::Value>,
    pub total_processed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkDeleteResult {
    #[serde(alias = "deleted")]
    pub deleted_count: u32,
    pub not_found: Vec<LeadId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Completed, failed and stopped jobs never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Stopped => "stopped",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend job family a job id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Scrape,
    Apollo,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            JobKind::Scrape => "scraping",
            JobKind::Apollo => "apollo",
        }
    }
}

/// Snapshot of a backend job as returned by its status endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub total_leads: u32,
    #[serde(default)]
    pub processed_leads: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Echo of the launch request; scrape and Apollo jobs differ in shape.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl Job {
    pub fn progress_percent(&self) -> u8 {
        if self.total_leads == 0 {
            return 0;
        }
        let ratio = f64::from(self.processed_leads) / f64::from(self.total_leads);
        (ratio * 100.0).round().min(100.0) as u8
    }

    pub fn duration(&self) -> Option<TimeDelta> {
        let started = parse_timestamp(self.started_at.as_deref()?)?;
        let completed = parse_timestamp(self.completed_at.as_deref()?)?;
        Some(completed - started)
    }

    /// Human-readable run time, `In Progress` until the job has completed.
    pub fn duration_label(&self) -> String {
        if self.completed_at.is_none() {
            return "In Progress".to_string();
        }
        match self.duration() {
            Some(delta) => format_duration(delta),
            None => "Unknown".to_string(),
        }
    }
}

fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_milliseconds().max(0) as f64 / 1000.0;
    let secs = secs.round() as i64;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", (secs as f64 / 60.0).round() as i64)
    } else {
        let hours = secs / 3600;
        let minutes = ((secs % 3600) as f64 / 60.0).round() as i64;
        format!("{hours}h {minutes}m")
    }
}

/// Accepts RFC 3339 and the naive ISO timestamps the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Response to a job start call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: JobId,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobList {
    pub jobs: Vec<Job>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScrapeParams {
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub max_leads: u32,
    pub sources: Vec<String>,
    pub analyze_with_ai: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScrapePreviewParams {
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub max_leads: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapePreview {
    pub preview_leads: Vec<serde_json::Value>,
    pub total_found: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub target_industries: Vec<String>,
    pub target_locations: Vec<String>,
    pub max_leads_per_run: u32,
    pub scraping_delay: f64,
    pub available_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApolloSearchType {
    #[default]
    People,
    Organizations,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ApolloGenerateParams {
    pub search_type: ApolloSearchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_industries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    pub max_leads: u32,
    pub analyze_with_ai: bool,
    pub save_leads: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ApolloSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_industries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ApolloEnrichParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApolloFilters {
    pub person_titles: Vec<String>,
    pub industries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApolloConfig {
    pub is_configured: bool,
    pub target_locations: Vec<String>,
    pub available_filters: ApolloFilters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn path_segment(self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Body of an export request: explicit ids, or a status/priority filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_ids: Option<Vec<LeadId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportResult {
    pub filename: String,
    pub filepath: String,
    pub total_exported: u32,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFileList {
    pub files: Vec<serde_json::Value>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_statuses_fall_back() {
        let job: Job = serde_json::from_str(r#"{"id":"j1","status":"queued"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert!(!job.status.is_terminal());

        let lead: Lead = serde_json::from_str(
            r#"{"id":"l1","company_name":"Acme","status":"archived","priority":"urgent"}"#,
        )
        .unwrap();
        assert_eq!(lead.status, LeadStatus::Unknown);
        assert_eq!(lead.priority, Priority::Unknown);
    }

    #[test]
    fn progress_percent_handles_zero_total() {
        let mut job = Job {
            id: "j".into(),
            status: JobStatus::Running,
            ..Job::default()
        };
        assert_eq!(job.progress_percent(), 0);
        job.total_leads = 10;
        job.processed_leads = 3;
        assert_eq!(job.progress_percent(), 30);
        job.processed_leads = 12;
        assert_eq!(job.progress_percent(), 100);
    }

    #[test]
    fn duration_label_formats_ranges() {
        let mut job = Job {
            id: "j".into(),
            status: JobStatus::Completed,
            started_at: Some("2024-11-05T10:00:00Z".into()),
            ..Job::default()
        };
        assert_eq!(job.duration_label(), "In Progress");

        job.completed_at = Some("2024-11-05T10:00:42Z".into());
        assert_eq!(job.duration_label(), "42s");

        job.completed_at = Some("2024-11-05T10:05:00".into());
        assert_eq!(job.duration_label(), "5m");

        job.completed_at = Some("2024-11-05T11:30:00.250000".into());
        assert_eq!(job.duration_label(), "1h 30m");
    }

    #[test]
    fn display_score_is_clamped() {
        let mut lead = Lead {
            score: 134.6,
            ..Lead::default()
        };
        assert_eq!(lead.display_score(), 100);
        lead.score = -3.0;
        assert_eq!(lead.display_score(), 0);
        lead.score = 71.5;
        assert_eq!(lead.display_score(), 72);
    }
}
