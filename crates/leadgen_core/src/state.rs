use std::collections::VecDeque;

use crate::editor::{ApolloForm, ScrapeForm};
use crate::job::TrackedJob;
use crate::model::{LeadStats, ScraperConfig};
use crate::table::{LeadTable, SearchMode};
use crate::view_model::{AppViewModel, JobProgressView, LeadRowView};

pub const MAX_NOTIFICATIONS: usize = 5;
const ERROR_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Backend operations awaiting a response, other than reloads and polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Pending {
    pub starting_job: bool,
    pub bulk_analyze: bool,
    /// Number of ids sent in the outstanding bulk delete.
    pub bulk_delete: Option<usize>,
    pub export: bool,
    pub lead_ops: usize,
}

impl Pending {
    fn is_empty(&self) -> bool {
        !self.starting_job
            && !self.bulk_analyze
            && self.bulk_delete.is_none()
            && !self.export
            && self.lead_ops == 0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) table: LeadTable,
    pub(crate) stats: Option<LeadStats>,
    pub(crate) scraper_config: Option<ScraperConfig>,
    pub(crate) scrape_form: ScrapeForm,
    pub(crate) apollo_form: ApolloForm,
    pub(crate) job: Option<TrackedJob>,
    pub(crate) backend_online: Option<bool>,
    pub(crate) pending: Pending,
    notifications: VecDeque<Notification>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_mode(search_mode: SearchMode) -> Self {
        Self {
            table: LeadTable::new(search_mode),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &LeadTable {
        &self.table
    }

    pub fn job(&self) -> Option<&TrackedJob> {
        self.job.as_ref()
    }

    pub fn scrape_form(&self) -> &ScrapeForm {
        &self.scrape_form
    }

    pub fn apollo_form(&self) -> &ApolloForm {
        &self.apollo_form
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// True when no reload, job or backend operation is outstanding.
    pub fn is_idle(&self) -> bool {
        let job_settled = self.job.as_ref().map_or(true, TrackedJob::is_terminal);
        !self.table.is_loading() && job_settled && self.pending.is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        let table = &self.table;
        let rows = table
            .page_rows()
            .into_iter()
            .map(|lead| LeadRowView {
                id: lead.id.clone(),
                company_name: lead.company_name.clone(),
                contact_name: lead.contact_name.clone(),
                email: lead.email.clone(),
                industry: lead.industry.clone(),
                location: lead.location.clone(),
                score: lead.display_score(),
                tier: lead.score_tier(),
                band: lead.score_band(),
                status: lead.status,
                priority: lead.priority,
                selected: table.is_selected(&lead.id),
            })
            .collect();

        let job = self.job.as_ref().map(|tracked| {
            let snapshot = tracked.snapshot();
            let errors = snapshot.map(|job| job.errors.as_slice()).unwrap_or_default();
            JobProgressView {
                job_id: tracked.job_id().to_string(),
                kind: tracked.kind(),
                status: tracked.status(),
                processed: snapshot.map_or(0, |job| job.processed_leads),
                total: snapshot.map_or(0, |job| job.total_leads),
                percent: snapshot.map_or(0, |job| job.progress_percent()),
                error_count: errors.len(),
                error_preview: errors.iter().take(ERROR_PREVIEW_LIMIT).cloned().collect(),
                duration: snapshot
                    .map_or_else(|| "In Progress".to_string(), |job| job.duration_label()),
                last_error: tracked.last_error().map(ToOwned::to_owned),
            }
        });

        AppViewModel {
            rows,
            visible_count: table.visible().len(),
            server_total: table.server_total(),
            page: table.page(),
            page_count: table.page_count(),
            rows_per_page: table.rows_per_page(),
            summary: table.summary(),
            selected_count: table.selection().len(),
            delete_confirmation_pending: table.delete_pending(),
            loading: table.is_loading(),
            stats: self.stats.clone(),
            job,
            keywords: self.scrape_form.keywords.items().to_vec(),
            locations: self.scrape_form.locations.items().to_vec(),
            apollo_configured: self.apollo_form.is_configured(),
            backend_online: self.backend_online,
            notifications: self.notifications.iter().cloned().collect(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            level,
            message: message.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn dismiss_notification(&mut self) -> bool {
        let dismissed = self.notifications.pop_front().is_some();
        if dismissed {
            self.dirty = true;
        }
        dismissed
    }
}
