use std::collections::BTreeSet;

use crate::model::{ExportRequest, Lead, LeadId, LeadPage, LeadQuery, Priority};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const DEFAULT_FETCH_SIZE: u32 = 100;
const HIGH_QUALITY_SCORE: f64 = 70.0;

/// Where the search box is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Search text is sent as the `search` query parameter.
    #[default]
    Backend,
    /// Search text narrows the already fetched rows.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadFilter {
    pub search: String,
    pub industry: String,
    pub status: String,
    pub priority: String,
    pub location: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSummary {
    pub count: usize,
    pub high_quality: usize,
    pub high_priority: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadTable {
    leads: Vec<Lead>,
    server_total: u32,
    filter: LeadFilter,
    search_mode: SearchMode,
    fetch_size: u32,
    page: usize,
    rows_per_page: usize,
    selection: BTreeSet<LeadId>,
    confirm_delete: bool,
    issued_requests: u64,
    in_flight: Option<u64>,
}

impl Default for LeadTable {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}

impl LeadTable {
    pub fn new(search_mode: SearchMode) -> Self {
        Self {
            leads: Vec::new(),
            server_total: 0,
            filter: LeadFilter::default(),
            search_mode,
            fetch_size: DEFAULT_FETCH_SIZE,
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            selection: BTreeSet::new(),
            confirm_delete: false,
            issued_requests: 0,
            in_flight: None,
        }
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn filter(&self) -> &LeadFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut LeadFilter {
        &mut self.filter
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn server_total(&self) -> u32 {
        self.server_total
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Query for the current filter. Local search never reaches the backend.
    pub fn query(&self) -> LeadQuery {
        let search = match self.search_mode {
            SearchMode::Backend => non_empty(&self.filter.search),
            SearchMode::Local => None,
        };
        LeadQuery {
            status: non_empty(&self.filter.status),
            priority: non_empty(&self.filter.priority),
            industry: non_empty(&self.filter.industry),
            location: non_empty(&self.filter.location),
            search,
            page: Some(1),
            per_page: Some(self.fetch_size),
        }
    }

    /// Issues a new request token; only its response will be applied.
    pub fn begin_reload(&mut self) -> (u64, LeadQuery) {
        self.issued_requests += 1;
        self.in_flight = Some(self.issued_requests);
        (self.issued_requests, self.query())
    }

    fn is_latest(&self, request: u64) -> bool {
        request == self.issued_requests && self.in_flight == Some(request)
    }

    /// Replaces the collection wholesale. Returns false for stale responses.
    pub fn apply_reload(&mut self, request: u64, page: LeadPage) -> bool {
        if !self.is_latest(request) {
            return false;
        }
        self.in_flight = None;
        self.server_total = page.total;
        self.leads = page.leads;
        self.page = 0;
        true
    }

    /// Marks the latest request as finished without touching the rows.
    pub fn fail_reload(&mut self, request: u64) -> bool {
        if !self.is_latest(request) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn set_search(&mut self, text: String) {
        self.filter.search = text;
        self.page = 0;
    }

    /// Rows after the local search, in backend order.
    pub fn visible(&self) -> Vec<&Lead> {
        let needle = self.filter.search.trim();
        if self.search_mode == SearchMode::Backend || needle.is_empty() {
            return self.leads.iter().collect();
        }
        let needle_lower = needle.to_lowercase();
        self.leads
            .iter()
            .filter(|lead| matches_search(lead, needle, &needle_lower))
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn page_count(&self) -> usize {
        let rows = self.visible().len();
        rows.div_ceil(self.rows_per_page).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
        self.page = 0;
    }

    pub fn page_rows(&self) -> Vec<&Lead> {
        let start = self.page * self.rows_per_page;
        self.visible()
            .into_iter()
            .skip(start)
            .take(self.rows_per_page)
            .collect()
    }

    pub fn summary(&self) -> TableSummary {
        let visible = self.visible();
        let count = visible.len();
        let average_score = if count == 0 {
            0.0
        } else {
            visible.iter().map(|lead| lead.score).sum::<f64>() / count as f64
        };
        TableSummary {
            count,
            high_quality: visible
                .iter()
                .filter(|lead| lead.score >= HIGH_QUALITY_SCORE)
                .count(),
            high_priority: visible
                .iter()
                .filter(|lead| lead.priority == Priority::High)
                .count(),
            average_score,
        }
    }

    pub fn selection(&self) -> &BTreeSet<LeadId> {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<LeadId> {
        self.selection.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Returns true when the id ended up selected.
    pub fn toggle_selection(&mut self, id: LeadId) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    pub fn select_page(&mut self) {
        let ids: Vec<LeadId> = self.page_rows().iter().map(|lead| lead.id.clone()).collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.confirm_delete = false;
    }

    pub fn delete_pending(&self) -> bool {
        self.confirm_delete
    }

    /// Arms the delete confirmation. Returns false with nothing selected.
    pub fn request_delete(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.confirm_delete = true;
        true
    }

    /// Consumes the confirmation and yields the ids to delete.
    pub fn confirm_delete(&mut self) -> Option<Vec<LeadId>> {
        if !self.confirm_delete || self.selection.is_empty() {
            self.confirm_delete = false;
            return None;
        }
        self.confirm_delete = false;
        Some(self.selected_ids())
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    /// Export scope: the selection when present, else the active filter.
    pub fn export_request(&self) -> ExportRequest {
        if !self.selection.is_empty() {
            return ExportRequest {
                lead_ids: Some(self.selected_ids()),
                ..ExportRequest::default()
            };
        }
        ExportRequest {
            lead_ids: None,
            status: non_empty(&self.filter.status),
            priority: non_empty(&self.filter.priority),
        }
    }

    pub fn replace_lead(&mut self, lead: Lead) -> bool {
        match self.leads.iter_mut().find(|existing| existing.id == lead.id) {
            Some(existing) => {
                *existing = lead;
                true
            }
            None => false,
        }
    }

    pub fn remove_lead(&mut self, id: &str) -> bool {
        let before = self.leads.len();
        self.leads.retain(|lead| lead.id != id);
        self.selection.remove(id);
        let removed = self.leads.len() != before;
        if removed {
            self.server_total = self.server_total.saturating_sub(1);
            self.page = self.page.min(self.page_count() - 1);
        }
        removed
    }

    pub fn find(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }
}

fn contains_lower(field: Option<&str>, needle_lower: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle_lower))
}

fn matches_search(lead: &Lead, needle: &str, needle_lower: &str) -> bool {
    lead.company_name.to_lowercase().contains(needle_lower)
        || contains_lower(lead.email.as_deref(), needle_lower)
        || lead.phone.as_deref().is_some_and(|phone| phone.contains(needle))
        || contains_lower(lead.industry.as_deref(), needle_lower)
        || contains_lower(lead.location.as_deref(), needle_lower)
}
