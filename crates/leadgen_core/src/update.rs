use leadgen_logging::{leadgen_debug, leadgen_info, leadgen_warn};

use crate::job::TrackedJob;
use crate::model::{ExportFormat, JobKind, JobStatus, LeadUpdate};
use crate::state::NotificationLevel;
use crate::table::SearchMode;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize => vec![
            Effect::CheckHealth,
            Effect::LoadScraperConfig,
            Effect::LoadApolloConfig,
            Effect::LoadStats,
            reload(&mut state),
        ],
        Msg::HealthChecked(result) => {
            match result {
                Ok(health) => {
                    leadgen_info!(
                        "Backend {} is {} (version {})",
                        health.service,
                        health.status,
                        health.version
                    );
                    state.backend_online = Some(true);
                    state.mark_dirty();
                }
                Err(message) => {
                    state.backend_online = Some(false);
                    state.notify(NotificationLevel::Error, message);
                }
            }
            Vec::new()
        }
        Msg::ScraperConfigLoaded(result) => {
            match result {
                Ok(config) => {
                    state.scrape_form.prefill(&config);
                    state.scraper_config = Some(config);
                    state.mark_dirty();
                }
                Err(message) => leadgen_warn!("Failed to load scraper config: {}", message),
            }
            Vec::new()
        }
        Msg::ApolloConfigLoaded(result) => {
            match result {
                Ok(config) => {
                    state.apollo_form.prefill(&config);
                    state.mark_dirty();
                }
                Err(message) => leadgen_warn!("Failed to load Apollo config: {}", message),
            }
            Vec::new()
        }
        Msg::SearchChanged(text) => {
            state.table.set_search(text);
            state.mark_dirty();
            match state.table.search_mode() {
                SearchMode::Backend => vec![reload(&mut state)],
                SearchMode::Local => Vec::new(),
            }
        }
        Msg::IndustryFilterChanged(value) => {
            state.table.filter_mut().industry = value;
            vec![reload(&mut state)]
        }
        Msg::StatusFilterChanged(value) => {
            state.table.filter_mut().status = value;
            vec![reload(&mut state)]
        }
        Msg::PriorityFilterChanged(value) => {
            state.table.filter_mut().priority = value;
            vec![reload(&mut state)]
        }
        Msg::PageChanged(page) => {
            state.table.set_page(page);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RowsPerPageChanged(rows) => {
            state.table.set_rows_per_page(rows);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ReloadClicked => vec![reload(&mut state)],
        Msg::LeadsLoaded { request, result } => {
            match result {
                Ok(page) => {
                    if state.table.apply_reload(request, page) {
                        state.mark_dirty();
                    } else {
                        leadgen_debug!("Discarding stale lead page for request {}", request);
                    }
                }
                Err(message) => {
                    // The previous rows stay on screen.
                    if state.table.fail_reload(request) {
                        state.notify(NotificationLevel::Error, message);
                    }
                }
            }
            Vec::new()
        }
        Msg::StatsLoaded(result) => {
            match result {
                Ok(stats) => {
                    state.stats = Some(stats);
                    state.mark_dirty();
                }
                Err(message) => state.notify(NotificationLevel::Error, message),
            }
            Vec::new()
        }
        Msg::SelectionToggled(id) => {
            state.table.toggle_selection(id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PageSelected => {
            state.table.select_page();
            state.mark_dirty();
            Vec::new()
        }
        Msg::SelectionCleared => {
            state.table.clear_selection();
            state.mark_dirty();
            Vec::new()
        }
        Msg::BulkAnalyzeClicked => {
            if state.pending.bulk_analyze {
                Vec::new()
            } else if state.table.selection().is_empty() {
                state.notify(NotificationLevel::Info, "Select at least one lead to analyze");
                Vec::new()
            } else {
                state.pending.bulk_analyze = true;
                state.mark_dirty();
                vec![Effect::BulkAnalyze {
                    lead_ids: state.table.selected_ids(),
                }]
            }
        }
        Msg::BulkAnalyzeFinished(result) => {
            state.pending.bulk_analyze = false;
            match result {
                Ok(outcome) => {
                    state.notify(
                        NotificationLevel::Success,
                        format!("Analyzed {} leads", outcome.total_processed),
                    );
                    vec![reload(&mut state)]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::BulkDeleteClicked => {
            if state.table.request_delete() {
                state.mark_dirty();
            } else {
                state.notify(NotificationLevel::Info, "Select at least one lead to delete");
            }
            Vec::new()
        }
        Msg::BulkDeleteConfirmed => {
            if state.pending.bulk_delete.is_some() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.table.confirm_delete() {
                Some(lead_ids) => {
                    state.pending.bulk_delete = Some(lead_ids.len());
                    vec![Effect::BulkDelete { lead_ids }]
                }
                None => Vec::new(),
            }
        }
        Msg::BulkDeleteCancelled => {
            state.table.cancel_delete();
            state.mark_dirty();
            Vec::new()
        }
        Msg::BulkDeleteFinished(result) => {
            let requested = state.pending.bulk_delete.take().unwrap_or_default();
            match result {
                Ok(outcome) => {
                    let deleted = outcome.deleted_count as usize;
                    let message = if deleted < requested {
                        format!("Deleted {deleted} of {requested} leads")
                    } else {
                        format!("Deleted {deleted} leads")
                    };
                    state.table.clear_selection();
                    state.notify(NotificationLevel::Success, message);
                    vec![reload(&mut state), Effect::LoadStats]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::ExportClicked => {
            if state.pending.export {
                Vec::new()
            } else {
                state.pending.export = true;
                state.mark_dirty();
                vec![Effect::Export {
                    format: ExportFormat::Excel,
                    request: state.table.export_request(),
                }]
            }
        }
        Msg::ExportFinished(result) => {
            state.pending.export = false;
            match result {
                Ok(export) => {
                    state.notify(
                        NotificationLevel::Success,
                        format!(
                            "Exported {} leads to {}",
                            export.total_exported, export.filename
                        ),
                    );
                    vec![Effect::OpenUrl(export.download_url)]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::LeadStatusChanged { id, status } => {
            state.pending.lead_ops += 1;
            vec![Effect::UpdateLead {
                id,
                update: LeadUpdate {
                    status: Some(status),
                    ..LeadUpdate::default()
                },
            }]
        }
        Msg::LeadUpdated(result) => {
            state.pending.lead_ops = state.pending.lead_ops.saturating_sub(1);
            match result {
                Ok(lead) => {
                    let company = lead.company_name.clone();
                    if state.table.replace_lead(lead) {
                        state.mark_dirty();
                    }
                    state.notify(NotificationLevel::Success, format!("Updated {company}"));
                    vec![Effect::LoadStats]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::LeadDeleteClicked(id) => {
            state.pending.lead_ops += 1;
            vec![Effect::DeleteLead { id }]
        }
        Msg::LeadDeleted { id, result } => {
            state.pending.lead_ops = state.pending.lead_ops.saturating_sub(1);
            match result {
                Ok(()) => {
                    state.table.remove_lead(&id);
                    state.notify(NotificationLevel::Success, "Lead deleted");
                    vec![Effect::LoadStats]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::AnalyzeLeadClicked(id) => {
            state.pending.lead_ops += 1;
            vec![Effect::AnalyzeLead { id }]
        }
        Msg::LeadAnalyzed(result) => {
            state.pending.lead_ops = state.pending.lead_ops.saturating_sub(1);
            match result {
                Ok(analysis) => {
                    state.notify(
                        NotificationLevel::Success,
                        format!(
                            "AI analysis complete for {} (score {:.0})",
                            analysis.lead_id, analysis.analysis.score
                        ),
                    );
                    vec![reload(&mut state)]
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::ScrapeFormEdited(edit) => {
            if state.scrape_form.apply(edit) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ApolloFormEdited(edit) => {
            if state.apollo_form.apply(edit) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ScrapeSubmitted => {
            if !can_start_job(&mut state) {
                return (state, Vec::new());
            }
            match state.scrape_form.submit() {
                Ok(params) => {
                    state.pending.starting_job = true;
                    state.mark_dirty();
                    vec![Effect::StartScrape(params)]
                }
                Err(err) => {
                    state.notify(NotificationLevel::Error, err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::ApolloSubmitted => {
            if !can_start_job(&mut state) {
                return (state, Vec::new());
            }
            match state.apollo_form.submit() {
                Ok(params) => {
                    state.pending.starting_job = true;
                    state.mark_dirty();
                    vec![Effect::StartApollo(params)]
                }
                Err(err) => {
                    state.notify(NotificationLevel::Error, err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::JobStarted { kind, result } => {
            state.pending.starting_job = false;
            match result {
                Ok(ticket) => {
                    let mut effects = Vec::with_capacity(2);
                    if let Some(previous) = state.job.take() {
                        effects.push(Effect::CloseJob {
                            job_id: previous.job_id().to_string(),
                        });
                    }
                    let started = match kind {
                        JobKind::Scrape => "Scraping job started",
                        JobKind::Apollo => "Lead generation started",
                    };
                    state.notify(
                        NotificationLevel::Success,
                        format!("{started}: {}", ticket.job_id),
                    );
                    state.job = Some(TrackedJob::new(kind, ticket.job_id.clone()));
                    effects.push(Effect::WatchJob {
                        kind,
                        job_id: ticket.job_id,
                    });
                    effects
                }
                Err(message) => {
                    state.notify(NotificationLevel::Error, message);
                    Vec::new()
                }
            }
        }
        Msg::JobProgress(job) => {
            if let Some(tracked) = state.job.as_mut() {
                if tracked.apply(job) {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::JobPollFailed { job_id, message } => {
            let Some(tracked) = state.job.as_mut() else {
                return (state, Vec::new());
            };
            if tracked.job_id() != job_id || tracked.is_terminal() {
                return (state, Vec::new());
            }
            tracked.record_error(message.clone());
            state.notify(NotificationLevel::Error, message);
            Vec::new()
        }
        Msg::JobCompleted(job) => {
            let processed = job.processed_leads;
            let applied = state
                .job
                .as_mut()
                .is_some_and(|tracked| tracked.apply(job));
            if applied {
                state.notify(
                    NotificationLevel::Success,
                    format!("Job completed: {processed} leads processed"),
                );
                vec![reload(&mut state), Effect::LoadStats]
            } else {
                Vec::new()
            }
        }
        Msg::JobFailed(job) => {
            let message = match job.status {
                JobStatus::Stopped => "Job stopped".to_string(),
                _ => match job.errors.first() {
                    Some(first) => format!("Job failed: {first}"),
                    None => "Job failed".to_string(),
                },
            };
            let applied = state
                .job
                .as_mut()
                .is_some_and(|tracked| tracked.apply(job));
            if applied {
                state.notify(NotificationLevel::Error, message);
            }
            Vec::new()
        }
        Msg::StopJobClicked => match state.job.as_ref() {
            Some(tracked) if !tracked.is_terminal() => vec![Effect::StopJob {
                kind: tracked.kind(),
                job_id: tracked.job_id().to_string(),
            }],
            _ => Vec::new(),
        },
        Msg::JobStopRequested(result) => {
            match result {
                Ok(()) => state.notify(NotificationLevel::Info, "Stop requested"),
                Err(message) => state.notify(NotificationLevel::Error, message),
            }
            Vec::new()
        }
        Msg::CloseJobClicked => match state.job.take() {
            Some(tracked) => {
                state.mark_dirty();
                vec![Effect::CloseJob {
                    job_id: tracked.job_id().to_string(),
                }]
            }
            None => Vec::new(),
        },
        Msg::JobClosed { job_id } => {
            leadgen_debug!("Job {} closed", job_id);
            Vec::new()
        }
        Msg::NotificationDismissed => {
            state.dismiss_notification();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn reload(state: &mut AppState) -> Effect {
    let (request, query) = state.table.begin_reload();
    state.mark_dirty();
    Effect::LoadLeads { request, query }
}

/// One job at a time: a start is refused while another is in flight.
fn can_start_job(state: &mut AppState) -> bool {
    let running = state.job.as_ref().is_some_and(|job| !job.is_terminal());
    if state.pending.starting_job || running {
        state.notify(NotificationLevel::Error, "A job is already running");
        return false;
    }
    true
}
