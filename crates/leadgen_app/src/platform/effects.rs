use std::io;
use std::time::Duration;

use leadgen_core::{Effect, Msg};
use leadgen_engine::{ApiError, ApiSettings, EngineCommand, EngineEvent, EngineHandle};
use leadgen_logging::{leadgen_debug, leadgen_info, leadgen_warn};

/// Executes effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings) -> io::Result<Self> {
        leadgen_info!("Using backend at {}", settings.base_url);
        let engine = EngineHandle::new(settings)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match to_command(effect) {
                Ok(command) => {
                    leadgen_debug!("Submitting {:?}", command);
                    self.engine.submit(command);
                }
                Err(url) => leadgen_info!("Download ready: {}", url),
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(to_msg)
    }

    /// Drains events that are already waiting.
    pub fn pending_msgs(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(to_msg)
            .collect()
    }
}

/// Maps an effect onto an engine command; `OpenUrl` has no engine counterpart.
fn to_command(effect: Effect) -> Result<EngineCommand, String> {
    let command = match effect {
        Effect::CheckHealth => EngineCommand::CheckHealth,
        Effect::LoadScraperConfig => EngineCommand::LoadScraperConfig,
        Effect::LoadApolloConfig => EngineCommand::LoadApolloConfig,
        Effect::LoadLeads { request, query } => EngineCommand::LoadLeads { request, query },
        Effect::LoadStats => EngineCommand::LoadStats,
        Effect::StartScrape(params) => EngineCommand::StartScrape(params),
        Effect::StartApollo(params) => EngineCommand::StartApollo(params),
        Effect::WatchJob { kind, job_id } => EngineCommand::WatchJob { kind, job_id },
        Effect::CloseJob { job_id } => EngineCommand::CloseJob { job_id },
        Effect::StopJob { kind, job_id } => EngineCommand::StopJob { kind, job_id },
        Effect::BulkAnalyze { lead_ids } => EngineCommand::BulkAnalyze { lead_ids },
        Effect::BulkDelete { lead_ids } => EngineCommand::BulkDelete { lead_ids },
        Effect::UpdateLead { id, update } => EngineCommand::UpdateLead { id, update },
        Effect::DeleteLead { id } => EngineCommand::DeleteLead { id },
        Effect::AnalyzeLead { id } => EngineCommand::AnalyzeLead { id },
        Effect::Export { format, request } => EngineCommand::Export { format, request },
        Effect::OpenUrl(url) => return Err(url),
    };
    Ok(command)
}

fn describe(err: ApiError) -> String {
    leadgen_warn!("Backend call failed: {} ({})", err.message, err.kind);
    err.message
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Health(result) => Msg::HealthChecked(result.map_err(describe)),
        EngineEvent::ScraperConfig(result) => Msg::ScraperConfigLoaded(result.map_err(describe)),
        EngineEvent::ApolloConfig(result) => Msg::ApolloConfigLoaded(result.map_err(describe)),
        EngineEvent::Leads { request, result } => Msg::LeadsLoaded {
            request,
            result: result.map_err(describe),
        },
        EngineEvent::Stats(result) => Msg::StatsLoaded(result.map_err(describe)),
        EngineEvent::JobStarted { kind, result } => Msg::JobStarted {
            kind,
            result: result.map_err(describe),
        },
        EngineEvent::JobProgress(job) => Msg::JobProgress(job),
        EngineEvent::JobPollFailed { job_id, error } => Msg::JobPollFailed {
            job_id,
            message: describe(error),
        },
        EngineEvent::JobCompleted(job) => Msg::JobCompleted(job),
        EngineEvent::JobFailed(job) => Msg::JobFailed(job),
        EngineEvent::JobClosed { job_id } => Msg::JobClosed { job_id },
        EngineEvent::JobStopRequested(result) => {
            Msg::JobStopRequested(result.map(|_| ()).map_err(describe))
        }
        EngineEvent::BulkAnalyzed(result) => Msg::BulkAnalyzeFinished(result.map_err(describe)),
        EngineEvent::BulkDeleted(result) => Msg::BulkDeleteFinished(result.map_err(describe)),
        EngineEvent::LeadUpdated(result) => Msg::LeadUpdated(result.map_err(describe)),
        EngineEvent::LeadDeleted { id, result } => Msg::LeadDeleted {
            id,
            result: result.map(|_| ()).map_err(describe),
        },
        EngineEvent::LeadAnalyzed(result) => Msg::LeadAnalyzed(result.map_err(describe)),
        EngineEvent::Exported(result) => Msg::ExportFinished(result.map_err(describe)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen_core::{BulkDeleteResult, JobKind};
    use leadgen_engine::ApiErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_url_stays_in_the_app() {
        assert_eq!(
            to_command(Effect::OpenUrl("http://x/export/download/a.xlsx".into())),
            Err("http://x/export/download/a.xlsx".to_string())
        );
        assert_eq!(
            to_command(Effect::CloseJob {
                job_id: "job-1".into()
            }),
            Ok(EngineCommand::CloseJob {
                job_id: "job-1".into()
            })
        );
    }

    #[test]
    fn api_errors_become_messages() {
        let error = ApiError {
            kind: ApiErrorKind::HttpStatus(404),
            message: "Lead not found".into(),
        };
        assert_eq!(
            to_msg(EngineEvent::BulkDeleted(Err(error))),
            Msg::BulkDeleteFinished(Err("Lead not found".into()))
        );
        assert_eq!(
            to_msg(EngineEvent::BulkDeleted(Ok(BulkDeleteResult {
                deleted_count: 1,
                not_found: vec!["B".into()],
            }))),
            Msg::BulkDeleteFinished(Ok(BulkDeleteResult {
                deleted_count: 1,
                not_found: vec!["B".into()],
            }))
        );
        assert_eq!(
            to_msg(EngineEvent::JobStarted {
                kind: JobKind::Apollo,
                result: Err(ApiError {
                    kind: ApiErrorKind::Network,
                    message: "offline".into(),
                }),
            }),
            Msg::JobStarted {
                kind: JobKind::Apollo,
                result: Err("offline".into()),
            }
        );
    }
}
