use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use leadgen_core::{
    ApolloGenerateParams, ExportFormat, ExportRequest, Job, JobId, JobKind, LeadId, LeadQuery,
    LeadUpdate, ScrapeParams,
};
use leadgen_logging::{leadgen_debug, leadgen_info, leadgen_warn, POLL_TARGET};

use crate::client::{ApiClient, ApiSettings};
use crate::poller::{JobCallbacks, JobPoller};
use crate::types::{ApiError, EngineEvent};

/// Work the engine performs on behalf of the app.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    CheckHealth,
    LoadScraperConfig,
    LoadApolloConfig,
    LoadLeads { request: u64, query: LeadQuery },
    LoadStats,
    StartScrape(ScrapeParams),
    StartApollo(ApolloGenerateParams),
    /// Starts a poller, replacing any existing poller for the same job.
    WatchJob { kind: JobKind, job_id: JobId },
    CloseJob { job_id: JobId },
    StopJob { kind: JobKind, job_id: JobId },
    BulkAnalyze { lead_ids: Vec<LeadId> },
    BulkDelete { lead_ids: Vec<LeadId> },
    UpdateLead { id: LeadId, update: LeadUpdate },
    DeleteLead { id: LeadId },
    AnalyzeLead { id: LeadId },
    Export { format: ExportFormat, request: ExportRequest },
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> io::Result<Self> {
        let client = ApiClient::new(&settings)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        Self::with_client(client, settings.poll_interval)
    }

    /// Spawns the engine thread with its own multi-threaded tokio runtime.
    pub fn with_client(client: ApiClient, poll_interval: Duration) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("leadgen-io")
            .build()?;

        thread::Builder::new()
            .name("leadgen-engine".to_string())
            .spawn(move || {
                let _enter = runtime.enter();
                let mut worker = Worker {
                    client: Arc::new(client),
                    poll_interval,
                    event_tx,
                    pollers: HashMap::new(),
                };
                while let Ok(command) = cmd_rx.recv() {
                    worker.handle(command);
                }
                worker.close_all();
                leadgen_debug!("Engine thread stopped");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            leadgen_warn!("Engine thread is gone; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Worker {
    client: Arc<ApiClient>,
    poll_interval: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
    pollers: HashMap<JobId, JobPoller>,
}

impl Worker {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::CheckHealth => {
                self.spawn_call(|api| async move { EngineEvent::Health(api.health().await) })
            }
            EngineCommand::LoadScraperConfig => self.spawn_call(|api| async move {
                EngineEvent::ScraperConfig(api.scraper_config().await)
            }),
            EngineCommand::LoadApolloConfig => self.spawn_call(|api| async move {
                EngineEvent::ApolloConfig(api.apollo_config().await)
            }),
            EngineCommand::LoadLeads { request, query } => self.spawn_call(move |api| async move {
                EngineEvent::Leads {
                    request,
                    result: api.list_leads(&query).await,
                }
            }),
            EngineCommand::LoadStats => {
                self.spawn_call(|api| async move { EngineEvent::Stats(api.lead_stats().await) })
            }
            EngineCommand::StartScrape(params) => self.spawn_call(move |api| async move {
                EngineEvent::JobStarted {
                    kind: JobKind::Scrape,
                    result: api.start_scrape(&params).await,
                }
            }),
            EngineCommand::StartApollo(params) => self.spawn_call(move |api| async move {
                EngineEvent::JobStarted {
                    kind: JobKind::Apollo,
                    result: api.generate_apollo_leads(&params).await,
                }
            }),
            EngineCommand::WatchJob { kind, job_id } => self.watch(kind, job_id),
            EngineCommand::CloseJob { job_id } => self.close(&job_id),
            EngineCommand::StopJob { kind, job_id } => self.spawn_call(move |api| async move {
                EngineEvent::JobStopRequested(api.stop_job(kind, &job_id).await)
            }),
            EngineCommand::BulkAnalyze { lead_ids } => self.spawn_call(move |api| async move {
                EngineEvent::BulkAnalyzed(api.bulk_analyze(&lead_ids).await)
            }),
            EngineCommand::BulkDelete { lead_ids } => self.spawn_call(move |api| async move {
                EngineEvent::BulkDeleted(api.bulk_delete(&lead_ids).await)
            }),
            EngineCommand::UpdateLead { id, update } => self.spawn_call(move |api| async move {
                EngineEvent::LeadUpdated(api.update_lead(&id, &update).await)
            }),
            EngineCommand::DeleteLead { id } => self.spawn_call(move |api| async move {
                let result = api.delete_lead(&id).await;
                EngineEvent::LeadDeleted { id, result }
            }),
            EngineCommand::AnalyzeLead { id } => self.spawn_call(move |api| async move {
                EngineEvent::LeadAnalyzed(api.analyze_lead(&id).await)
            }),
            EngineCommand::Export { format, request } => self.spawn_call(move |api| async move {
                EngineEvent::Exported(api.export(format, &request).await)
            }),
        }
    }

    fn spawn_call<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut,
        Fut: Future<Output = EngineEvent> + Send + 'static,
    {
        let future = call(self.client.clone());
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = future.await;
            let _ = event_tx.send(event);
        });
    }

    fn watch(&mut self, kind: JobKind, job_id: JobId) {
        self.pollers.retain(|_, poller| !poller.is_finished());
        if let Some(previous) = self.pollers.remove(&job_id) {
            previous.close();
        }

        leadgen_info!(target: POLL_TARGET, "Watching {} job {}", kind.label(), job_id);
        let callbacks = Arc::new(ChannelJobCallbacks::new(self.event_tx.clone()));
        let poller = JobPoller::spawn(
            self.client.clone(),
            kind,
            job_id.clone(),
            self.poll_interval,
            callbacks,
        );
        self.pollers.insert(job_id, poller);
    }

    fn close(&mut self, job_id: &str) {
        match self.pollers.remove(job_id) {
            Some(poller) => poller.close(),
            None => {
                let _ = self.event_tx.send(EngineEvent::JobClosed {
                    job_id: job_id.to_string(),
                });
            }
        }
    }

    fn close_all(&mut self) {
        for (_, poller) in self.pollers.drain() {
            poller.close();
        }
    }
}

/// Forwards poller callbacks to the engine's event channel.
pub struct ChannelJobCallbacks {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelJobCallbacks {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

impl JobCallbacks for ChannelJobCallbacks {
    fn on_progress(&self, job: &Job) {
        self.emit(EngineEvent::JobProgress(job.clone()));
    }

    fn on_poll_error(&self, job_id: &str, error: &ApiError) {
        self.emit(EngineEvent::JobPollFailed {
            job_id: job_id.to_string(),
            error: error.clone(),
        });
    }

    fn on_completed(&self, job: &Job) {
        self.emit(EngineEvent::JobCompleted(job.clone()));
    }

    fn on_failed(&self, job: &Job) {
        self.emit(EngineEvent::JobFailed(job.clone()));
    }

    fn on_close(&self, job_id: &str) {
        self.emit(EngineEvent::JobClosed {
            job_id: job_id.to_string(),
        });
    }
}
