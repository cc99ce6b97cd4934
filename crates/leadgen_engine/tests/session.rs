use std::time::{Duration, Instant};

use leadgen_core::{update, AppState, Effect, FormEdit, JobStatus, Msg, TagField};
use leadgen_engine::{ApiClient, ApiSettings, EngineCommand, EngineEvent, EngineHandle};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn job_json(status: &str, processed: u32) -> serde_json::Value {
    let completed_at = if status == "completed" {
        json!("2024-05-01T10:01:00")
    } else {
        json!(null)
    };
    json!({
        "success": true,
        "data": {
            "id": "job-1",
            "status": status,
            "total_leads": 10,
            "processed_leads": processed,
            "errors": [],
            "started_at": "2024-05-01T10:00:00",
            "completed_at": completed_at,
            "parameters": {"keywords": ["spa"], "locations": ["Perth"]}
        }
    })
}

async fn mount_backend(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/scraper/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"job_id": "job-1", "status": "running", "message": "Scraping started"}
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("running", 3)))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("completed", 10)))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "leads": [
                    {"id": "a", "company_name": "Acme Spa", "score": 91.0},
                    {"id": "b", "company_name": "Perth Day Spa", "score": 64.0}
                ],
                "total": 2,
                "page": 1,
                "per_page": 100,
                "total_pages": 1
            }
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leads/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"total_leads": 2}
        })))
        .mount(server)
        .await;
}

fn to_command(effect: Effect) -> Option<EngineCommand> {
    match effect {
        Effect::StartScrape(params) => Some(EngineCommand::StartScrape(params)),
        Effect::WatchJob { kind, job_id } => Some(EngineCommand::WatchJob { kind, job_id }),
        Effect::LoadLeads { request, query } => Some(EngineCommand::LoadLeads { request, query }),
        Effect::LoadStats => Some(EngineCommand::LoadStats),
        other => panic!("unexpected effect {other:?}"),
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobStarted { kind, result } => Msg::JobStarted {
            kind,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::JobProgress(job) => Msg::JobProgress(job),
        EngineEvent::JobCompleted(job) => Msg::JobCompleted(job),
        EngineEvent::JobFailed(job) => Msg::JobFailed(job),
        EngineEvent::Leads { request, result } => Msg::LeadsLoaded {
            request,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::Stats(result) => Msg::StatsLoaded(result.map_err(|err| err.to_string())),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn scrape_session_runs_to_completion_and_reloads() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(mount_backend(&server));

    let settings = ApiSettings::default().with_base_url(format!("{}/api", server.uri()));
    let client = ApiClient::new(&settings).expect("client");
    let engine = EngineHandle::with_client(client, Duration::from_millis(20)).expect("engine");

    let mut state = AppState::new();
    for edit in [
        FormEdit::TagAdded {
            field: TagField::Keywords,
            value: "spa".into(),
        },
        FormEdit::TagAdded {
            field: TagField::Locations,
            value: "Perth".into(),
        },
    ] {
        state = update(state, Msg::ScrapeFormEdited(edit)).0;
    }
    let (next, effects) = update(state, Msg::ScrapeSubmitted);
    state = next;
    effects
        .into_iter()
        .filter_map(to_command)
        .for_each(|command| engine.submit(command));

    let mut progress = Vec::new();
    let mut completions = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let done = state.job().is_some_and(|job| job.is_terminal())
            && state.view().rows.len() == 2
            && state.is_idle();
        if done {
            break;
        }
        let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
            continue;
        };
        match &event {
            EngineEvent::JobProgress(job) => progress.push(job.processed_leads),
            EngineEvent::JobCompleted(job) => completions.push(job.clone()),
            _ => {}
        }
        let (next, effects) = update(state, to_msg(event));
        state = next;
        effects
            .into_iter()
            .filter_map(to_command)
            .for_each(|command| engine.submit(command));
    }

    assert_eq!(progress, vec![3]);
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].processed_leads, 10);
    assert_eq!(state.job().and_then(|job| job.status()), Some(JobStatus::Completed));

    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].company_name, "Acme Spa");
    assert_eq!(view.job.map(|job| job.duration), Some("1m".to_string()));

    // No status checks after completion.
    std::thread::sleep(Duration::from_millis(100));
    let status_checks = runtime
        .block_on(server.received_requests())
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/api/scraper/status/job-1")
        .count();
    assert_eq!(status_checks, 2);
}
