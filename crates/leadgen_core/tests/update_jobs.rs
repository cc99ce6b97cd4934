use std::sync::Once;

use leadgen_core::{
    update, AppState, ApolloConfig, Effect, FormEdit, Job, JobKind, JobStatus, JobTicket, Msg,
    NotificationLevel, ScrapeParams, TagField,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(leadgen_logging::initialize_for_tests);
}

fn snapshot(id: &str, status: JobStatus, processed: u32, total: u32) -> Job {
    Job {
        id: id.to_string(),
        status,
        total_leads: total,
        processed_leads: processed,
        ..Job::default()
    }
}

fn fill_scrape_form(state: AppState) -> AppState {
    let edits = [
        FormEdit::TagAdded {
            field: TagField::Keywords,
            value: "day spa".into(),
        },
        FormEdit::TagAdded {
            field: TagField::Locations,
            value: " Perth ".into(),
        },
    ];
    edits
        .into_iter()
        .fold(state, |state, edit| update(state, Msg::ScrapeFormEdited(edit)).0)
}

/// Submits the scrape form and acknowledges the start with `job_id`.
fn started_scrape(job_id: &str) -> AppState {
    let state = fill_scrape_form(AppState::new());
    let (state, _) = update(state, Msg::ScrapeSubmitted);
    let (state, _) = update(
        state,
        Msg::JobStarted {
            kind: JobKind::Scrape,
            result: Ok(JobTicket {
                job_id: job_id.to_string(),
                status: Some(JobStatus::Running),
                message: None,
            }),
        },
    );
    state
}

#[test]
fn scrape_submit_requires_keywords_and_locations() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ScrapeSubmitted);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.notifications.len(), 1);
    assert_eq!(view.notifications[0].level, NotificationLevel::Error);
}

#[test]
fn scrape_submit_starts_and_watches_job() {
    init_logging();
    let state = fill_scrape_form(AppState::new());
    let (state, effects) = update(state, Msg::ScrapeSubmitted);

    assert_eq!(
        effects,
        vec![Effect::StartScrape(ScrapeParams {
            keywords: vec!["day spa".into()],
            locations: vec!["Perth".into()],
            max_leads: 50,
            sources: vec!["google_search".into(), "yellow_pages".into()],
            analyze_with_ai: true,
        })]
    );
    assert!(!state.is_idle());

    let (state, effects) = update(
        state,
        Msg::JobStarted {
            kind: JobKind::Scrape,
            result: Ok(JobTicket {
                job_id: "job-1".into(),
                status: None,
                message: None,
            }),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::WatchJob {
            kind: JobKind::Scrape,
            job_id: "job-1".into(),
        }]
    );
    let job = state.view().job.expect("job view");
    assert_eq!(job.job_id, "job-1");
    assert_eq!(job.status, None);
}

#[test]
fn second_job_is_refused_while_one_runs() {
    init_logging();
    let state = fill_scrape_form(started_scrape("job-1"));
    let (state, effects) = update(state, Msg::ScrapeSubmitted);

    assert!(effects.is_empty());
    assert_eq!(
        state.view().notifications.last().map(|n| n.message.clone()),
        Some("A job is already running".to_string())
    );
}

#[test]
fn completion_reloads_leads_and_stats() {
    init_logging();
    let state = started_scrape("job-1");
    let (state, effects) = update(
        state,
        Msg::JobProgress(snapshot("job-1", JobStatus::Running, 3, 10)),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().job.map(|job| job.percent), Some(30));

    let (state, effects) = update(
        state,
        Msg::JobCompleted(snapshot("job-1", JobStatus::Completed, 10, 10)),
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::LoadLeads { .. }, Effect::LoadStats]
    ));
    let job = state.view().job.expect("job view");
    assert_eq!(job.status, Some(JobStatus::Completed));
    assert_eq!(job.percent, 100);
}

#[test]
fn snapshot_after_terminal_is_ignored() {
    init_logging();
    let state = started_scrape("job-1");
    let (state, _) = update(
        state,
        Msg::JobCompleted(snapshot("job-1", JobStatus::Completed, 10, 10)),
    );
    let (state, effects) = update(
        state,
        Msg::JobProgress(snapshot("job-1", JobStatus::Running, 4, 10)),
    );
    assert!(effects.is_empty());
    let (state, effects) = update(
        state,
        Msg::JobCompleted(snapshot("job-1", JobStatus::Completed, 10, 10)),
    );
    assert!(effects.is_empty());

    let job = state.view().job.expect("job view");
    assert_eq!(job.status, Some(JobStatus::Completed));
    assert_eq!(job.processed, 10);
}

#[test]
fn failed_job_reports_first_error() {
    init_logging();
    let state = started_scrape("job-1");
    let mut failed = snapshot("job-1", JobStatus::Failed, 2, 10);
    failed.errors = vec!["captcha".into(), "timeout".into()];
    let (state, effects) = update(state, Msg::JobFailed(failed));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(
        view.notifications.last().map(|n| n.message.as_str()),
        Some("Job failed: captcha")
    );
    let job = view.job.expect("job view");
    assert_eq!(job.error_count, 2);
    assert!(state.is_idle());
}

#[test]
fn poll_errors_are_recorded_until_next_snapshot() {
    init_logging();
    let state = started_scrape("job-1");
    let (state, _) = update(
        state,
        Msg::JobPollFailed {
            job_id: "job-1".into(),
            message: "API request failed".into(),
        },
    );
    assert_eq!(
        state.view().job.and_then(|job| job.last_error),
        Some("API request failed".to_string())
    );

    let (state, _) = update(
        state,
        Msg::JobProgress(snapshot("job-1", JobStatus::Running, 1, 10)),
    );
    assert_eq!(state.view().job.and_then(|job| job.last_error), None);
}

#[test]
fn stop_and_close_target_the_active_job() {
    init_logging();
    let state = started_scrape("job-1");
    let (state, effects) = update(state, Msg::StopJobClicked);
    assert_eq!(
        effects,
        vec![Effect::StopJob {
            kind: JobKind::Scrape,
            job_id: "job-1".into(),
        }]
    );

    let (state, effects) = update(state, Msg::CloseJobClicked);
    assert_eq!(
        effects,
        vec![Effect::CloseJob {
            job_id: "job-1".into(),
        }]
    );
    assert!(state.view().job.is_none());

    let (_, effects) = update(state, Msg::StopJobClicked);
    assert!(effects.is_empty());
}

#[test]
fn new_job_closes_finished_predecessor() {
    init_logging();
    let state = started_scrape("job-1");
    let (state, _) = update(
        state,
        Msg::JobCompleted(snapshot("job-1", JobStatus::Completed, 10, 10)),
    );
    let (state, effects) = update(state, Msg::ScrapeSubmitted);
    assert!(matches!(effects.as_slice(), [Effect::StartScrape(_)]));

    let (_, effects) = update(
        state,
        Msg::JobStarted {
            kind: JobKind::Scrape,
            result: Ok(JobTicket {
                job_id: "job-2".into(),
                status: None,
                message: None,
            }),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::CloseJob {
                job_id: "job-1".into(),
            },
            Effect::WatchJob {
                kind: JobKind::Scrape,
                job_id: "job-2".into(),
            },
        ]
    );
}

#[test]
fn apollo_submit_needs_configured_api() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ApolloSubmitted);
    assert!(effects.is_empty());
    assert_eq!(state.view().notifications[0].level, NotificationLevel::Error);

    let config = ApolloConfig {
        is_configured: true,
        target_locations: vec![
            "Sydney".into(),
            "Melbourne".into(),
            "Brisbane".into(),
            "Perth".into(),
        ],
        ..ApolloConfig::default()
    };
    let (state, _) = update(state, Msg::ApolloConfigLoaded(Ok(config)));
    assert!(state.view().apollo_configured);

    let (_, effects) = update(state, Msg::ApolloSubmitted);
    match effects.as_slice() {
        [Effect::StartApollo(params)] => {
            assert_eq!(
                params.person_locations.as_deref(),
                Some(&["Sydney".to_string(), "Melbourne".into(), "Brisbane".into()][..])
            );
            assert_eq!(params.keywords, None);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}
