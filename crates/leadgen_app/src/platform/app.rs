use std::time::{Duration, Instant};

use anyhow::Context;
use leadgen_core::{update, AppState, FormEdit, Msg, TagField};
use leadgen_logging::leadgen_info;

use super::config::{AppConfig, ScrapeSession};
use super::effects::EffectRunner;
use super::{logging, render};

const EVENT_WAIT: Duration = Duration::from_millis(75);
/// Health and config loads are not tracked by `AppState::is_idle`.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Loads the dashboard, optionally runs one scrape job, and prints the result.
pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    logging::initialize(config.log_destination, config.log_level);
    leadgen_info!("Starting leadgen_app");

    let runner = EffectRunner::new(config.api.clone()).context("failed to start engine")?;
    let mut app = App {
        state: AppState::with_search_mode(config.search_mode),
        runner,
    };

    app.dispatch(Msg::Initialize);
    if let Some(session) = &config.scrape {
        for msg in scrape_messages(session) {
            app.dispatch(msg);
        }
    }

    let started = Instant::now();
    loop {
        match app.runner.next_msg(EVENT_WAIT) {
            Some(msg) => {
                app.dispatch(msg);
                for msg in app.runner.pending_msgs() {
                    app.dispatch(msg);
                }
            }
            None => app.dispatch(Msg::Tick),
        }
        app.render_if_dirty();

        if app.state.is_idle() && started.elapsed() >= STARTUP_GRACE {
            break;
        }
    }

    for line in render::render(&app.state.view()) {
        println!("{line}");
    }
    leadgen_info!("leadgen_app finished");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self) {
        if !self.state.consume_dirty() {
            return;
        }
        for line in render::render(&self.state.view()) {
            leadgen_info!("{}", line);
        }
    }
}

fn scrape_messages(session: &ScrapeSession) -> Vec<Msg> {
    let tags = |field: TagField, values: &[String]| {
        values
            .iter()
            .map(move |value| {
                Msg::ScrapeFormEdited(FormEdit::TagAdded {
                    field,
                    value: value.clone(),
                })
            })
            .collect::<Vec<_>>()
    };

    let mut msgs = tags(TagField::Keywords, &session.keywords);
    msgs.extend(tags(TagField::Locations, &session.locations));
    if let Some(max_leads) = session.max_leads {
        msgs.push(Msg::ScrapeFormEdited(FormEdit::MaxLeadsChanged(max_leads)));
    }
    msgs.push(Msg::ScrapeSubmitted);
    msgs
}
