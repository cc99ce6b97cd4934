use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use leadgen_core::SearchMode;
use leadgen_engine::ApiSettings;
use log::LevelFilter;

use super::logging::LogDestination;

pub const API_URL_VAR: &str = "LEADGEN_API_URL";
pub const POLL_INTERVAL_VAR: &str = "LEADGEN_POLL_INTERVAL_MS";
pub const LOG_VAR: &str = "LEADGEN_LOG";
pub const LOG_LEVEL_VAR: &str = "LEADGEN_LOG_LEVEL";
pub const SEARCH_MODE_VAR: &str = "LEADGEN_SEARCH_MODE";
pub const SCRAPE_KEYWORDS_VAR: &str = "LEADGEN_SCRAPE_KEYWORDS";
pub const SCRAPE_LOCATIONS_VAR: &str = "LEADGEN_SCRAPE_LOCATIONS";
pub const SCRAPE_MAX_LEADS_VAR: &str = "LEADGEN_SCRAPE_MAX_LEADS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AppConfigError {
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidPollInterval { var: &'static str, value: String },
    #[error("{var} must be one of file, terminal, both; got {value:?}")]
    InvalidLogDestination { var: &'static str, value: String },
    #[error("{var} must be one of error, warn, info, debug, trace; got {value:?}")]
    InvalidLogLevel { var: &'static str, value: String },
    #[error("{var} must be backend or local, got {value:?}")]
    InvalidSearchMode { var: &'static str, value: String },
    #[error("{var} must be a whole number, got {value:?}")]
    InvalidMaxLeads { var: &'static str, value: String },
}

/// Scrape job to launch right after startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeSession {
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub max_leads: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub search_mode: SearchMode,
    pub scrape: Option<ScrapeSession>,
}

impl AppConfig {
    /// Reads the process environment, falling back to a `.env` file in the
    /// working directory or one of its parents.
    pub fn from_env() -> Result<Self, AppConfigError> {
        let dotenv = dotenvy::dotenv_iter().map(read_dotenv).unwrap_or_default();
        Self::from_lookup(layered(|name| std::env::var(name).ok(), &dotenv))
    }

    /// Builds the config from `lookup`; unset and blank variables use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut api = ApiSettings::default();
        if let Some(url) = var(API_URL_VAR) {
            api = api.with_base_url(url);
        }
        if let Some(raw) = var(POLL_INTERVAL_VAR) {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .ok_or(AppConfigError::InvalidPollInterval {
                    var: POLL_INTERVAL_VAR,
                    value: raw,
                })?;
            api = api.with_poll_interval(Duration::from_millis(millis));
        }

        let log_destination = match var(LOG_VAR) {
            None => LogDestination::default(),
            Some(raw) => parse_log_destination(&raw).ok_or(
                AppConfigError::InvalidLogDestination {
                    var: LOG_VAR,
                    value: raw,
                },
            )?,
        };

        let log_level = match var(LOG_LEVEL_VAR) {
            None => LevelFilter::Info,
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| AppConfigError::InvalidLogLevel {
                    var: LOG_LEVEL_VAR,
                    value: raw,
                })?,
        };

        let search_mode = match var(SEARCH_MODE_VAR).map(|raw| raw.to_lowercase()) {
            None => SearchMode::default(),
            Some(raw) if raw == "backend" => SearchMode::Backend,
            Some(raw) if raw == "local" => SearchMode::Local,
            Some(raw) => {
                return Err(AppConfigError::InvalidSearchMode {
                    var: SEARCH_MODE_VAR,
                    value: raw,
                })
            }
        };

        let max_leads = match var(SCRAPE_MAX_LEADS_VAR) {
            None => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                AppConfigError::InvalidMaxLeads {
                    var: SCRAPE_MAX_LEADS_VAR,
                    value: raw,
                }
            })?),
        };
        let keywords = split_list(var(SCRAPE_KEYWORDS_VAR));
        let locations = split_list(var(SCRAPE_LOCATIONS_VAR));
        let scrape = (!keywords.is_empty() || !locations.is_empty()).then(|| ScrapeSession {
            keywords,
            locations,
            max_leads,
        });

        Ok(Self {
            api,
            log_destination,
            log_level,
            search_mode,
            scrape,
        })
    }
}

fn parse_log_destination(raw: &str) -> Option<LogDestination> {
    match raw.to_lowercase().as_str() {
        "file" => Some(LogDestination::File),
        "terminal" | "term" | "stderr" => Some(LogDestination::Terminal),
        "both" => Some(LogDestination::Both),
        _ => None,
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Collects `.env` entries, skipping lines that do not parse.
fn read_dotenv<R: Read>(entries: dotenvy::Iter<R>) -> HashMap<String, String> {
    entries.filter_map(Result::ok).collect()
}

/// Looks `name` up in `primary` first, then in the `.env` entries.
fn layered<'a>(
    primary: impl Fn(&str) -> Option<String> + 'a,
    dotenv: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name: &str| primary(name).or_else(|| dotenv.get(name).cloned())
}
