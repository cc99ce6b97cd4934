//! Leadgen engine: backend API client, job polling and effect execution.
mod apollo;
mod client;
mod engine;
mod export;
mod jobs;
mod leads;
mod poller;
mod query;
mod scraper;
mod types;

pub use client::{ApiClient, ApiSettings, DEFAULT_API_URL};
pub use engine::{ChannelJobCallbacks, EngineCommand, EngineHandle};
pub use jobs::JobStatusSource;
pub use poller::{JobCallbacks, JobPoller, PollOutcome, DEFAULT_POLL_INTERVAL};
pub use query::QueryBuilder;
pub use types::{
    ApiError, ApiErrorKind, EngineEvent, CLIENT_SIDE_STATUS, HTTP_ERROR_MESSAGE,
    NETWORK_ERROR_MESSAGE, REJECTED_MESSAGE,
};
