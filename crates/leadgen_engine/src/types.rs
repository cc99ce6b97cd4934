use std::fmt;

use leadgen_core::{
    ApolloConfig, BulkAnalyzeResult, BulkDeleteResult, ExportResult, HealthStatus, Job, JobId,
    JobKind, JobTicket, Lead, LeadAnalysis, LeadId, LeadPage, LeadStats, Message, ScraperConfig,
};

/// Status reported for failures that never produced an HTTP response.
pub const CLIENT_SIDE_STATUS: u16 = 500;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check if the backend is running.";
pub const HTTP_ERROR_MESSAGE: &str = "API request failed";
pub const REJECTED_MESSAGE: &str = "Request was rejected by the backend";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn network(kind: ApiErrorKind) -> Self {
        Self::new(kind, NETWORK_ERROR_MESSAGE)
    }

    /// HTTP status for the failure; 500 when no response was received.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ApiErrorKind::HttpStatus(code) | ApiErrorKind::Rejected(code) => code,
            ApiErrorKind::Network
            | ApiErrorKind::Timeout
            | ApiErrorKind::Decode
            | ApiErrorKind::InvalidUrl => CLIENT_SIDE_STATUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-2xx response.
    HttpStatus(u16),
    /// 2xx response whose envelope carried `success: false`.
    Rejected(u16),
    Network,
    Timeout,
    /// Body was not a valid envelope for the expected payload.
    Decode,
    InvalidUrl,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Rejected(code) => write!(f, "rejected with status {code}"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Decode => write!(f, "invalid response body"),
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
        }
    }
}

/// Results reported by the engine thread, one per finished command or poll step.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Health(Result<HealthStatus, ApiError>),
    ScraperConfig(Result<ScraperConfig, ApiError>),
    ApolloConfig(Result<ApolloConfig, ApiError>),
    Leads {
        request: u64,
        result: Result<LeadPage, ApiError>,
    },
    Stats(Result<LeadStats, ApiError>),
    JobStarted {
        kind: JobKind,
        result: Result<JobTicket, ApiError>,
    },
    JobProgress(Job),
    JobPollFailed {
        job_id: JobId,
        error: ApiError,
    },
    JobCompleted(Job),
    JobFailed(Job),
    JobClosed {
        job_id: JobId,
    },
    JobStopRequested(Result<Message, ApiError>),
    BulkAnalyzed(Result<BulkAnalyzeResult, ApiError>),
    BulkDeleted(Result<BulkDeleteResult, ApiError>),
    LeadUpdated(Result<Lead, ApiError>),
    LeadDeleted {
        id: LeadId,
        result: Result<Message, ApiError>,
    },
    LeadAnalyzed(Result<LeadAnalysis, ApiError>),
    /// `download_url` is resolved against the API base URL.
    Exported(Result<ExportResult, ApiError>),
}
