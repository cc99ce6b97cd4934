use std::time::Duration;

use leadgen_core::HealthStatus;
use leadgen_logging::{leadgen_debug, leadgen_warn, API_TARGET};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::query::QueryBuilder;
use crate::types::{ApiError, ApiErrorKind, HTTP_ERROR_MESSAGE, REJECTED_MESSAGE};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between job status checks.
    pub poll_interval: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl ApiSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Typed client for the lead generation backend.
///
/// Every response is a `{ success, data, error }` envelope; the client unwraps
/// it into `Result<T, ApiError>`. No retries happen here.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(settings.base_url.trim_end_matches('/'))
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiErrorKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Liveness check.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get(&["health"]).await
    }

    /// Absolute URL for `segments` below the base path, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(ApiErrorKind::InvalidUrl, "base url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        self.send(Method::GET, url, None).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &QueryBuilder,
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(segments)?;
        query.apply(&mut url);
        self.send(Method::GET, url, None).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let body = body.map(encode_body).transpose()?;
        self.send(Method::POST, url, body).await
    }

    pub(crate) async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let body = encode_body(body)?;
        self.send(Method::PUT, url, Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        self.send(Method::DELETE, url, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        leadgen_debug!(target: API_TARGET, "{} {}", method, url.path());

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let result = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(bytes) => decode_envelope(status, &bytes),
                    Err(err) => Err(map_reqwest_error(err)),
                }
            }
            Err(err) => Err(map_reqwest_error(err)),
        };

        if let Err(err) = &result {
            leadgen_warn!(
                target: API_TARGET,
                "{} {} failed ({}): {}",
                method,
                url.path(),
                err.kind,
                err.message
            );
        }
        result
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body).map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
}

fn decode_envelope<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    bytes: &[u8],
) -> Result<T, ApiError> {
    let code = status.as_u16();
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(bytes)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| HTTP_ERROR_MESSAGE.to_string());
        return Err(ApiError::new(ApiErrorKind::HttpStatus(code), message));
    }

    let envelope: Envelope<T> = serde_json::from_slice(bytes)
        .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))?;
    if !envelope.success {
        let message = envelope
            .error
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| REJECTED_MESSAGE.to_string());
        return Err(ApiError::new(ApiErrorKind::Rejected(code), message));
    }

    match envelope.data {
        Some(data) => Ok(data),
        // Payload types such as `()` accept a missing `data`.
        None => serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            ApiError::new(ApiErrorKind::Decode, "response envelope has no data")
        }),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    leadgen_debug!(target: API_TARGET, "transport error: {}", err);
    if err.is_timeout() {
        return ApiError::network(ApiErrorKind::Timeout);
    }
    ApiError::network(ApiErrorKind::Network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen_core::Message;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiSettings::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let api = client("http://localhost:5000/api/");
        let url = api.endpoint(&["leads", "a b", "analyze"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/leads/a%20b/analyze");

        let bare = client("http://127.0.0.1:9000");
        assert_eq!(
            bare.endpoint(&["health"]).unwrap().as_str(),
            "http://127.0.0.1:9000/health"
        );
    }

    #[test]
    fn http_error_prefers_backend_message() {
        let err = decode_envelope::<Message>(
            reqwest::StatusCode::NOT_FOUND,
            br#"{"success": false, "error": "Lead not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus(404));
        assert_eq!(err.message, "Lead not found");

        let err = decode_envelope::<Message>(reqwest::StatusCode::BAD_GATEWAY, b"<html>")
            .unwrap_err();
        assert_eq!(err.message, HTTP_ERROR_MESSAGE);
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let err = decode_envelope::<Message>(reqwest::StatusCode::OK, br#"{"success": false}"#)
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Rejected(200));
        assert_eq!(err.message, REJECTED_MESSAGE);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_envelope::<Message>(reqwest::StatusCode::OK, b"not json").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert_eq!(err.status_code(), 500);

        let empty: Result<(), ApiError> =
            decode_envelope(reqwest::StatusCode::OK, br#"{"success": true}"#);
        assert!(empty.is_ok());
    }
}
