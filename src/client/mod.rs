//! Client layer: orchestrates transport calls and maps transport ↔ domain.
//!
//! The two API generations get separate client types: [`ReportClient`] and
//! [`AccountInfoClient`] talk to Live v4, [`CredentialValidator`] talks to v5.

mod account;
mod credentials;
#[cfg(test)]
mod fake;
mod report;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

use crate::domain::{ReportId, ValidationError};
use crate::regions::DatasetError;
use crate::transport::{LegacyReply, TransportError};

pub use account::AccountInfoClient;
pub use credentials::CredentialValidator;
pub use report::ReportClient;

pub const DEFAULT_V4_ENDPOINT: &str = "https://api.direct.yandex.ru/live/v4/json/";
pub const DEFAULT_V5_ENDPOINT: &str = "https://api.direct.yandex.com/json/v5/";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut request = self.client.post(url).json(&body);
            for (name, value) in headers {
                request = request.header(name, value);
            }
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by every client in this crate.
///
/// This error preserves:
/// - transport failures (network errors and non-2xx statuses),
/// - decode failures (body is not the expected JSON),
/// - API-level failures (`error_str` in v4, `error` in v5),
/// - local validation and region-dataset failures,
/// - report polling outcomes.
pub enum DirectError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server. The body is not interpreted.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded as the expected JSON.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// Live v4 answered 2xx with an `error_str` payload.
    #[error("remote error: {message}")]
    Remote {
        message: String,
        code: Option<i64>,
        detail: Option<String>,
    },

    /// v5 rejected the login/token pair.
    #[error("invalid credentials: {detail}")]
    InvalidCredentials { detail: String, code: Option<i64> },

    /// Input rejected before any network call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The region dataset could not be read or parsed.
    #[error("region dataset unavailable: {0}")]
    Dataset(#[from] DatasetError),

    /// An endpoint override is not a valid URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// `GetWordstatReportList` does not contain the requested id.
    #[error("report {id} not found")]
    ReportNotFound { id: ReportId },

    /// The server marked the report as failed.
    #[error("report {id} failed on the server")]
    ReportFailed { id: ReportId },

    /// The report did not reach `Done` within the poll timeout.
    #[error("report {id} not ready after {waited:?}")]
    PollTimeout { id: ReportId, waited: Duration },

    /// The caller's cancel future resolved before the report was done.
    #[error("waiting for report {id} was cancelled")]
    PollCancelled { id: ReportId },
}

impl DirectError {
    /// `true` for network failures and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }
}

fn transport_error(err: Box<dyn StdError + Send + Sync>) -> DirectError {
    error!(error = %err, "request to Yandex.Direct failed");
    DirectError::Transport(err)
}

fn decode_error(err: TransportError) -> DirectError {
    error!(error = %err, "failed to decode Yandex.Direct response");
    DirectError::Decode(Box::new(err))
}

fn ensure_success(response: HttpResponse) -> Result<String, DirectError> {
    if !(200..=299).contains(&response.status) {
        error!(status = response.status, "Yandex.Direct returned a non-success status");
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        return Err(DirectError::HttpStatus {
            status: response.status,
            body,
        });
    }
    Ok(response.body)
}

/// POST target for Live v4 calls, shared by the v4 clients.
#[derive(Clone)]
struct LegacyApi {
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl LegacyApi {
    /// Send an encoded v4 body and return the raw 2xx response body.
    async fn call(&self, body: Value) -> Result<String, DirectError> {
        let method = body
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        debug!(method = %method, param = ?body.get("param"), "sending Live v4 request");

        let response = self
            .http
            .post_json(&self.endpoint, Vec::new(), body)
            .await
            .map_err(transport_error)?;
        let body = ensure_success(response)?;
        debug!(method = %method, body = %body, "Live v4 response received");
        Ok(body)
    }
}

/// Turn a decoded v4 reply into the data or a [`DirectError::Remote`].
fn settle<T>(decoded: Result<LegacyReply<T>, TransportError>) -> Result<T, DirectError> {
    match decoded.map_err(decode_error)? {
        LegacyReply::Data(data) => Ok(data),
        LegacyReply::Fault(fault) => {
            error!(
                code = ?fault.code,
                detail = ?fault.detail,
                "Yandex.Direct returned an error: {}",
                fault.message
            );
            Err(DirectError::Remote {
                message: fault.message,
                code: fault.code,
                detail: fault.detail,
            })
        }
    }
}

fn parse_endpoint(endpoint: &str) -> Result<url::Url, DirectError> {
    url::Url::parse(endpoint).map_err(|source| DirectError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        source,
    })
}

#[derive(Debug, Clone)]
/// Builder for the client types.
///
/// Use this when you need to customize the endpoints, timeout, or user-agent.
pub struct ClientBuilder {
    v4_endpoint: String,
    v5_endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a builder with the default endpoints and no timeout/user-agent override.
    pub fn new() -> Self {
        Self {
            v4_endpoint: DEFAULT_V4_ENDPOINT.to_owned(),
            v5_endpoint: DEFAULT_V5_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the Live v4 JSON endpoint.
    pub fn v4_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.v4_endpoint = endpoint.into();
        self
    }

    /// Override the v5 base URL; service names (`changes`) are joined onto it.
    pub fn v5_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.v5_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn http(&self) -> Result<Arc<dyn HttpTransport>, DirectError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|err| DirectError::Transport(Box::new(err)))?;
        Ok(Arc::new(ReqwestTransport { client }))
    }

    fn legacy_api(&self) -> Result<LegacyApi, DirectError> {
        let endpoint = parse_endpoint(&self.v4_endpoint)?;
        Ok(LegacyApi {
            endpoint: endpoint.to_string(),
            http: self.http()?,
        })
    }

    fn v5_service_url(&self, service: &str) -> Result<String, DirectError> {
        let base = parse_endpoint(&self.v5_endpoint)?;
        let joined = base
            .join(service)
            .map_err(|source| DirectError::InvalidEndpoint {
                endpoint: self.v5_endpoint.clone(),
                source,
            })?;
        Ok(joined.to_string())
    }

    /// Build a [`ReportClient`] bound to `credentials`.
    pub fn build_report_client(
        &self,
        credentials: crate::domain::Credentials,
    ) -> Result<ReportClient, DirectError> {
        Ok(ReportClient::from_parts(credentials, self.legacy_api()?))
    }

    /// Build an [`AccountInfoClient`].
    pub fn build_account_info_client(&self) -> Result<AccountInfoClient, DirectError> {
        Ok(AccountInfoClient::from_parts(self.legacy_api()?))
    }

    /// Build a [`CredentialValidator`].
    pub fn build_credential_validator(&self) -> Result<CredentialValidator, DirectError> {
        let endpoint = self.v5_service_url(crate::transport::CHECK_CAMPAIGNS_SERVICE)?;
        Ok(CredentialValidator::from_parts(endpoint, self.http()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Credentials;

    #[test]
    fn builder_endpoint_overrides_are_applied() {
        let builder = ClientBuilder::new()
            .v4_endpoint("https://example.invalid/live/v4/json/")
            .v5_endpoint("https://example.invalid/json/v5/");

        let legacy = builder.legacy_api().unwrap();
        assert_eq!(legacy.endpoint, "https://example.invalid/live/v4/json/");
        assert_eq!(
            builder
                .v5_service_url(crate::transport::CHECK_CAMPAIGNS_SERVICE)
                .unwrap(),
            "https://example.invalid/json/v5/changes"
        );

        assert!(
            builder
                .build_report_client(Credentials::new("user", "token").unwrap())
                .is_ok()
        );
        assert!(builder.build_account_info_client().is_ok());
        assert!(builder.build_credential_validator().is_ok());
    }

    #[test]
    fn builder_rejects_malformed_endpoint() {
        let built = ClientBuilder::new()
            .v4_endpoint("not a url")
            .build_account_info_client();
        assert!(matches!(built, Err(DirectError::InvalidEndpoint { .. })));
    }

    #[test]
    fn default_v5_service_url_points_at_changes() {
        let url = ClientBuilder::new()
            .v5_service_url(crate::transport::CHECK_CAMPAIGNS_SERVICE)
            .unwrap();
        assert_eq!(url, "https://api.direct.yandex.com/json/v5/changes");
    }

    #[test]
    fn transport_kinds_are_grouped() {
        let err = DirectError::HttpStatus {
            status: 500,
            body: None,
        };
        assert!(err.is_transport());
        let err = DirectError::Remote {
            message: "bad token".to_owned(),
            code: None,
            detail: None,
        };
        assert!(!err.is_transport());
    }
}
