use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::{
    DEFAULT_V5_ENDPOINT, DirectError, HttpTransport, ReqwestTransport, decode_error,
    ensure_success, transport_error,
};
use crate::domain::Credentials;
use crate::transport::{
    CHECK_CAMPAIGNS_SERVICE, decode_v5_json_response, encode_check_campaigns_body, v5_headers,
};

#[derive(Clone)]
/// Checks a login/token pair against the v5 API.
///
/// Success only means the credentials were accepted at the time of the call;
/// nothing is cached.
pub struct CredentialValidator {
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl Default for CredentialValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialValidator {
    /// Create a validator using the default v5 endpoint.
    pub fn new() -> Self {
        Self::from_parts(
            format!("{DEFAULT_V5_ENDPOINT}{CHECK_CAMPAIGNS_SERVICE}"),
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    pub(super) fn from_parts(endpoint: String, http: Arc<dyn HttpTransport>) -> Self {
        Self { endpoint, http }
    }

    /// Send a `checkCampaigns` probe with the given credentials.
    ///
    /// Errors:
    /// - [`DirectError::InvalidCredentials`] when v5 answers with an `error` object,
    /// - [`DirectError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`DirectError::Decode`] when the body is not JSON.
    pub async fn validate(&self, credentials: &Credentials) -> Result<(), DirectError> {
        info!(login = credentials.login().as_str(), "checking credentials");
        let response = self
            .http
            .post_json(
                &self.endpoint,
                v5_headers(credentials),
                encode_check_campaigns_body(Utc::now()),
            )
            .await
            .map_err(transport_error)?;
        let body = ensure_success(response)?;

        match decode_v5_json_response(&body).map_err(decode_error)? {
            None => {
                info!(login = credentials.login().as_str(), "credentials accepted");
                Ok(())
            }
            Some(fault) => {
                let detail = fault
                    .detail
                    .filter(|detail| !detail.trim().is_empty())
                    .or(fault.message)
                    .unwrap_or_else(|| "credentials rejected".to_owned());
                error!(
                    login = credentials.login().as_str(),
                    code = ?fault.code,
                    request_id = ?fault.request_id,
                    "credentials rejected: {detail}"
                );
                Err(DirectError::InvalidCredentials {
                    detail,
                    code: fault.code,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::FakeTransport;
    use super::*;

    fn make_validator(transport: FakeTransport) -> CredentialValidator {
        CredentialValidator::from_parts(
            "https://example.invalid/json/v5/changes".to_owned(),
            Arc::new(transport),
        )
    }

    fn credentials() -> Credentials {
        Credentials::new("client-login", "oauth-token").unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[tokio::test]
    async fn validate_sends_v5_probe_with_auth_headers() {
        let transport = FakeTransport::new(
            200,
            r#"{ "result": { "Timestamp": "2024-03-01T13:05:09Z" } }"#,
        );
        let validator = make_validator(transport.clone());

        validator.validate(&credentials()).await.unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.url, "https://example.invalid/json/v5/changes");
        assert_eq!(header(&sent.headers, "Authorization"), Some("Bearer oauth-token"));
        assert_eq!(header(&sent.headers, "Client-Login"), Some("client-login"));
        assert_eq!(header(&sent.headers, "Accept-Language"), Some("ru"));
        assert_eq!(sent.body["method"], "checkCampaigns");

        let timestamp = sent.body["params"]["Timestamp"].as_str().unwrap();
        assert_eq!(timestamp.len(), "2024-03-01T13:05:09Z".len());
        assert!(timestamp.ends_with('Z'));
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ").is_ok());
    }

    #[tokio::test]
    async fn validate_maps_error_object_to_invalid_credentials() {
        let transport = FakeTransport::new(
            200,
            r#"{ "error": { "error_code": 53, "error_string": "Authorization error", "error_detail": "Invalid OAuth token", "request_id": "1" } }"#,
        );
        let validator = make_validator(transport);

        let err = validator.validate(&credentials()).await.unwrap_err();
        match err {
            DirectError::InvalidCredentials { detail, code } => {
                assert_eq!(detail, "Invalid OAuth token");
                assert_eq!(code, Some(53));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn validate_falls_back_to_error_string() {
        let transport = FakeTransport::new(
            200,
            r#"{ "error": { "error_code": 513, "error_string": "Login not found", "error_detail": "" } }"#,
        );
        let validator = make_validator(transport);

        let err = validator.validate(&credentials()).await.unwrap_err();
        assert!(matches!(
            err,
            DirectError::InvalidCredentials { ref detail, .. } if detail == "Login not found"
        ));
    }

    #[tokio::test]
    async fn validate_maps_non_success_status() {
        let validator = make_validator(FakeTransport::new(400, "bad request"));

        let err = validator.validate(&credentials()).await.unwrap_err();
        assert!(matches!(err, DirectError::HttpStatus { status: 400, .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn validate_maps_invalid_json_to_decode_error() {
        let validator = make_validator(FakeTransport::new(200, "not json"));

        let err = validator.validate(&credentials()).await.unwrap_err();
        assert!(matches!(err, DirectError::Decode(_)));
    }
}
