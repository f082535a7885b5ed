use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::TransportError;
use super::legacy::TransportInt;
use crate::domain::Credentials;

/// v5 service used as a lightweight authenticated probe.
pub const CHECK_CAMPAIGNS_SERVICE: &str = "changes";

const CHECK_CAMPAIGNS_METHOD: &str = "checkCampaigns";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error object of a v5 response (`{"error": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V5Fault {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct V5JsonResponse {
    #[serde(default)]
    error: Option<V5ErrorJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct V5ErrorJson {
    #[serde(default)]
    error_code: Option<TransportInt>,
    #[serde(default)]
    error_string: Option<String>,
    #[serde(default)]
    error_detail: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

pub fn v5_headers(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        (
            "Authorization".to_owned(),
            format!("Bearer {}", credentials.token().as_str()),
        ),
        (
            "Client-Login".to_owned(),
            credentials.login().as_str().to_owned(),
        ),
        ("Accept-Language".to_owned(), "ru".to_owned()),
    ]
}

pub fn encode_check_campaigns_body(now: DateTime<Utc>) -> Value {
    json!({
        "method": CHECK_CAMPAIGNS_METHOD,
        "params": {
            "Timestamp": now.format(TIMESTAMP_FORMAT).to_string()
        }
    })
}

/// `Ok(None)` for a successful response, `Ok(Some(fault))` when it carries `error`.
pub fn decode_v5_json_response(json: &str) -> Result<Option<V5Fault>, TransportError> {
    let parsed: V5JsonResponse = serde_json::from_str(json)?;
    Ok(parsed.error.map(|error| V5Fault {
        code: error.error_code.and_then(TransportInt::into_i64),
        message: error.error_string,
        detail: error.error_detail,
        request_id: error.request_id,
    }))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn encode_check_campaigns_formats_utc_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 13, 5, 9).unwrap();
        assert_eq!(
            encode_check_campaigns_body(now),
            json!({
                "method": "checkCampaigns",
                "params": { "Timestamp": "2024-03-01T13:05:09Z" }
            })
        );
    }

    #[test]
    fn headers_carry_bearer_token_and_login() {
        let credentials = Credentials::new("client-login", "oauth-token").unwrap();
        let headers = v5_headers(&credentials);
        assert!(headers.contains(&("Authorization".to_owned(), "Bearer oauth-token".to_owned())));
        assert!(headers.contains(&("Client-Login".to_owned(), "client-login".to_owned())));
        assert!(headers.contains(&("Accept-Language".to_owned(), "ru".to_owned())));
    }

    #[test]
    fn decode_success_has_no_fault() {
        let json = r#"{ "result": { "Campaigns": [], "Timestamp": "2024-03-01T13:05:09Z" } }"#;
        assert_eq!(decode_v5_json_response(json).unwrap(), None);
    }

    #[test]
    fn decode_error_object() {
        let json = r#"
        {
          "error": {
            "request_id": "8695244274068608439",
            "error_code": 53,
            "error_string": "Authorization error",
            "error_detail": "Invalid OAuth token"
          }
        }
        "#;
        let fault = decode_v5_json_response(json).unwrap().unwrap();
        assert_eq!(fault.code, Some(53));
        assert_eq!(fault.message.as_deref(), Some("Authorization error"));
        assert_eq!(fault.detail.as_deref(), Some("Invalid OAuth token"));
        assert_eq!(fault.request_id.as_deref(), Some("8695244274068608439"));
    }
}
