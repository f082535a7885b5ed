use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::TransportError;
use crate::domain::Token;

/// All legacy calls are sent with the Russian locale.
const LEGACY_LOCALE: &str = "ru";

/// Application-level error carried by a 2xx Live v4 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    pub message: String,
    pub code: Option<i64>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegacyReply<T> {
    Data(T),
    Fault(RemoteFault),
}

impl<T> LegacyReply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LegacyReply<U> {
        match self {
            Self::Data(data) => LegacyReply::Data(f(data)),
            Self::Fault(fault) => LegacyReply::Fault(fault),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyJsonResponse<T> {
    data: Option<T>,
    #[serde(default)]
    error_str: Option<String>,
    #[serde(default)]
    error_code: Option<TransportInt>,
    #[serde(default)]
    error_detail: Option<String>,
}

/// Integer that the API sometimes serializes as a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum TransportInt {
    Int(i64),
    String(String),
}

impl TransportInt {
    pub(super) fn into_i64(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::String(value) => value.trim().parse::<i64>().ok(),
        }
    }
}

pub(super) fn encode_legacy_body(method: &str, token: &Token, param: Option<Value>) -> Value {
    let mut body = Map::new();
    body.insert("method".to_owned(), json!(method));
    body.insert(Token::FIELD.to_owned(), json!(token.as_str()));
    body.insert("locale".to_owned(), json!(LEGACY_LOCALE));
    if let Some(param) = param {
        body.insert("param".to_owned(), param);
    }
    Value::Object(body)
}

/// Decode the `{data}` / `{error_str}` envelope shared by every Live v4 method.
///
/// `error_str` wins over `data` when both are present.
pub(super) fn decode_legacy_json_response<T>(json: &str) -> Result<LegacyReply<T>, TransportError>
where
    T: DeserializeOwned,
{
    let parsed: LegacyJsonResponse<T> = serde_json::from_str(json)?;
    if let Some(message) = parsed.error_str {
        return Ok(LegacyReply::Fault(RemoteFault {
            message,
            code: parsed.error_code.and_then(TransportInt::into_i64),
            detail: parsed.error_detail.filter(|detail| !detail.is_empty()),
        }));
    }
    parsed
        .data
        .map(LegacyReply::Data)
        .ok_or(TransportError::MissingData)
}
