use serde::Deserialize;
use serde_json::{Value, json};

use super::TransportError;
use super::legacy::{LegacyReply, decode_legacy_json_response, encode_legacy_body};
use crate::domain::{
    GeoId, Phrase, PhraseShows, ReportId, ReportInfo, ReportRequest, ReportStatus, Token,
    WordstatItem,
};

const CREATE_REPORT_METHOD: &str = "CreateNewWordstatReport";
const REPORT_LIST_METHOD: &str = "GetWordstatReportList";
const WORDSTAT_REPORT_METHOD: &str = "GetWordstatReport";
const DELETE_REPORT_METHOD: &str = "DeleteWordstatReport";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReportInfoJson {
    #[serde(rename = "ReportID")]
    report_id: i64,
    status_report: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WordstatItemJson {
    phrase: String,
    #[serde(rename = "GeoID", default)]
    geo_id: Vec<i64>,
    #[serde(default)]
    searched_with: Vec<PhraseShowsJson>,
    #[serde(default)]
    searched_also: Vec<PhraseShowsJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PhraseShowsJson {
    phrase: String,
    shows: u64,
}

impl From<PhraseShowsJson> for PhraseShows {
    fn from(value: PhraseShowsJson) -> Self {
        Self {
            phrase: value.phrase,
            shows: value.shows,
        }
    }
}

impl From<WordstatItemJson> for WordstatItem {
    fn from(value: WordstatItemJson) -> Self {
        Self {
            phrase: value.phrase,
            geo_ids: value.geo_id.into_iter().map(GeoId::new).collect(),
            searched_with: value.searched_with.into_iter().map(Into::into).collect(),
            searched_also: value.searched_also.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn encode_create_report_body(token: &Token, request: &ReportRequest) -> Value {
    let phrases = request
        .phrases()
        .iter()
        .map(Phrase::as_str)
        .collect::<Vec<_>>();
    let geo_ids = request
        .geo_ids()
        .iter()
        .map(|geo_id| geo_id.get())
        .collect::<Vec<_>>();
    encode_legacy_body(
        CREATE_REPORT_METHOD,
        token,
        Some(json!({
            "Phrases": phrases,
            "GeoID": geo_ids,
        })),
    )
}

pub fn encode_report_list_body(token: &Token) -> Value {
    encode_legacy_body(REPORT_LIST_METHOD, token, None)
}

pub fn encode_wordstat_report_body(token: &Token, id: ReportId) -> Value {
    encode_legacy_body(WORDSTAT_REPORT_METHOD, token, Some(json!(id.get())))
}

pub fn encode_delete_report_body(token: &Token, id: ReportId) -> Value {
    encode_legacy_body(DELETE_REPORT_METHOD, token, Some(json!(id.get())))
}

pub fn decode_create_report_json_response(
    json: &str,
) -> Result<LegacyReply<ReportId>, TransportError> {
    Ok(decode_legacy_json_response::<i64>(json)?.map(ReportId::new))
}

pub fn decode_report_list_json_response(
    json: &str,
) -> Result<LegacyReply<Vec<ReportInfo>>, TransportError> {
    let reply = decode_legacy_json_response::<Vec<ReportInfoJson>>(json)?;
    Ok(reply.map(|entries| {
        entries
            .into_iter()
            .map(|entry| ReportInfo {
                id: ReportId::new(entry.report_id),
                status: ReportStatus::from_wire(&entry.status_report),
            })
            .collect()
    }))
}

pub fn decode_wordstat_report_json_response(
    json: &str,
) -> Result<LegacyReply<Vec<WordstatItem>>, TransportError> {
    let reply = decode_legacy_json_response::<Vec<WordstatItemJson>>(json)?;
    Ok(reply.map(|items| items.into_iter().map(Into::into).collect()))
}

/// The server answers a delete with `data: 1`; the value carries no information.
pub fn decode_delete_report_json_response(json: &str) -> Result<LegacyReply<()>, TransportError> {
    Ok(decode_legacy_json_response::<Value>(json)?.map(|_| ()))
}
