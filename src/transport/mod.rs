//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod account;
mod legacy;
mod money;
mod v5;
mod wordstat;

pub use account::{
    decode_account_balance_json_response, decode_clients_units_json_response,
    encode_account_balance_body, encode_clients_units_body,
};
pub use legacy::LegacyReply;
pub use v5::{
    CHECK_CAMPAIGNS_SERVICE, decode_v5_json_response, encode_check_campaigns_body, v5_headers,
};
pub use wordstat::{
    decode_create_report_json_response, decode_delete_report_json_response,
    decode_report_list_json_response, decode_wordstat_report_json_response,
    encode_create_report_body, encode_delete_report_body, encode_report_list_body,
    encode_wordstat_report_body,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has neither `data` nor `error_str`")]
    MissingData,

    #[error("{method} returned no entry for login {login}")]
    MissingAccount { method: &'static str, login: String },
}
