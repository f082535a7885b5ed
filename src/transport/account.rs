use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use super::TransportError;
use super::legacy::{LegacyReply, TransportInt, decode_legacy_json_response, encode_legacy_body};
use super::money::TransportMoney;
use crate::domain::{Login, Token};

const CLIENTS_UNITS_METHOD: &str = "GetClientsUnits";
const ACCOUNT_MANAGEMENT_METHOD: &str = "AccountManagement";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ClientUnitsJson {
    #[serde(default)]
    units_rest: Option<TransportInt>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountManagementJson {
    #[serde(default)]
    accounts: Vec<AccountJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountJson {
    #[serde(default)]
    amount: Option<TransportMoney>,
}

pub fn encode_clients_units_body(token: &Token, login: &Login) -> Value {
    encode_legacy_body(
        CLIENTS_UNITS_METHOD,
        token,
        Some(json!([login.as_str()])),
    )
}

pub fn encode_account_balance_body(token: &Token, login: &Login) -> Value {
    encode_legacy_body(
        ACCOUNT_MANAGEMENT_METHOD,
        token,
        Some(json!({
            "Action": "Get",
            "SelectionCriteria": {
                "Logins": [login.as_str()]
            }
        })),
    )
}

/// Remaining API units for the first (and only) requested login.
pub fn decode_clients_units_json_response(
    login: &Login,
    json: &str,
) -> Result<LegacyReply<i64>, TransportError> {
    match decode_legacy_json_response::<Vec<ClientUnitsJson>>(json)? {
        LegacyReply::Fault(fault) => Ok(LegacyReply::Fault(fault)),
        LegacyReply::Data(entries) => entries
            .into_iter()
            .next()
            .and_then(|entry| entry.units_rest)
            .and_then(TransportInt::into_i64)
            .map(LegacyReply::Data)
            .ok_or_else(|| TransportError::MissingAccount {
                method: CLIENTS_UNITS_METHOD,
                login: login.as_str().to_owned(),
            }),
    }
}

/// Balance of the first account; `Data(None)` when the server reports no amount.
pub fn decode_account_balance_json_response(
    login: &Login,
    json: &str,
) -> Result<LegacyReply<Option<Decimal>>, TransportError> {
    match decode_legacy_json_response::<AccountManagementJson>(json)? {
        LegacyReply::Fault(fault) => Ok(LegacyReply::Fault(fault)),
        LegacyReply::Data(data) => data
            .accounts
            .into_iter()
            .next()
            .map(|account| LegacyReply::Data(account.amount.and_then(TransportMoney::into_decimal)))
            .ok_or_else(|| TransportError::MissingAccount {
                method: ACCOUNT_MANAGEMENT_METHOD,
                login: login.as_str().to_owned(),
            }),
    }
}
