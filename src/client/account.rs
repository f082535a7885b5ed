use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use super::{DEFAULT_V4_ENDPOINT, DirectError, LegacyApi, ReqwestTransport, settle};
use crate::domain::{AccountStanding, Credentials};
use crate::transport::{
    decode_account_balance_json_response, decode_clients_units_json_response,
    encode_account_balance_body, encode_clients_units_body,
};

#[derive(Clone)]
/// Read-only account queries over Live v4.
///
/// Every call is a fresh round-trip; nothing is cached.
pub struct AccountInfoClient {
    legacy: LegacyApi,
}

impl Default for AccountInfoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountInfoClient {
    /// Create a client using the default Live v4 endpoint.
    pub fn new() -> Self {
        Self::from_parts(LegacyApi {
            endpoint: DEFAULT_V4_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        })
    }

    pub(super) fn from_parts(legacy: LegacyApi) -> Self {
        Self { legacy }
    }

    /// Remaining API units for the login (`GetClientsUnits`).
    pub async fn quota_remaining(&self, credentials: &Credentials) -> Result<i64, DirectError> {
        info!(login = credentials.login().as_str(), "requesting remaining API units");
        let body = self
            .legacy
            .call(encode_clients_units_body(
                credentials.token(),
                credentials.login(),
            ))
            .await?;
        let units = settle(decode_clients_units_json_response(
            credentials.login(),
            &body,
        ))?;
        info!(login = credentials.login().as_str(), units, "API units on account");
        Ok(units)
    }

    /// Account balance (`AccountManagement`, action `Get`).
    ///
    /// `Ok(None)` means the server reported no amount, which is not the same as a zero balance.
    pub async fn balance(&self, credentials: &Credentials) -> Result<Option<Decimal>, DirectError> {
        info!(login = credentials.login().as_str(), "requesting account balance");
        let body = self
            .legacy
            .call(encode_account_balance_body(
                credentials.token(),
                credentials.login(),
            ))
            .await?;
        let balance = settle(decode_account_balance_json_response(
            credentials.login(),
            &body,
        ))?;
        info!(
            login = credentials.login().as_str(),
            balance = ?balance,
            "account balance"
        );
        Ok(balance)
    }

    /// Units and balance in one snapshot (two requests).
    pub async fn standing(&self, credentials: &Credentials) -> Result<AccountStanding, DirectError> {
        let quota_units_remaining = self.quota_remaining(credentials).await?;
        let balance = self.balance(credentials).await?;
        Ok(AccountStanding {
            quota_units_remaining,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::fake::FakeTransport;
    use super::*;

    fn make_client(transport: FakeTransport) -> AccountInfoClient {
        AccountInfoClient::from_parts(LegacyApi {
            endpoint: "https://example.invalid/live/v4/json/".to_owned(),
            http: Arc::new(transport),
        })
    }

    fn credentials() -> Credentials {
        Credentials::new("agency-client", "test_token").unwrap()
    }

    #[tokio::test]
    async fn quota_remaining_reads_units_rest() {
        let transport = FakeTransport::new(
            200,
            r#"{ "data": [ { "Login": "agency-client", "UnitsRest": 31999 } ] }"#,
        );
        let client = make_client(transport.clone());

        assert_eq!(client.quota_remaining(&credentials()).await.unwrap(), 31999);
        assert_eq!(
            transport.last_request().body,
            json!({
                "method": "GetClientsUnits",
                "token": "test_token",
                "locale": "ru",
                "param": ["agency-client"]
            })
        );
    }

    #[tokio::test]
    async fn balance_distinguishes_absent_from_zero() {
        let client = make_client(FakeTransport::new(
            200,
            r#"{ "data": { "Accounts": [ { "Amount": "0.00" } ] } }"#,
        ));
        assert_eq!(
            client.balance(&credentials()).await.unwrap(),
            Some(Decimal::ZERO)
        );

        let client = make_client(FakeTransport::new(
            200,
            r#"{ "data": { "Accounts": [ { "Amount": "" } ] } }"#,
        ));
        assert_eq!(client.balance(&credentials()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn standing_combines_units_and_balance() {
        let transport = FakeTransport::sequence(vec![
            (200, r#"{ "data": [ { "UnitsRest": 120 } ] }"#.to_owned()),
            (200, r#"{ "data": { "Accounts": [ { "Amount": "1520.35" } ] } }"#.to_owned()),
        ]);
        let client = make_client(transport.clone());

        let standing = client.standing(&credentials()).await.unwrap();
        assert_eq!(
            standing,
            AccountStanding {
                quota_units_remaining: 120,
                balance: Some(Decimal::new(152035, 2)),
            }
        );
        assert_eq!(
            transport.methods(),
            vec!["GetClientsUnits", "AccountManagement"]
        );
    }

    #[tokio::test]
    async fn error_str_maps_to_remote_error() {
        let client = make_client(FakeTransport::new(
            200,
            r#"{ "error_code": 53, "error_str": "Authorization error", "error_detail": "Invalid token" }"#,
        ));

        let err = client.balance(&credentials()).await.unwrap_err();
        match err {
            DirectError::Remote {
                message,
                code,
                detail,
            } => {
                assert_eq!(message, "Authorization error");
                assert_eq!(code, Some(53));
                assert_eq!(detail.as_deref(), Some("Invalid token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_account_maps_to_decode_error() {
        let client = make_client(FakeTransport::new(200, r#"{ "data": [] }"#));

        let err = client.quota_remaining(&credentials()).await.unwrap_err();
        assert!(matches!(err, DirectError::Decode(_)));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_transport_error() {
        let client = make_client(FakeTransport::new(502, ""));

        let err = client.quota_remaining(&credentials()).await.unwrap_err();
        assert!(matches!(
            err,
            DirectError::HttpStatus {
                status: 502,
                body: None
            }
        ));
    }
}
