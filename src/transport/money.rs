use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::Error as DeError;

/// Money-like value returned by Live v4 as either JSON string or JSON number.
///
/// Numbers are parsed from the raw JSON token so no float rounding happens
/// (`10.00` stays `10.00`). An empty string means "no amount".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMoney(Option<Decimal>);

impl TransportMoney {
    pub fn into_decimal(self) -> Option<Decimal> {
        self.0
    }
}

fn parse_decimal<E: DeError>(token: &str) -> Result<Decimal, E> {
    Decimal::from_str(token)
        .or_else(|_| Decimal::from_scientific(token))
        .map_err(|err| E::custom(format!("invalid money value {token:?}: {err}")))
}

impl<'de> Deserialize<'de> for TransportMoney {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                let trimmed = parsed.trim();
                if trimmed.is_empty() {
                    return Ok(Self(None));
                }
                Ok(Self(Some(parse_decimal::<D::Error>(trimmed)?)))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(Some(parse_decimal::<D::Error>(token)?))),
            Some(b'n') => Ok(Self(None)),
            _ => Err(D::Error::custom(
                "expected money field to be JSON string or number",
            )),
        }
    }
}
