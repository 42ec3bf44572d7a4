use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::{BalanceSnapshot, FetchError};

/// The portal's `[statusCode, payload]` answer, decoded once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BalanceReply {
    /// `"RC"`: too many requests, the portal wants a captcha.
    CaptchaChallenge,
    /// `"HI"`: card number or card code rejected.
    InvalidIdentity,
    /// Any other code; the payload should carry the balances.
    Success { code: String, payload: Value },
}

impl BalanceReply {
    pub(crate) fn decode(body: &str) -> Result<Self, FetchError> {
        let (code, payload): (String, Value) = serde_json::from_str(body)
            .map_err(|e| FetchError::MalformedResponse(format!("expected [code, payload]: {e}")))?;

        Ok(match code.as_str() {
            "RC" => Self::CaptchaChallenge,
            "HI" => Self::InvalidIdentity,
            _ => Self::Success { code, payload },
        })
    }
}

#[derive(Deserialize)]
struct BalanceNode {
    #[serde(rename = "szamla_osszeg9", deserialize_with = "de_i64_from_any")]
    accommodation: i64,
    #[serde(rename = "szamla_osszeg8", deserialize_with = "de_i64_from_any")]
    active_hungarians: i64,
}

/// Pulls both pockets out of a success payload; either both or an error.
pub(crate) fn extract_snapshot(payload: Value) -> Result<BalanceSnapshot, FetchError> {
    let node: BalanceNode = serde_json::from_value(payload)
        .map_err(|e| FetchError::MalformedResponse(format!("balance fields: {e}")))?;

    Ok(BalanceSnapshot {
        accommodation: node.accommodation,
        active_hungarians: node.active_hungarians,
    })
}

// The portal is PHP; amounts show up as ints, whole floats or digit strings.
#[allow(clippy::cast_possible_truncation)]
fn de_i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AnyNumber {
        I64(i64),
        F64(f64),
        Str(String),
    }

    match AnyNumber::deserialize(deserializer)? {
        AnyNumber::I64(i) => Ok(i),
        AnyNumber::F64(f) => {
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Ok(f as i64)
            } else {
                Err(serde::de::Error::custom(format!(
                    "cannot convert float {f} to a whole amount"
                )))
            }
        }
        AnyNumber::Str(s) => s.trim().parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("cannot convert {s:?} to a whole amount"))
        }),
    }
}
