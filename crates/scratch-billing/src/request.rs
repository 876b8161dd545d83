//! Charge Request Schema
//!
//! Turns a raw request body into a validated [`ChargeRequest`] before any
//! pricing or gateway work happens.

use serde::Deserialize;
use serde_json::Number;

use crate::error::{BillingError, Result};
use crate::pricing::StorageQuantity;

/// Longest idempotency key the gateway accepts
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Wire shape of `POST /billing`
#[derive(Debug, Deserialize)]
struct RawChargeRequest {
    source: String,
    storage: Number,
}

/// Validated charge request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Requested storage units
    pub quantity: StorageQuantity,

    /// Tokenized payment method from the client SDK
    pub payment_token: String,
}

impl ChargeRequest {
    /// Parse and validate a JSON body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let raw: RawChargeRequest = serde_json::from_slice(body)
            .map_err(|e| BillingError::MalformedRequest(e.to_string()))?;

        if raw.source.trim().is_empty() {
            return Err(BillingError::MalformedRequest("`source` must not be empty".into()));
        }
        // Opaque: forwarded byte-for-byte, so stray whitespace is an error.
        if raw.source.trim() != raw.source {
            return Err(BillingError::MalformedRequest(
                "`source` must not have surrounding whitespace".into(),
            ));
        }

        Ok(Self {
            quantity: parse_quantity(&raw.storage)?,
            payment_token: raw.source,
        })
    }
}

/// Negative and fractional quantities are rejected, never clamped.
fn parse_quantity(storage: &Number) -> Result<StorageQuantity> {
    if let Some(units) = storage.as_u64() {
        return StorageQuantity::new(units);
    }
    if storage.is_i64() {
        return Err(BillingError::InvalidQuantity(format!(
            "{storage} is negative"
        )));
    }
    Err(BillingError::InvalidQuantity(format!(
        "{storage} is not a whole number"
    )))
}

/// Caller-supplied key the gateway uses to collapse retried charges
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(BillingError::InvalidIdempotencyKey("key is empty".into()));
        }
        if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(BillingError::InvalidIdempotencyKey(format!(
                "key is longer than {MAX_IDEMPOTENCY_KEY_LEN} characters"
            )));
        }
        if !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(BillingError::InvalidIdempotencyKey(
                "key must be printable ASCII without spaces".into(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_request() {
        let request = ChargeRequest::from_slice(br#"{"source":"tok_visa","storage":21}"#).unwrap();
        assert_eq!(request.payment_token, "tok_visa");
        assert_eq!(request.quantity.get(), 21);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let body = br#"{"source":"tok_visa","storage":0,"note":"hello"}"#;
        assert!(ChargeRequest::from_slice(body).is_ok());
    }

    #[test]
    fn test_malformed_bodies() {
        let cases: &[&[u8]] = &[
            b"",
            b"not json",
            b"[]",
            br#"{"storage":21}"#,
            br#"{"source":"tok_visa"}"#,
            br#"{"source":42,"storage":21}"#,
            br#"{"source":"tok_visa","storage":"21"}"#,
            br#"{"source":"   ","storage":21}"#,
        ];

        for body in cases {
            let err = ChargeRequest::from_slice(body).unwrap_err();
            assert_eq!(err.code(), "MALFORMED_REQUEST", "body: {}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn test_token_forwarded_unchanged() {
        let request = ChargeRequest::from_slice(br#"{"source":"src_1AbC","storage":3}"#).unwrap();
        assert_eq!(request.payment_token, "src_1AbC");

        for body in [
            br#"{"source":" tok_visa","storage":3}"#.as_slice(),
            br#"{"source":"tok_visa\n","storage":3}"#.as_slice(),
        ] {
            let err = ChargeRequest::from_slice(body).unwrap_err();
            assert_eq!(err.code(), "MALFORMED_REQUEST");
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = ChargeRequest::from_slice(br#"{"source":"tok_visa","storage":-5}"#).unwrap_err();
        assert!(matches!(err, BillingError::InvalidQuantity(_)));
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let err = ChargeRequest::from_slice(br#"{"source":"tok_visa","storage":2.5}"#).unwrap_err();
        assert!(matches!(err, BillingError::InvalidQuantity(_)));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let body = format!(r#"{{"source":"tok_visa","storage":{}}}"#, u64::MAX);
        let err = ChargeRequest::from_slice(body.as_bytes()).unwrap_err();
        assert!(matches!(err, BillingError::InvalidQuantity(_)));
    }

    #[test]
    fn test_idempotency_key_validation() {
        assert!(IdempotencyKey::new("order-123").is_ok());
        assert!(IdempotencyKey::new("").is_err());
        assert!(IdempotencyKey::new("has space").is_err());
        assert!(IdempotencyKey::new("k".repeat(MAX_IDEMPOTENCY_KEY_LEN + 1)).is_err());
    }
}
