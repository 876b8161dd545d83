//! Billing Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, BillingError>;

/// Billing-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Body is not JSON, or `source`/`storage` are missing or mistyped
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Storage quantity is negative, fractional or too large
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Caller-supplied idempotency key is unusable
    #[error("Invalid idempotency key: {0}")]
    InvalidIdempotencyKey(String),

    /// Card or token was refused by the gateway
    #[error("Payment declined: {reason}")]
    PaymentDeclined {
        reason: String,
        decline_code: Option<String>,
    },

    /// Gateway could not be reached or failed transiently
    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// Gateway refused the request for a reason unrelated to the card
    #[error("Payment gateway rejected request: {0}")]
    GatewayRejected(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BillingError {
    pub fn declined(reason: impl Into<String>) -> Self {
        Self::PaymentDeclined {
            reason: reason.into(),
            decline_code: None,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidIdempotencyKey(_) => "INVALID_IDEMPOTENCY_KEY",
            Self::PaymentDeclined { .. } => "PAYMENT_DECLINED",
            Self::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
            Self::GatewayRejected(_) => "GATEWAY_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_)
                | Self::InvalidQuantity(_)
                | Self::InvalidIdempotencyKey(_)
                | Self::PaymentDeclined { .. }
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedRequest(msg) => format!("Invalid billing request: {msg}"),
            Self::InvalidQuantity(msg) => format!("Invalid storage quantity: {msg}"),
            Self::InvalidIdempotencyKey(msg) => format!("Invalid idempotency key: {msg}"),
            // The gateway's reason can quote the payment token back.
            Self::PaymentDeclined { decline_code, .. } => match decline_code {
                Some(code) => format!("Your card was declined ({code})."),
                None => "Your card was declined.".into(),
            },
            Self::GatewayUnavailable(_) => {
                "Payment processing is temporarily unavailable. Please try again later.".into()
            }
            Self::GatewayRejected(_) => "Payment processing failed.".into(),
            Self::Config(_) => "Service configuration error.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_for_gateway_failures() {
        let declined = BillingError::declined("card_declined");
        let unavailable = BillingError::GatewayUnavailable("timeout".into());

        assert_eq!(declined.code(), "PAYMENT_DECLINED");
        assert_eq!(unavailable.code(), "GATEWAY_UNAVAILABLE");
        assert!(declined.is_client_error());
        assert!(!unavailable.is_client_error());
    }

    #[test]
    fn test_declined_message_omits_gateway_reason() {
        let err = BillingError::declined("No such token: 'tok_bogus'");
        assert_eq!(err.user_message(), "Your card was declined.");

        let err = BillingError::PaymentDeclined {
            reason: "Your card has insufficient funds.".into(),
            decline_code: Some("insufficient_funds".into()),
        };
        assert_eq!(err.user_message(), "Your card was declined (insufficient_funds).");
    }

    #[test]
    fn test_user_message_hides_gateway_details() {
        let err = BillingError::GatewayRejected("Invalid API Key provided: sk_test_***".into());
        assert!(!err.user_message().contains("sk_test"));
    }
}
