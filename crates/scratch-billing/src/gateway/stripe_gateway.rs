//! Stripe Charges Integration
//!
//! Creates one-off card charges from a client-side token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{Client, ErrorCode, ErrorType, RequestStrategy, StripeError};

use super::{ChargeConfirmation, ChargeGateway, ChargeParams};
use crate::config::BillingConfig;
use crate::error::{BillingError, Result};

/// Stands in for the payment token in gateway messages
const REDACTED_TOKEN: &str = "[token]";

/// Form body for `POST /v1/charges`
#[derive(Debug, Serialize)]
struct CreateChargeForm<'a> {
    amount: i64,
    currency: &'a str,
    source: &'a str,
    description: &'a str,
}

/// The parts of a Stripe charge object we read back
#[derive(Debug, Deserialize)]
struct StripeCharge {
    id: String,
    paid: bool,
    #[serde(default)]
    failure_code: Option<String>,
    #[serde(default)]
    failure_message: Option<String>,
}

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    pub fn new(config: &BillingConfig) -> Self {
        let client = match config.stripe_api_base() {
            Some(base) => Client::from_url(base, config.stripe_secret_key()),
            None => Client::new(config.stripe_secret_key()),
        };
        Self { client }
    }
}

#[async_trait]
impl ChargeGateway for StripeGateway {
    async fn create_charge(&self, params: &ChargeParams) -> Result<ChargeConfirmation> {
        let form = CreateChargeForm {
            amount: params.amount.to_i64()?,
            currency: params.currency,
            source: &params.payment_token,
            description: params.description,
        };

        let client = match &params.idempotency_key {
            Some(key) => self
                .client
                .clone()
                .with_strategy(RequestStrategy::Idempotent(key.to_string())),
            None => self.client.clone(),
        };

        let charge: StripeCharge = client
            .post_form("/charges", &form)
            .await
            .map_err(|e| classify_stripe_error(e, &params.payment_token))?;

        if !charge.paid {
            let reason = charge
                .failure_message
                .map_or_else(|| "charge was not paid".into(), |m| redact(&m, &params.payment_token));
            return Err(BillingError::PaymentDeclined {
                reason,
                decline_code: charge.failure_code,
            });
        }

        Ok(ChargeConfirmation {
            charge_id: charge.id,
        })
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

/// Gateway messages can quote the token back ("No such token: 'tok_...'").
fn redact(message: &str, payment_token: &str) -> String {
    if payment_token.is_empty() {
        return message.to_string();
    }
    message.replace(payment_token, REDACTED_TOKEN)
}

fn classify_stripe_error(err: StripeError, payment_token: &str) -> BillingError {
    match err {
        StripeError::Stripe(request_error) => {
            let message = request_error.message.map_or_else(
                || format!("Stripe returned HTTP {}", request_error.http_status),
                |m| redact(&m, payment_token),
            );
            classify_api_error(
                request_error.http_status,
                &request_error.error_type,
                matches!(request_error.code, Some(ErrorCode::ResourceMissing)),
                message,
                request_error.decline_code,
            )
        }
        other => BillingError::GatewayUnavailable(redact(&other.to_string(), payment_token)),
    }
}

/// Map a Stripe API error onto our error kinds.
///
/// Only the token is a resource in a charge request, so `resource_missing`
/// on an invalid request means the token does not exist.
fn classify_api_error(
    http_status: u16,
    error_type: &ErrorType,
    resource_missing: bool,
    message: String,
    decline_code: Option<String>,
) -> BillingError {
    match error_type {
        ErrorType::Card => BillingError::PaymentDeclined {
            reason: message,
            decline_code,
        },
        ErrorType::InvalidRequest if resource_missing => BillingError::PaymentDeclined {
            reason: message,
            decline_code: Some("invalid_token".into()),
        },
        ErrorType::InvalidRequest => BillingError::GatewayRejected(message),
        ErrorType::IdempotencyError => BillingError::InvalidIdempotencyKey(
            "key was already used with different request parameters".into(),
        ),
        ErrorType::RateLimit | ErrorType::Api => BillingError::GatewayUnavailable(message),
        _ => match http_status {
            402 => BillingError::PaymentDeclined {
                reason: message,
                decline_code,
            },
            429 | 500..=599 => BillingError::GatewayUnavailable(message),
            _ => BillingError::GatewayRejected(message),
        },
    }
}
