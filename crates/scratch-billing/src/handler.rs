//! Charge Handler
//!
//! Validates a billing request, prices it and makes exactly one charge
//! attempt. No retries and no local deduplication: two identical requests
//! are two charges unless the caller supplies an idempotency key.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;

use crate::config::BillingConfig;
use crate::error::{BillingError, Result};
use crate::gateway::{ChargeGateway, ChargeParams, MIN_CHARGE_AMOUNT, StripeGateway};
use crate::pricing::compute_amount;
use crate::request::{ChargeRequest, IdempotencyKey};

/// Response body of a successful charge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeResult {
    pub status: bool,
}

impl ChargeResult {
    pub fn succeeded() -> Self {
        Self { status: true }
    }
}

/// Stateless charge pipeline over an injected gateway
#[derive(Clone)]
pub struct ChargeHandler {
    gateway: Arc<dyn ChargeGateway>,
}

impl ChargeHandler {
    pub fn new(gateway: Arc<dyn ChargeGateway>) -> Self {
        Self { gateway }
    }

    /// Charge through Stripe with the configured secret key
    pub fn from_config(config: &BillingConfig) -> Self {
        Self::new(Arc::new(StripeGateway::new(config)))
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Handle a raw `POST /billing` body
    pub async fn handle(&self, body: &[u8]) -> Result<ChargeResult> {
        self.handle_idempotent(body, None).await
    }

    /// Like [`Self::handle`], forwarding `idempotency_key` to the gateway
    pub async fn handle_idempotent(
        &self,
        body: &[u8],
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<ChargeResult> {
        let span = tracing::info_span!(
            "charge",
            invocation_id = %uuid::Uuid::new_v4(),
            gateway = self.gateway.name()
        );
        self.charge(body, idempotency_key).instrument(span).await
    }

    async fn charge(
        &self,
        body: &[u8],
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<ChargeResult> {
        let request = ChargeRequest::from_slice(body).inspect_err(|e| {
            tracing::warn!(code = e.code(), "Rejected billing request: {}", e);
        })?;

        let amount = compute_amount(request.quantity);
        if amount < MIN_CHARGE_AMOUNT {
            let err = BillingError::InvalidQuantity(format!(
                "{} storage units cost {amount}, below the minimum charge of {MIN_CHARGE_AMOUNT}",
                request.quantity
            ));
            tracing::warn!(code = err.code(), storage = request.quantity.get(), "Nothing to charge");
            return Err(err);
        }

        tracing::info!(
            storage = request.quantity.get(),
            amount = amount.minor_units(),
            idempotent = idempotency_key.is_some(),
            "Charging {}",
            amount
        );

        let params =
            ChargeParams::new(request.payment_token, amount).with_idempotency_key(idempotency_key);

        match self.gateway.create_charge(&params).await {
            Ok(confirmation) => {
                tracing::info!(charge_id = %confirmation.charge_id, "Charge succeeded");
                Ok(ChargeResult::succeeded())
            }
            Err(e @ BillingError::PaymentDeclined { .. }) => {
                // Decline reasons may quote the token; keep them out of the log.
                if let BillingError::PaymentDeclined { decline_code, .. } = &e {
                    tracing::warn!(code = e.code(), decline_code = ?decline_code, "Charge declined");
                }
                Err(e)
            }
            Err(e) if e.is_client_error() => {
                tracing::warn!(code = e.code(), "Charge failed");
                Err(e)
            }
            Err(e) => {
                tracing::error!(code = e.code(), "Charge failed: {}", e);
                Err(e)
            }
        }
    }
}
