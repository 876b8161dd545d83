//! Payment Gateway Integration
//!
//! The charge handler talks to the card processor only through
//! [`ChargeGateway`], so tests can swap Stripe for [`MockGateway`].

mod mock;
mod stripe_gateway;

pub use self::mock::{MockGateway, MockOutcome};
pub use self::stripe_gateway::StripeGateway;

use async_trait::async_trait;

use crate::error::Result;
use crate::pricing::MonetaryAmount;
use crate::request::IdempotencyKey;

/// Currency every charge is made in
pub const CHARGE_CURRENCY: &str = "usd";

/// Statement description attached to every charge
pub const CHARGE_DESCRIPTION: &str = "Scratch charge";

/// Smallest amount Stripe accepts for a USD charge
pub const MIN_CHARGE_AMOUNT: MonetaryAmount = MonetaryAmount::from_minor_units(50);

/// Parameters for a single charge attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeParams {
    pub payment_token: String,
    pub amount: MonetaryAmount,
    pub currency: &'static str,
    pub description: &'static str,
    pub idempotency_key: Option<IdempotencyKey>,
}

impl ChargeParams {
    pub fn new(payment_token: impl Into<String>, amount: MonetaryAmount) -> Self {
        Self {
            payment_token: payment_token.into(),
            amount,
            currency: CHARGE_CURRENCY,
            description: CHARGE_DESCRIPTION,
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: Option<IdempotencyKey>) -> Self {
        self.idempotency_key = key;
        self
    }
}

/// Gateway-side record of a successful charge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeConfirmation {
    pub charge_id: String,
}

/// Card processor client (Strategy pattern)
#[async_trait]
pub trait ChargeGateway: Send + Sync {
    /// Make exactly one charge attempt
    async fn create_charge(&self, params: &ChargeParams) -> Result<ChargeConfirmation>;

    /// Gateway name
    fn name(&self) -> &str;
}
