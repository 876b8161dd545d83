//! Mock Gateway
//!
//! For tests and local runs. Never touches the network.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ChargeConfirmation, ChargeGateway, ChargeParams};
use crate::error::{BillingError, Result};

/// What the mock answers to every charge
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockOutcome {
    Approve,
    Decline(String),
    Unavailable,
}

/// Mock gateway with a fixed outcome that records every attempt
pub struct MockGateway {
    outcome: MockOutcome,
    calls: Mutex<Vec<ChargeParams>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::approving()
    }
}

impl MockGateway {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn approving() -> Self {
        Self::new(MockOutcome::Approve)
    }

    pub fn declining(reason: impl Into<String>) -> Self {
        Self::new(MockOutcome::Decline(reason.into()))
    }

    pub fn unavailable() -> Self {
        Self::new(MockOutcome::Unavailable)
    }

    /// Charge attempts seen so far, oldest first
    pub async fn calls(&self) -> Vec<ChargeParams> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ChargeGateway for MockGateway {
    async fn create_charge(&self, params: &ChargeParams) -> Result<ChargeConfirmation> {
        let attempt = {
            let mut calls = self.calls.lock().await;
            calls.push(params.clone());
            calls.len()
        };

        match &self.outcome {
            MockOutcome::Approve => Ok(ChargeConfirmation {
                charge_id: format!("ch_mock_{attempt}"),
            }),
            MockOutcome::Decline(reason) => Err(BillingError::declined(reason.clone())),
            MockOutcome::Unavailable => Err(BillingError::GatewayUnavailable(
                "mock gateway is offline".into(),
            )),
        }
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}
