//! Application State

use std::sync::Arc;

use scratch_billing::ChargeHandler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Charge pipeline (optional - None if payments are not configured)
    pub billing: Option<Arc<ChargeHandler>>,
}

impl AppState {
    pub fn new(billing: Option<ChargeHandler>) -> Self {
        Self {
            billing: billing.map(Arc::new),
        }
    }
}
