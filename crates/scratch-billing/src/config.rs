//! Billing Configuration

use crate::error::{BillingError, Result};

/// Environment variable holding the Stripe secret key
pub const STRIPE_SECRET_KEY_VAR: &str = "STRIPE_SECRET_KEY";

/// Optional override of the Stripe API host, e.g. a local stripe-mock
pub const STRIPE_API_BASE_VAR: &str = "STRIPE_API_BASE";

/// Startup configuration for the charge pipeline.
///
/// Built once and passed by reference to [`crate::ChargeHandler::from_config`].
#[derive(Clone)]
pub struct BillingConfig {
    stripe_secret_key: String,
    stripe_api_base: Option<String>,
}

impl BillingConfig {
    pub fn new(stripe_secret_key: impl Into<String>) -> Result<Self> {
        let stripe_secret_key = stripe_secret_key.into();
        if stripe_secret_key.trim().is_empty() {
            return Err(BillingError::Config(format!("{STRIPE_SECRET_KEY_VAR} is empty")));
        }
        Ok(Self {
            stripe_secret_key,
            stripe_api_base: None,
        })
    }

    /// Send Stripe requests to `base` instead of api.stripe.com
    pub fn with_api_base(mut self, base: impl Into<String>) -> Result<Self> {
        let base = base.into();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(BillingError::Config(format!(
                "{STRIPE_API_BASE_VAR} must be an http(s) URL, got {base:?}"
            )));
        }
        self.stripe_api_base = Some(base);
        Ok(self)
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(STRIPE_SECRET_KEY_VAR)
            .map_err(|_| BillingError::Config(format!("{STRIPE_SECRET_KEY_VAR} not set")))?;
        let config = Self::new(key)?;

        match std::env::var(STRIPE_API_BASE_VAR) {
            Ok(base) if !base.trim().is_empty() => config.with_api_base(base),
            _ => Ok(config),
        }
    }

    pub(crate) fn stripe_secret_key(&self) -> &str {
        &self.stripe_secret_key
    }

    pub(crate) fn stripe_api_base(&self) -> Option<&str> {
        self.stripe_api_base.as_deref()
    }
}

impl std::fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingConfig")
            .field("stripe_secret_key", &"<redacted>")
            .field("stripe_api_base", &self.stripe_api_base)
            .finish()
    }
}
