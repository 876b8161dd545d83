//! # scratch-billing
//!
//! Storage quota billing for Scratch: price a storage request from a tiered
//! rate table and charge the user's card through Stripe.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐     ┌────────────┐
//! │ request body │────▶│ ChargeRequest │────▶│ compute_     │────▶│ Charge-    │
//! │ (JSON bytes) │     │ (validated)   │     │ amount       │     │ Gateway    │
//! └──────────────┘     └───────────────┘     └──────────────┘     └────────────┘
//! ```
//!
//! ## Rates
//!
//! | storage units | per unit |
//! |---------------|----------|
//! | 0 – 10        | $4       |
//! | 11 – 100      | $2       |
//! | over 100      | $1       |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scratch_billing::{BillingConfig, ChargeHandler};
//!
//! let config = BillingConfig::from_env()?;
//! let handler = ChargeHandler::from_config(&config);
//!
//! let result = handler.handle(br#"{"source":"tok_visa","storage":21}"#).await?;
//! assert!(result.status); // charged $42.00
//! ```

mod config;
mod error;
mod handler;
mod request;

pub mod gateway;
pub mod pricing;

pub use config::{BillingConfig, STRIPE_API_BASE_VAR, STRIPE_SECRET_KEY_VAR};
pub use error::{BillingError, Result};
pub use gateway::{ChargeConfirmation, ChargeGateway, ChargeParams, MockGateway, StripeGateway};
pub use handler::{ChargeHandler, ChargeResult};
pub use pricing::{MonetaryAmount, StorageQuantity, compute_amount};
pub use request::{ChargeRequest, IdempotencyKey};
