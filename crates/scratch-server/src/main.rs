//! Scratch billing HTTP server
//!
//! Axum-based server exposing the storage billing endpoint. Requests are
//! expected to be authenticated upstream.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scratch_billing::{BillingConfig, ChargeHandler, MockGateway, STRIPE_SECRET_KEY_VAR};

use crate::handlers::{create_charge, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(charge_handler_from_env());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("scratch-server running on http://{}", addr);
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("  POST /billing - Charge for storage");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Pick the gateway from `BILLING_GATEWAY` (`stripe` or `mock`)
fn charge_handler_from_env() -> Option<ChargeHandler> {
    let gateway = std::env::var("BILLING_GATEWAY").unwrap_or_else(|_| "stripe".into());

    if gateway.eq_ignore_ascii_case("mock") {
        tracing::warn!("Using mock payment gateway - no real charges will be made");
        return Some(ChargeHandler::new(Arc::new(MockGateway::approving())));
    }

    match BillingConfig::from_env() {
        Ok(config) => {
            tracing::info!("Stripe configured");
            Some(ChargeHandler::from_config(&config))
        }
        Err(e) => {
            tracing::warn!("Payments disabled: {}", e);
            tracing::warn!("  Set {} in .env", STRIPE_SECRET_KEY_VAR);
            None
        }
    }
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/billing", post(create_charge))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
