//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use scratch_billing::{BillingError, ChargeResult, IdempotencyKey};

use crate::state::AppState;

/// Optional header forwarded to the gateway to collapse retried charges
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
    pub gateway: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: bool,
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            status: false,
            error,
            code: code.into(),
        }),
    )
}

fn billing_error_status(err: &BillingError) -> StatusCode {
    match err {
        BillingError::MalformedRequest(_)
        | BillingError::InvalidQuantity(_)
        | BillingError::InvalidIdempotencyKey(_) => StatusCode::BAD_REQUEST,
        BillingError::PaymentDeclined { .. } => StatusCode::PAYMENT_REQUIRED,
        BillingError::GatewayRejected(_) => StatusCode::BAD_GATEWAY,
        BillingError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        BillingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<BillingError> for ErrorResponse {
    fn from(err: BillingError) -> Self {
        Self {
            status: false,
            error: err.user_message(),
            code: err.code().into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.billing.is_some(),
        gateway: state
            .billing
            .as_ref()
            .map(|billing| billing.gateway_name().to_string()),
    })
}

/// Charge the caller's card for a storage quota
pub async fn create_charge(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChargeResult>, ApiError> {
    let billing = state.billing.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured".into(),
            "PAYMENTS_DISABLED",
        )
    })?;

    let idempotency_key = match headers.get(IDEMPOTENCY_KEY_HEADER) {
        Some(value) => {
            let key = value
                .to_str()
                .map_err(|_| BillingError::InvalidIdempotencyKey("header is not ASCII".into()))
                .and_then(IdempotencyKey::new)
                .map_err(|e| (billing_error_status(&e), Json(ErrorResponse::from(e))))?;
            Some(key)
        }
        None => None,
    };

    let result = billing
        .handle_idempotent(&body, idempotency_key)
        .await
        .map_err(|e| (billing_error_status(&e), Json(ErrorResponse::from(e))))?;

    Ok(Json(result))
}
