//! Payment gateway endpoints. These delegate entirely to the external
//! rails; a gateway failure is a 500 with the message surfaced and no
//! change to any donation record.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use careworks_types::api::{CreateOrderRequest, PaymentIntentRequest, PaymentIntentResponse};

use crate::auth::AppState;
use crate::donations::validate_amount;
use crate::error::{ApiError, ApiJson};

/// Mint a Stripe payment intent. The browser confirms the charge with the
/// returned client secret; this server never sees the card.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("Stripe not configured".to_string()))?;

    validate_amount(&req.amount)?;

    let currency = req.currency.as_deref().unwrap_or("USD");
    let intent = stripe
        .create_payment_intent(&req.amount, currency, None)
        .await
        .map_err(|e| ApiError::Upstream(format!("Error creating payment intent: {}", e)))?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Client id handoff for the PayPal browser SDK.
pub async fn paypal_setup(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let paypal = state
        .paypal
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("PayPal not configured".to_string()))?;
    Ok(Json(json!({ "clientId": paypal.client_id() })))
}

pub async fn paypal_create_order(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let paypal = state
        .paypal
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("PayPal not configured".to_string()))?;

    validate_amount(&req.amount)?;

    let currency = req.currency.as_deref().unwrap_or("USD");
    let order = paypal
        .create_order(&req.amount, currency)
        .await
        .map_err(|e| ApiError::Upstream(format!("Error creating PayPal order: {}", e)))?;
    Ok(Json(order))
}

pub async fn paypal_capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let paypal = state
        .paypal
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("PayPal not configured".to_string()))?;

    let capture = paypal
        .capture_order(&order_id)
        .await
        .map_err(|e| ApiError::Upstream(format!("Error capturing PayPal order: {}", e)))?;
    Ok(Json(capture))
}
