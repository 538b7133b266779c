//! Donation lifecycle handlers: public creation and the admin-side queue,
//! verification, and stats endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use careworks_types::api::{
    AdminStats, DonationUpdate, NewDonation, PageQuery, VerifyRequest,
};
use careworks_types::models::{Donation, PaymentMethod, PaymentStatus, VerifyDecision};

use crate::auth::AppState;
use crate::error::{ApiError, ApiJson};
use crate::middleware::AdminSession;

const MAX_PAGE: usize = 200;

/// Amount must be a positive decimal. The enum fields arrive already
/// validated by deserialization into closed types.
pub(crate) fn validate_amount(amount: &str) -> Result<(), ApiError> {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(ApiError::Validation("Invalid amount".to_string())),
    }
}

/// Public. Every donation is created `pending`; completion arrives later,
/// either from the browser after a gateway round trip (PATCH) or from an
/// operator verifying a GCash reference.
pub async fn create_donation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewDonation>,
) -> Result<impl IntoResponse, ApiError> {
    validate_amount(&req.amount)?;

    let donation = state.store.create_donation(req)?;
    info!(id = %donation.id, method = ?donation.payment_method, amount = %donation.amount,
          "donation created");
    Ok((StatusCode::CREATED, Json(donation)))
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, ApiError> {
    state
        .store
        .get_donation(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Donation"))
}

/// Public. The client-asserted completion path: after a successful card or
/// PayPal flow the browser attaches the gateway id and flips the status.
/// The server does not re-verify with the gateway.
pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(updates): ApiJson<DonationUpdate>,
) -> Result<Json<Donation>, ApiError> {
    state
        .store
        .update_donation(id, updates)?
        .map(Json)
        .ok_or(ApiError::NotFound("Donation"))
}

pub async fn list_donations(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let donations = state
        .store
        .list_donations(page.limit.min(MAX_PAGE), page.offset)?;
    Ok(Json(donations))
}

pub async fn donation_stats(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.donation_stats()?))
}

/// The GCash verification queue: pending donations on the manual rail.
pub async fn gcash_pending(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let pending = state
        .store
        .donations_by_status(PaymentStatus::Pending)?
        .into_iter()
        .filter(|d| d.payment_method == PaymentMethod::Gcash)
        .collect();
    Ok(Json(pending))
}

/// Human-in-the-loop settlement of a GCash payment.
pub async fn gcash_verify(
    AdminSession(operator): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result<Json<Donation>, ApiError> {
    let status = match req.status {
        VerifyDecision::Verified => PaymentStatus::Completed,
        VerifyDecision::Rejected => PaymentStatus::Failed,
    };

    let donation = state
        .store
        .update_donation(
            id,
            DonationUpdate {
                payment_status: Some(status),
                ..Default::default()
            },
        )?
        .ok_or(ApiError::NotFound("Payment"))?;

    info!(id = %donation.id, decision = ?req.status, operator = %operator.username,
          "gcash payment verified");
    Ok(Json(donation))
}

/// Dashboard rollup: completed total, overall count, unread inbox, and the
/// manual-verification backlog.
pub async fn admin_stats(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<AdminStats>, ApiError> {
    let donation_stats = state.store.donation_stats()?;
    let pending_messages = state.store.unread_count()?;
    let pending_gcash = state
        .store
        .donations_by_status(PaymentStatus::Pending)?
        .iter()
        .filter(|d| d.payment_method == PaymentMethod::Gcash)
        .count();

    Ok(Json(AdminStats {
        total_donations: donation_stats.total_amount,
        donation_count: donation_stats.total_count,
        pending_messages,
        pending_g_cash_payments: pending_gcash,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_validation() {
        assert!(validate_amount("50.00").is_ok());
        assert!(validate_amount(" 1 ").is_ok());
        assert!(validate_amount("0").is_err());
        assert!(validate_amount("-3").is_err());
        assert!(validate_amount("fifty").is_err());
        assert!(validate_amount("inf").is_err());
    }
}
