//! Owner-portal account management.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use uuid::Uuid;

use careworks_types::api::{UserProfile, UserUpdate};

use crate::auth::AppState;
use crate::error::{ApiError, ApiJson};
use crate::middleware::OwnerSession;

/// Merge role/email/password changes into an account. Owner portal only.
pub async fn update_user(
    OwnerSession(owner): OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(updates): ApiJson<UserUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state
        .store
        .update_user(id, updates)?
        .ok_or(ApiError::NotFound("User"))?;

    info!(target_user = %user.username, by = %owner.username, "user updated");
    Ok(Json(UserProfile::from(&user)))
}
