//! Contact form intake and the admin inbox.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use careworks_types::api::{ContactUpdate, NewContactMessage, PageQuery};
use careworks_types::models::ContactMessage;

use crate::auth::AppState;
use crate::error::{ApiError, ApiJson};
use crate::middleware::AdminSession;

const MAX_PAGE: usize = 200;

/// Public form submission. Messages always enter the inbox unread.
pub async fn create_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewContactMessage>,
) -> Result<impl IntoResponse, ApiError> {
    if req.first_name.is_empty() || req.last_name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if req.message.is_empty() {
        return Err(ApiError::Validation("Message is required".to_string()));
    }

    let message = state.store.create_message(req)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let messages = state
        .store
        .list_messages(page.limit.min(MAX_PAGE), page.offset)?;
    Ok(Json(messages))
}

/// Status overwrite; any status may replace any other.
pub async fn update_message(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(updates): ApiJson<ContactUpdate>,
) -> Result<Json<ContactMessage>, ApiError> {
    state
        .store
        .update_message(id, updates)?
        .map(Json)
        .ok_or(ApiError::NotFound("Message"))
}
