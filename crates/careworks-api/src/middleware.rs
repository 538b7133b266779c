//! Session extraction and the portal guards.
//!
//! `AdminSession` / `OwnerSession` are extractors rather than layered
//! middleware so that paths shared with public methods (`POST
//! /api/donations` public, `GET /api/donations` gated) stay on one router.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use uuid::Uuid;

use careworks_types::models::{Portal, User};
use careworks_types::policy::can_enter;

use crate::auth::AppState;
use crate::error::ApiError;

/// Pull the bearer session token out of the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| token.parse().ok())
}

/// Validate the presented session (lazy expiry happens inside the store
/// lookup) and resolve its user.
fn authenticate(parts: &Parts, state: &AppState) -> Result<User, ApiError> {
    let token =
        bearer_token(&parts.headers).ok_or(ApiError::Unauthorized("Invalid or expired session"))?;
    state
        .store
        .user_by_session(token)?
        .ok_or(ApiError::Unauthorized("Invalid or expired session"))
}

fn enter_portal(parts: &Parts, state: &AppState, portal: Portal) -> Result<User, ApiError> {
    let user = authenticate(parts, state)?;
    if !can_enter(user.role, portal) {
        return Err(ApiError::Forbidden("Access denied"));
    }
    Ok(user)
}

/// A live session whose user may enter the admin portal.
pub struct AdminSession(pub User);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        enter_portal(parts, state, Portal::Admin).map(AdminSession)
    }
}

/// A live session whose user may enter the owner portal.
pub struct OwnerSession(pub User);

impl FromRequestParts<AppState> for OwnerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        enter_portal(parts, state, Portal::Owner).map(OwnerSession)
    }
}
