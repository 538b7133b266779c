//! Handler error taxonomy. Every failure is mapped at the boundary to a
//! JSON `{message}` body with a conventional status code; nothing escapes
//! as a panic.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. Message is surfaced verbatim.
    #[error("{0}")]
    Validation(String),
    /// Bad credentials or a dead session. Kept generic; no detail leak.
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Authenticated but not admitted to the requested portal.
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Unique-field collision on registration.
    #[error("{0}")]
    Conflict(&'static str),
    /// Payment gateway failure or missing gateway configuration. No retry,
    /// no compensation; a donation already created stays pending.
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(err) => {
                error!("internal error: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

/// `axum::Json` with its rejection folded into the 400 branch of the
/// taxonomy, so a non-enumerated enum value or missing field comes back as
/// a `{message}` body like every other validation failure.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}
