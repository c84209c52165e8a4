pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod user_lookup;
pub use self::user_lookup::user_lookup;

pub mod completions;
pub use self::completions::completions;

// common plumbing for the handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::store::StoreError;

/// Error taxonomy surfaced by the API. Every variant renders as
/// `{"error": message}` with the status the frontend contract expects.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or mismatched input, user-correctable.
    Validation(&'static str),
    /// Business-rule conflict on the unique email.
    DuplicateEmail,
    NotFound(&'static str),
    /// Wrong password for an existing account. Kept distinct from
    /// `NotFound` as the current contract, account-existence leak and all.
    InvalidCredentials,
    /// No bearer token on a protected request.
    AccessDenied,
    /// Bearer token present but rejected by verification.
    InvalidToken,
    /// Store or signing failure, not user-correctable.
    Internal(anyhow::Error),
    /// The completion service failed or was unreachable.
    Upstream(anyhow::Error),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, (*message).to_string()),
            Self::DuplicateEmail => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Email already registered".to_string(),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, (*message).to_string()),
            Self::InvalidCredentials => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid credentials".to_string(),
            ),
            Self::AccessDenied => (StatusCode::UNAUTHORIZED, "Access denied".to_string()),
            Self::InvalidToken => (StatusCode::BAD_REQUEST, "Invalid token".to_string()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream request failed".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(err) | Self::Upstream(err) => error!("{:?}", err),
            _ => (),
        }

        let (status, message) = self.status_and_message();

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Unavailable(err) => Self::Internal(err),
        }
    }
}
