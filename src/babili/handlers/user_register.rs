use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::auth;
use crate::babili::handlers::ApiError;
use crate::store::{DynUserStore, NewUser};

#[derive(ToSchema, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

#[utoipa::path(
    post,
    path= "/auth/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Registration successful", content_type = "application/json"),
        (status = 422, description = "Invalid input or email already registered"),
        (status = 500, description = "Store failure, nothing created"),
    ),
    tag= "auth"
)]
// axum handler for register
#[instrument(skip_all)]
pub async fn register(
    store: Extension<DynUserStore>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload"));
    };

    validate(&request)?;

    // Cheap lookup first so a duplicate never pays for a hash.
    if store.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = auth::hash_password(&request.password).map_err(ApiError::Internal)?;

    // The unique index has the final word: a concurrent registration that
    // slipped past the lookup surfaces here as DuplicateEmail.
    let user = store
        .insert(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
        })
        .await?;

    debug!("registered {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered" })),
    ))
}

/// First failing check wins; the store is never touched on failure.
fn validate(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.name.is_empty() {
        return Err(ApiError::Validation("Name is required"));
    }

    if request.email.is_empty() {
        return Err(ApiError::Validation("Email is required"));
    }

    if request.password.is_empty() {
        return Err(ApiError::Validation("Password is required"));
    }

    if request.password != request.confirm_password {
        return Err(ApiError::Validation("Passwords do not match"));
    }

    Ok(())
}
