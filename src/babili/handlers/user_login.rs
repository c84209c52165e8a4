use axum::{extract::Extension, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::auth;
use crate::auth::token::{self, TOKEN_TTL_SECONDS};
use crate::babili::handlers::ApiError;
use crate::cli::globals::GlobalArgs;
use crate::store::{DynUserStore, UserProfile};

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

#[utoipa::path(
    post,
    path= "/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 404, description = "No account with that email"),
        (status = 422, description = "Missing input or wrong password"),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    store: Extension<DynUserStore>,
    globals: Extension<GlobalArgs>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload"));
    };

    if request.email.is_empty() {
        return Err(ApiError::Validation("Email is required"));
    }

    if request.password.is_empty() {
        return Err(ApiError::Validation("Password is required"));
    }

    let Some(user) = store.find_by_email(&request.email).await? else {
        debug!("no account for {}", request.email);

        return Err(ApiError::NotFound("User not found"));
    };

    if !auth::verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::issue(
        &user.id.to_string(),
        &globals.secret,
        Duration::seconds(TOKEN_TTL_SECONDS),
    )
    .map_err(ApiError::Internal)?;

    debug!("login successful for {}", user.email);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryUserStore;
    use crate::store::{NewUser, UserStore};
    use secrecy::SecretString;
    use std::sync::Arc;
    use url::Url;

    fn globals() -> GlobalArgs {
        GlobalArgs::new(
            SecretString::from("login-test-secret"),
            SecretString::from("upstream-key"),
            Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap(),
        )
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn seeded_store() -> Arc<MemoryUserStore> {
        let store = Arc::new(MemoryUserStore::new());
        store
            .insert(NewUser {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                password_hash: bcrypt::hash("secret1", 4).unwrap(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_login_issues_a_verifiable_token() {
        let store = seeded_store().await;
        let globals = globals();

        let Json(response) = login(
            Extension(store.clone() as DynUserStore),
            Extension(globals.clone()),
            Some(Json(login_request("a@x.com", "secret1"))),
        )
        .await
        .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "a@x.com");

        let subject = crate::auth::token::verify(&response.token, &globals.secret).unwrap();
        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(subject, user.id.to_string());
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let store = seeded_store().await;

        let result = login(
            Extension(store as DynUserStore),
            Extension(globals()),
            Some(Json(login_request("a@x.com", "wrong"))),
        )
        .await;

        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let store = seeded_store().await;

        let result = login(
            Extension(store as DynUserStore),
            Extension(globals()),
            Some(Json(login_request("b@x.com", "secret1"))),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_fields_each_fail_validation() {
        let store = seeded_store().await;

        for (email, password) in [("", "secret1"), ("a@x.com", "")] {
            let result = login(
                Extension(store.clone() as DynUserStore),
                Extension(globals()),
                Some(Json(login_request(email, password))),
            )
            .await;

            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn test_response_never_serializes_the_hash() {
        let response = LoginResponse {
            message: "Login successful".to_string(),
            token: "token".to_string(),
            user: UserProfile {
                id: uuid::Uuid::new_v4(),
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
            },
        };

        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }
}
