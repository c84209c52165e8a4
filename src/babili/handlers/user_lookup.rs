use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::babili::handlers::ApiError;
use crate::store::{DynUserStore, UserProfile};

#[utoipa::path(
    get,
    path= "/user/{id}",
    params(
        ("id" = String, Path, description = "User id"),
    ),
    responses (
        (status = 200, description = "User found, password excluded", content_type = "application/json"),
        (status = 404, description = "No such user"),
        (status = 401, description = "Missing bearer token"),
        (status = 400, description = "Invalid bearer token"),
    ),
    tag= "user"
)]
// axum handler for user lookup, behind the session gate
#[instrument(skip_all)]
pub async fn user_lookup(
    store: Extension<DynUserStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    // A non-UUID id cannot name a record.
    let Ok(id) = Uuid::parse_str(&id) else {
        return Err(ApiError::NotFound("User not found"));
    };

    let Some(user) = store.find_by_id(id).await? else {
        return Err(ApiError::NotFound("User not found"));
    };

    Ok(Json(json!({ "user": UserProfile::from(&user) })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryUserStore;
    use crate::store::{NewUser, UserStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lookup_excludes_the_hash() {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .insert(NewUser {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "$2b$04$somethinghashed".to_string(),
            })
            .await
            .unwrap();

        let Json(body) = user_lookup(
            Extension(store as DynUserStore),
            Path(user.id.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["id"], user.id.to_string());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let store = Arc::new(MemoryUserStore::new());

        for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let result =
                user_lookup(Extension(store.clone() as DynUserStore), Path(id)).await;

            assert!(matches!(result, Err(ApiError::NotFound(_))));
        }
    }
}
