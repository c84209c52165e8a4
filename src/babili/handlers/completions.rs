use axum::{extract::Extension, Json};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::babili::handlers::ApiError;
use crate::babili::session::Subject;
use crate::babili::APP_USER_AGENT;
use crate::cli::globals::GlobalArgs;

const UPSTREAM_MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 100;

#[derive(ToSchema, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub message: String,
}

#[utoipa::path(
    post,
    path= "/completions",
    request_body = CompletionRequest,
    responses (
        (status = 200, description = "Upstream completion payload, forwarded verbatim", content_type = "application/json"),
        (status = 401, description = "Missing bearer token"),
        (status = 400, description = "Invalid bearer token"),
        (status = 422, description = "Empty message"),
        (status = 500, description = "Upstream failure"),
    ),
    tag= "completions"
)]
// axum handler for completions, behind the session gate
#[instrument(skip_all)]
pub async fn completions(
    globals: Extension<GlobalArgs>,
    subject: Extension<Subject>,
    payload: Option<Json<CompletionRequest>>,
) -> Result<Json<Value>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload"));
    };

    if request.message.is_empty() {
        return Err(ApiError::Validation("Message is required"));
    }

    debug!("completion request from {}", subject.0 .0);

    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .build()
        .map_err(|err| ApiError::Upstream(err.into()))?;

    let body = json!({
        "model": UPSTREAM_MODEL,
        "messages": [{ "role": "user", "content": request.message }],
        "max_tokens": MAX_TOKENS,
    });

    let response = client
        .post(globals.upstream_url.clone())
        .bearer_auth(globals.api_key.expose_secret())
        .json(&body)
        .send()
        .await
        .map_err(|err| ApiError::Upstream(err.into()))?;

    // The upstream payload is forwarded as-is, errors included; the
    // frontend renders whatever the completion service answered.
    let payload: Value = response
        .json()
        .await
        .map_err(|err| ApiError::Upstream(err.into()))?;

    Ok(Json(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use url::Url;

    fn globals() -> GlobalArgs {
        GlobalArgs::new(
            SecretString::from("signing-secret"),
            SecretString::from("upstream-key"),
            // Nothing listens here: upstream calls fail fast.
            Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap(),
        )
    }

    fn subject() -> Subject {
        Subject("user-42".to_string())
    }

    #[tokio::test]
    async fn test_empty_message_fails_before_upstream_contact() {
        let result = completions(
            Extension(globals()),
            Extension(subject()),
            Some(Json(CompletionRequest {
                message: String::new(),
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_upstream_error() {
        let result = completions(
            Extension(globals()),
            Extension(subject()),
            Some(Json(CompletionRequest {
                message: "hello".to_string(),
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }
}
