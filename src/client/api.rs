use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::babili::APP_USER_AGENT;
use crate::client::session::SessionUser;

/// Outcome of a request the server answered: the typed success payload, or
/// the server-reported message to render inline near the form.
#[derive(Debug)]
pub enum ApiOutcome<T> {
    Ok(T),
    Rejected(String),
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: SessionUser,
}

/// HTTP client for the babili API.
#[derive(Debug)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self { base_url, client })
    }

    /// # Errors
    ///
    /// Returns an error only when the server could not be reached; an
    /// answered rejection is `ApiOutcome::Rejected`.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiOutcome<LoginPayload>> {
        let url = self.base_url.join("auth/login")?;

        debug!("submit login for {}", email);

        let response = self
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("login request failed")?;

        if response.status() == StatusCode::OK {
            Ok(ApiOutcome::Ok(
                response.json().await.context("malformed login response")?,
            ))
        } else {
            Ok(ApiOutcome::Rejected(error_message(response).await))
        }
    }

    /// # Errors
    ///
    /// Returns an error only when the server could not be reached.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<ApiOutcome<()>> {
        let url = self.base_url.join("auth/register")?;

        debug!("submit register for {}", email);

        let response = self
            .client
            .post(url)
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "confirmPassword": confirm_password,
            }))
            .send()
            .await
            .context("register request failed")?;

        if response.status() == StatusCode::CREATED {
            Ok(ApiOutcome::Ok(()))
        } else {
            Ok(ApiOutcome::Rejected(error_message(response).await))
        }
    }

    /// # Errors
    ///
    /// Returns an error only when the server could not be reached.
    pub async fn completion(&self, token: &str, message: &str) -> Result<ApiOutcome<Value>> {
        let url = self.base_url.join("completions")?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "message": message }))
            .send()
            .await
            .context("completion request failed")?;

        if response.status() == StatusCode::OK {
            Ok(ApiOutcome::Ok(
                response
                    .json()
                    .await
                    .context("malformed completion response")?,
            ))
        } else {
            Ok(ApiOutcome::Rejected(error_message(response).await))
        }
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();

    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed: {status}"))
}
