use axum::{
    body::Body,
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::token;
use crate::babili::handlers::ApiError;
use crate::cli::globals::GlobalArgs;

/// Verified token subject, inserted into request extensions by the gate.
///
/// Downstream handlers get *a* valid subject, not necessarily one matching
/// the resource they serve; the gate does not authorize per resource.
#[derive(Debug, Clone)]
pub struct Subject(pub String);

/// Bearer-token gate for protected routes. Missing token short-circuits
/// with 401 before any handler runs; a present but rejected token is 400.
pub async fn require_session(
    Extension(globals): Extension<GlobalArgs>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(bearer) = extract_bearer(request.headers()) else {
        return Err(ApiError::AccessDenied);
    };

    let subject = token::verify(&bearer, &globals.secret).map_err(|_| ApiError::InvalidToken)?;

    request.extensions_mut().insert(Subject(subject));

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|bearer| !bearer.is_empty())
        .map(str::to_string)
}
