use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session tokens are valid for one hour from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    /// Subject, the user id the token authenticates.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Uniform rejection. Expired, tampered and malformed tokens are all the
/// same failure to callers; the distinction is only logged.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidToken;

/// Issue a signed token for `subject`, expiring `ttl` after now.
///
/// # Errors
///
/// Returns an error if signing fails, which with a present secret it does
/// not for well-formed claims.
pub fn issue(subject: &str, secret: &SecretString, ttl: Duration) -> anyhow::Result<String> {
    let now = Utc::now();

    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?)
}

/// Verify signature and expiry, returning the embedded subject.
///
/// # Errors
///
/// Returns `InvalidToken` for a bad signature, malformed input or an elapsed
/// expiry. No leeway: at or after `exp` the token is dead.
pub fn verify(token: &str, secret: &SecretString) -> Result<String, InvalidToken> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims.sub),
        Err(err) => {
            debug!("Token rejected: {:?}", err);

            Err(InvalidToken)
        }
    }
}

/// Decode claims without checking the signature or expiry.
///
/// Client-side only: the signing secret never leaves the server, so the
/// client can at most read the expiry claim, not trust it.
///
/// # Errors
///
/// Returns `InvalidToken` when the token is not structurally a JWT.
pub fn decode_unverified(token: &str) -> Result<Claims, InvalidToken> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    match decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Ok(data.claims),
        Err(err) => {
            debug!("Unreadable token: {:?}", err);

            Err(InvalidToken)
        }
    }
}
