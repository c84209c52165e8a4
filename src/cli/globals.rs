use secrecy::SecretString;
use url::Url;

/// Process-wide configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Token signing secret. Required at startup: the server refuses to run
    /// without one rather than issue unsigned tokens.
    pub secret: SecretString,
    /// Credential for the upstream completion service.
    pub api_key: SecretString,
    /// Chat-completions endpoint the proxy forwards to.
    pub upstream_url: Url,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(secret: SecretString, api_key: SecretString, upstream_url: Url) -> Self {
        Self {
            secret,
            api_key,
            upstream_url,
        }
    }
}
