//! Client-side session handling: an explicit state object with pure
//! reducer transitions, persisted-token restore at startup, and submission
//! flows over the HTTP API.

pub mod api;
pub mod session;
pub mod storage;

use chrono::Utc;
use tracing::debug;

use crate::auth::token;
use self::api::{ApiClient, ApiOutcome};
use self::session::{reduce, AuthEvent, AuthState};
use self::storage::{TokenStorage, TOKEN_KEY};

/// Owns the auth state and drives it through login, registration, logout
/// and the startup restore.
pub struct SessionManager<S: TokenStorage> {
    state: AuthState,
    storage: S,
    api: ApiClient,
}

impl<S: TokenStorage> SessionManager<S> {
    pub fn new(api: ApiClient, storage: S) -> Self {
        Self {
            state: AuthState::default(),
            storage,
            api,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    fn apply(&mut self, event: AuthEvent) {
        self.state = reduce(self.state.clone(), event);
    }

    /// Startup check against persisted storage, no server round-trip: a
    /// stored token whose expiry claim has not passed is trusted as-is. A
    /// token revoked nowhere can only die by expiring.
    ///
    /// An expired or unreadable stored token is cleared so the next start
    /// is clean.
    pub fn restore(&mut self) {
        let Some(stored) = self.storage.get(TOKEN_KEY) else {
            return;
        };

        match token::decode_unverified(&stored) {
            Ok(claims) if claims.exp > Utc::now().timestamp() => {
                self.apply(AuthEvent::Restored { token: stored });
            }

            _ => {
                debug!("discarding stale stored token");

                self.storage.clear();
            }
        }
    }

    /// Submit credentials. On success the token is persisted and the state
    /// becomes `Authenticated`; any rejection or network failure lands in
    /// `AuthError` with nothing persisted.
    pub async fn login(&mut self, email: &str, password: &str) {
        self.apply(AuthEvent::SubmitStarted);

        match self.api.login(email, password).await {
            Ok(ApiOutcome::Ok(payload)) => {
                self.storage.set(TOKEN_KEY, &payload.token);

                self.apply(AuthEvent::LoginSucceeded {
                    token: payload.token,
                    user: payload.user,
                });
            }

            Ok(ApiOutcome::Rejected(message)) => self.apply(AuthEvent::Failed { message }),

            Err(err) => self.apply(AuthEvent::Failed {
                message: err.to_string(),
            }),
        }
    }

    /// Submit registration fields. Returns `true` when the caller should
    /// navigate to the login entry point; there is no auto-login.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> bool {
        self.apply(AuthEvent::SubmitStarted);

        match self.api.register(name, email, password, confirm_password).await {
            Ok(ApiOutcome::Ok(())) => {
                self.apply(AuthEvent::RegisterSucceeded);

                true
            }

            Ok(ApiOutcome::Rejected(message)) => {
                self.apply(AuthEvent::Failed { message });

                false
            }

            Err(err) => {
                self.apply(AuthEvent::Failed {
                    message: err.to_string(),
                });

                false
            }
        }
    }

    /// Clear all persisted session data and reset to the anonymous
    /// default, unconditionally.
    pub fn logout(&mut self) {
        self.storage.clear();

        self.apply(AuthEvent::LoggedOut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::AuthPhase;
    use crate::client::storage::MemoryTokenStorage;
    use chrono::Duration;
    use secrecy::SecretString;
    use url::Url;

    fn manager_with(storage: MemoryTokenStorage) -> SessionManager<MemoryTokenStorage> {
        let api = ApiClient::new(Url::parse("http://127.0.0.1:8000/").unwrap()).unwrap();
        SessionManager::new(api, storage)
    }

    fn server_token(ttl: Duration) -> String {
        token::issue("user-42", &SecretString::from("server-secret"), ttl).unwrap()
    }

    #[test]
    fn test_restore_with_no_stored_token_stays_anonymous() {
        let mut manager = manager_with(MemoryTokenStorage::new());

        manager.restore();

        assert_eq!(manager.state().phase, AuthPhase::Anonymous);
    }

    #[test]
    fn test_restore_trusts_an_unexpired_token() {
        let mut storage = MemoryTokenStorage::new();
        let stored = server_token(Duration::hours(1));
        storage.set(TOKEN_KEY, &stored);

        let mut manager = manager_with(storage);
        manager.restore();

        assert_eq!(manager.state().phase, AuthPhase::Authenticated);
        assert_eq!(manager.state().token.as_deref(), Some(stored.as_str()));
        // display fields only arrive with a login
        assert!(manager.state().user.is_none());
    }

    #[test]
    fn test_restore_clears_an_expired_token() {
        let mut storage = MemoryTokenStorage::new();
        storage.set(TOKEN_KEY, &server_token(Duration::seconds(-120)));

        let mut manager = manager_with(storage);
        manager.restore();

        assert_eq!(manager.state().phase, AuthPhase::Anonymous);
        assert_eq!(manager.storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_restore_clears_an_unreadable_token() {
        let mut storage = MemoryTokenStorage::new();
        storage.set(TOKEN_KEY, "not-a-jwt");

        let mut manager = manager_with(storage);
        manager.restore();

        assert_eq!(manager.state().phase, AuthPhase::Anonymous);
        assert_eq!(manager.storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_logout_wipes_state_and_storage() {
        let mut storage = MemoryTokenStorage::new();
        storage.set(TOKEN_KEY, &server_token(Duration::hours(1)));

        let mut manager = manager_with(storage);
        manager.restore();
        assert_eq!(manager.state().phase, AuthPhase::Authenticated);

        manager.logout();

        assert_eq!(manager.state(), &AuthState::default());
        assert_eq!(manager.storage.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_unreachable_server_lands_in_auth_error() {
        // port 9, nothing listens
        let api = ApiClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        let mut manager = SessionManager::new(api, MemoryTokenStorage::new());

        manager.login("a@x.com", "secret1").await;

        assert_eq!(manager.state().phase, AuthPhase::AuthError);
        assert!(manager.state().error.is_some());
        assert_eq!(manager.storage.get(TOKEN_KEY), None);
    }
}
