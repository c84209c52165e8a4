use serde::{Deserialize, Serialize};

/// Where the UI is in the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    AuthError,
}

/// Display fields for the signed-in user, as returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Client auth state. `Authenticated` implies a token is present and was
/// unexpired at the last check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<SessionUser>,
    pub token: Option<String>,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            phase: AuthPhase::Anonymous,
            user: None,
            token: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A login or registration request went on the wire.
    SubmitStarted,
    LoginSucceeded { token: String, user: SessionUser },
    /// Registration succeeded; the caller routes to login, no auto-login.
    RegisterSucceeded,
    /// Server rejection or network failure, with the message to render.
    Failed { message: String },
    /// A stored, locally-unexpired token was found at startup.
    Restored { token: String },
    LoggedOut,
}

/// Pure transition function; every session mutation flows through here.
#[must_use]
pub fn reduce(state: AuthState, event: AuthEvent) -> AuthState {
    match event {
        AuthEvent::SubmitStarted => AuthState {
            phase: AuthPhase::Authenticating,
            error: None,
            ..state
        },

        AuthEvent::LoginSucceeded { token, user } => AuthState {
            phase: AuthPhase::Authenticated,
            user: Some(user),
            token: Some(token),
            error: None,
        },

        AuthEvent::RegisterSucceeded => AuthState {
            phase: AuthPhase::Anonymous,
            error: None,
            ..state
        },

        AuthEvent::Failed { message } => AuthState {
            phase: AuthPhase::AuthError,
            user: None,
            token: None,
            error: Some(message),
        },

        // The restored token carries no display fields; those arrive with
        // the next login.
        AuthEvent::Restored { token } => AuthState {
            phase: AuthPhase::Authenticated,
            token: Some(token),
            error: None,
            ..state
        },

        AuthEvent::LoggedOut => AuthState::default(),
    }
}
