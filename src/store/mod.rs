pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored account. The password hash stays inside the store layer;
/// anything that leaves the API is a `UserProfile`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Sanitized projection returned by login and lookup responses.
#[derive(ToSchema, Serialize, Debug, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// Unique-index violation on email. The index has the final word on
    /// duplicates; any pre-insert lookup is only an optimization.
    DuplicateEmail,
    Unavailable(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::Unavailable(err) => write!(f, "store unavailable: {err}"),
        }
    }
}

/// Persistent keyed collection of user records, insert and lookup only.
/// Records are immutable once created.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

pub type DynUserStore = Arc<dyn UserStore>;
