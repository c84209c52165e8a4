use super::{NewUser, StoreError, User, UserStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_secs(3);

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connect with a fixed backoff between attempts. Only startup is
    /// retried; per-request store errors later are surfaced, not retried.
    ///
    /// # Errors
    ///
    /// Returns an error once all attempts are exhausted.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let mut attempt = 1;

        let pool = loop {
            match PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn)
                .await
            {
                Ok(pool) => break pool,

                Err(err) if attempt < CONNECT_ATTEMPTS => {
                    warn!(
                        "Database connection attempt {}/{} failed: {}, retrying in {}s",
                        attempt,
                        CONNECT_ATTEMPTS,
                        err,
                        CONNECT_BACKOFF.as_secs()
                    );

                    sleep(CONNECT_BACKOFF).await;
                    attempt += 1;
                }

                Err(err) => return Err(err).context("Failed to connect to database"),
            }
        };

        info!("Connected to database");

        Ok(Self { pool })
    }

    /// Apply the users schema, idempotently.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA_SQL
            .split(';')
            .map(str::trim)
            .filter(|statement| !statement.is_empty())
        {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply schema statement")?;
        }

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4();

        match sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(User {
                id,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
            }),

            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateEmail),

            Err(err) => Err(StoreError::Unavailable(err.into())),
        }
    }
}
