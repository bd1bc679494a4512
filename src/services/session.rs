//! Session and account lookups.
//!
//! ARCHITECTURE
//! ============
//! Sign-up, password checks and cookie issuance belong to the identity
//! layer in front of this service. What reaches us is an opaque session
//! token; this module only resolves it to a user, and can mint tokens for
//! the development bypass route.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    /// Account identifier; drawings are scoped to it.
    pub id: String,
    /// Login email, if the identity layer recorded one.
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for accounts and session tokens.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Create the account if missing, refreshing its email otherwise.
    async fn upsert_user(&self, user_id: &str, email: Option<&str>) -> Result<(), SessionError>;

    /// Create a session for the given user, returning the token.
    async fn create_session(&self, user_id: &str) -> Result<String, SessionError>;

    /// Resolve a token to its user. Unknown or expired tokens yield `None`.
    async fn validate_session(&self, token: &str) -> Result<Option<SessionUser>, SessionError>;

    /// Delete a session by token. Unknown tokens are not an error.
    async fn delete_session(&self, token: &str) -> Result<(), SessionError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SessionStore for PgSessionStore {
    async fn upsert_user(&self, user_id: &str, email: Option<&str>) -> Result<(), SessionError> {
        sqlx::query(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = COALESCE(EXCLUDED.email, users.email)",
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_session(&self, user_id: &str) -> Result<String, SessionError> {
        let token = generate_token();
        sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<SessionUser>, SessionError> {
        let row = sqlx::query(
            r"SELECT u.id, u.email
              FROM sessions s
              JOIN users u ON u.id = s.user_id
              WHERE s.token = $1 AND s.expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| SessionUser { id: r.get("id"), email: r.get("email") }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
