//! Bearer token resolution.
//!
//! The HTTP layer only knows the [`Authenticator`] trait; which token scheme
//! backs it is decided when [`crate::api::AppState`] is built.

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::db::{SessionRepository, UserId};
use crate::error::AppError;

/// Resolves a bearer token to the identity of the caller.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the caller's user id, or `AppError::Unauthorized` when the
    /// token is unknown or expired.
    async fn resolve(&self, token: &str) -> Result<UserId, AppError>;
}

/// Authenticator backed by the `sessions` table.
#[derive(Clone)]
pub struct SessionAuthenticator {
    db: Pool<Sqlite>,
}

impl SessionAuthenticator {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn resolve(&self, token: &str) -> Result<UserId, AppError> {
        let session = SessionRepository::get_by_token(&self.db, token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(session.user_id)
    }
}
