use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Session, UserId};
use crate::error::AppError;

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: UserId,
        expiry_hours: i64,
    ) -> Result<Session, AppError> {
        let id = Uuid::new_v4().to_string();
        let token = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();
        let expires_at = expiry_hours
            .checked_mul(3600)
            .and_then(|secs| created_at.checked_add(secs))
            .ok_or_else(|| {
                AppError::Config(format!("Session expiry of {} hours is out of range", expiry_hours))
            })?;

        let session = sqlx::query_as::<_, Session>(
            r#"
INSERT INTO sessions (id, user_id, token, expires_at, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&token)
        .bind(expires_at)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    pub async fn get_by_token(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<Option<Session>, AppError> {
        let now = chrono::Utc::now().timestamp();

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes expired sessions, returning how many were removed.
    pub async fn cleanup_expired(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{memory_pool, user};

    #[tokio::test]
    async fn live_session_resolves() {
        let pool = memory_pool().await;
        let alice = user(&pool, "Alice").await;

        let session = SessionRepository::create(&pool, alice.id, 1).await.unwrap();
        let found = SessionRepository::get_by_token(&pool, &session.token)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.user_id, alice.id);
        assert!(SessionRepository::get_by_token(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_hidden_and_cleaned_up() {
        let pool = memory_pool().await;
        let alice = user(&pool, "Alice").await;

        let expired = SessionRepository::create(&pool, alice.id, -1).await.unwrap();
        SessionRepository::create(&pool, alice.id, 1).await.unwrap();

        assert!(SessionRepository::get_by_token(&pool, &expired.token)
            .await
            .unwrap()
            .is_none());
        assert_eq!(SessionRepository::cleanup_expired(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn overflowing_expiry_is_rejected() {
        let pool = memory_pool().await;
        let alice = user(&pool, "Alice").await;

        let err = SessionRepository::create(&pool, alice.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
