use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::db::models::{Friendship, FriendshipStatus, UserId};
use crate::error::AppError;

pub struct FriendshipRepository;

impl FriendshipRepository {
    /// Inserts a new edge. The `(user_id, friend_id)` pair is unique, so an
    /// insert that loses a race against an identical one yields
    /// `DuplicateFriendship` instead of a second row.
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: UserId,
        friend_id: UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship, AppError> {
        let now = chrono::Utc::now().timestamp();

        let friendship = sqlx::query_as::<_, Friendship>(
            r#"
INSERT INTO friendships (user_id, friend_id, status, confirmed_at, created_at, updated_at)
VALUES (?, ?, ?, NULL, ?, ?)
ON CONFLICT (user_id, friend_id) DO NOTHING
RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        friendship.ok_or(AppError::DuplicateFriendship)
    }

    pub async fn find_outgoing(
        pool: &Pool<Sqlite>,
        user_id: UserId,
    ) -> Result<Vec<Friendship>, AppError> {
        let friendships = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(friendships)
    }

    pub async fn exists_outgoing(
        pool: &Pool<Sqlite>,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = ? AND friend_id = ?)",
        )
        .bind(user_id)
        .bind(friend_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Marks the edge as accepted and stamps `confirmed_at`.
    pub async fn confirm(
        pool: &Pool<Sqlite>,
        friendship: &Friendship,
    ) -> Result<Friendship, AppError> {
        let now = chrono::Utc::now().timestamp();

        let confirmed = sqlx::query_as::<_, Friendship>(
            r#"
UPDATE friendships
SET status = ?, confirmed_at = ?, updated_at = ?
WHERE id = ?
RETURNING *
            "#,
        )
        .bind(FriendshipStatus::Accepted)
        .bind(now)
        .bind(now)
        .bind(friendship.id)
        .fetch_optional(pool)
        .await?;

        confirmed.ok_or_else(|| AppError::NotFound("Friendship not found".to_string()))
    }

    /// Outgoing edges for every user in `user_ids`, ordered by owner then id.
    pub async fn find_outgoing_for_users(
        pool: &Pool<Sqlite>,
        user_ids: &[UserId],
    ) -> Result<Vec<Friendship>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT * FROM friendships WHERE user_id IN (");
        let mut separated = query.separated(", ");
        for id in user_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY user_id, id");

        let friendships = query.build_query_as::<Friendship>().fetch_all(pool).await?;

        Ok(friendships)
    }
}
