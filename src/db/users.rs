use std::collections::HashMap;

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::db::friendships::FriendshipRepository;
use crate::db::models::{Friendship, User, UserId, UserWithFriends};
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        name: &str,
        email: &str,
    ) -> Result<User, AppError> {
        let now = chrono::Utc::now().timestamp();

        let user = sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (name, email, created_at, updated_at)
VALUES (?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: UserId,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(
        pool: &Pool<Sqlite>,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Loads the users in `ids` (ordered by id) with their outgoing
    /// friendships attached. Ids with no matching user are skipped.
    pub async fn get_many_with_friends(
        pool: &Pool<Sqlite>,
        ids: &[UserId],
    ) -> Result<Vec<UserWithFriends>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let users = query.build_query_as::<User>().fetch_all(pool).await?;

        let user_ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
        let mut by_owner: HashMap<UserId, Vec<Friendship>> = HashMap::new();
        for friendship in FriendshipRepository::find_outgoing_for_users(pool, &user_ids).await? {
            by_owner.entry(friendship.user_id).or_default().push(friendship);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let friends = by_owner.remove(&user.id).unwrap_or_default();
                UserWithFriends { user, friends }
            })
            .collect())
    }
}
