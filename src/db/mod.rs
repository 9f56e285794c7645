pub mod friendships;
pub mod models;
pub mod sessions;
pub mod users;

pub use friendships::FriendshipRepository;
pub use models::{Friendship, FriendshipStatus, Session, User, UserId, UserWithFriends};
pub use sessions::SessionRepository;
pub use users::UserRepository;

use sqlx::{Pool, Sqlite};

use crate::error::AppError;

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    use super::{migrate, User, UserRepository};

    /// Single-connection in-memory pool, so every query sees the same database.
    pub async fn memory_pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    pub async fn user(pool: &Pool<Sqlite>, name: &str) -> User {
        UserRepository::create(pool, name, &format!("{}@example.com", name.to_lowercase()))
            .await
            .unwrap()
    }
}
