use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i64;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

/// A directed edge from `user_id` (the requester) to `friend_id`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Friendship {
    pub id: i64,
    pub user_id: UserId,
    pub friend_id: UserId,
    pub status: FriendshipStatus,
    pub confirmed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A user with their outgoing friendships eagerly loaded.
#[derive(Debug, Clone)]
pub struct UserWithFriends {
    pub user: User,
    pub friends: Vec<Friendship>,
}
