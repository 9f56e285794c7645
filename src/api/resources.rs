//! JSON shapes returned by the friendship endpoints.

use serde::Serialize;

use crate::db::{Friendship, FriendshipStatus, UserId, UserWithFriends};

/// Wire form of a single friendship row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendshipResource {
    pub id: i64,
    pub user_id: UserId,
    pub friend_id: UserId,
    pub status: FriendshipStatus,
    pub confirmed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Friendship> for FriendshipResource {
    fn from(f: Friendship) -> Self {
        Self {
            id: f.id,
            user_id: f.user_id,
            friend_id: f.friend_id,
            status: f.status,
            confirmed_at: f.confirmed_at,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// `{"data": ...}` wrapper shared by every success response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub type FriendshipCollection = Envelope<Vec<FriendshipResource>>;

impl From<Vec<Friendship>> for FriendshipCollection {
    fn from(friendships: Vec<Friendship>) -> Self {
        Envelope::new(friendships.into_iter().map(Into::into).collect())
    }
}

/// Friend lists of each of the caller's friends; friends with no outgoing
/// friendships are left out entirely.
pub type MutualFriendsCollection = Envelope<Vec<Vec<FriendshipResource>>>;

// Always a JSON array, even when leading friends are dropped; never an
// index-keyed object.
impl From<Vec<UserWithFriends>> for MutualFriendsCollection {
    fn from(users: Vec<UserWithFriends>) -> Self {
        Envelope::new(
            users
                .into_iter()
                .filter(|u| !u.friends.is_empty())
                .map(|u| u.friends.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}
