//! Friendship operations for an already authenticated caller.

use sqlx::{Pool, Sqlite};

use crate::db::{
    Friendship, FriendshipRepository, FriendshipStatus, UserId, UserRepository, UserWithFriends,
};
use crate::error::AppError;

pub struct FriendshipService;

impl FriendshipService {
    /// Sends a friend request from `caller_id` to `target_id`.
    ///
    /// Self-requests are allowed. The pre-check gives the common duplicate
    /// case a cheap answer; the unique index in the store covers concurrent
    /// requests that both pass it.
    pub async fn add_friend(
        pool: &Pool<Sqlite>,
        caller_id: UserId,
        target_id: UserId,
    ) -> Result<Friendship, AppError> {
        if UserRepository::get_by_id(pool, target_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if FriendshipRepository::exists_outgoing(pool, caller_id, target_id).await? {
            tracing::debug!(caller_id, target_id, "friend request already exists");
            return Err(AppError::DuplicateFriendship);
        }

        let friendship =
            FriendshipRepository::create(pool, caller_id, target_id, FriendshipStatus::Pending)
                .await?;

        tracing::info!(
            friendship_id = friendship.id,
            caller_id,
            target_id,
            "friend request created"
        );

        Ok(friendship)
    }

    /// Every outgoing edge of the caller, pending and accepted alike.
    pub async fn friends_list(
        pool: &Pool<Sqlite>,
        caller_id: UserId,
    ) -> Result<Vec<Friendship>, AppError> {
        FriendshipRepository::find_outgoing(pool, caller_id).await
    }

    /// For each user the caller has an outgoing edge to, that user together
    /// with *their own* outgoing edges.
    ///
    /// NOTE: this is "each friend's friend list", not an intersection of the
    /// caller's and each friend's friend sets. Clients depend on this shape;
    /// empty lists are dropped later by `MutualFriendsCollection`.
    pub async fn mutual_friends(
        pool: &Pool<Sqlite>,
        caller_id: UserId,
    ) -> Result<Vec<UserWithFriends>, AppError> {
        let friend_ids: Vec<UserId> = FriendshipRepository::find_outgoing(pool, caller_id)
            .await?
            .into_iter()
            .map(|f| f.friend_id)
            .collect();

        UserRepository::get_many_with_friends(pool, &friend_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{memory_pool, user};

    #[tokio::test]
    async fn add_friend_creates_single_pending_edge() {
        let pool = memory_pool().await;
        let a = user(&pool, "A").await;
        let b = user(&pool, "B").await;

        let edge = FriendshipService::add_friend(&pool, a.id, b.id).await.unwrap();
        assert_eq!((edge.user_id, edge.friend_id), (a.id, b.id));
        assert_eq!(edge.status, FriendshipStatus::Pending);

        let err = FriendshipService::add_friend(&pool, a.id, b.id).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateFriendship));

        let edges = FriendshipService::friends_list(&pool, a.id).await.unwrap();
        assert_eq!(edges, vec![edge]);
    }

    #[tokio::test]
    async fn add_friend_to_unknown_user_is_not_found() {
        let pool = memory_pool().await;
        let a = user(&pool, "A").await;

        let err = FriendshipService::add_friend(&pool, a.id, a.id + 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(FriendshipService::friends_list(&pool, a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_friend_allows_self_request() {
        let pool = memory_pool().await;
        let a = user(&pool, "A").await;

        let edge = FriendshipService::add_friend(&pool, a.id, a.id).await.unwrap();
        assert_eq!(edge.friend_id, a.id);
    }

    #[tokio::test]
    async fn concurrent_requests_leave_one_edge() {
        let pool = memory_pool().await;
        let a = user(&pool, "A").await;
        let b = user(&pool, "B").await;

        let (first, second) = tokio::join!(
            FriendshipService::add_friend(&pool, a.id, b.id),
            FriendshipService::add_friend(&pool, a.id, b.id),
        );

        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(FriendshipService::friends_list(&pool, a.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mutual_friends_returns_each_friends_own_edges() {
        let pool = memory_pool().await;
        let u1 = user(&pool, "One").await;
        let u2 = user(&pool, "Two").await;
        let u3 = user(&pool, "Three").await;
        let u4 = user(&pool, "Four").await;

        FriendshipService::add_friend(&pool, u1.id, u2.id).await.unwrap();
        FriendshipService::add_friend(&pool, u1.id, u3.id).await.unwrap();
        let two_to_four = FriendshipService::add_friend(&pool, u2.id, u4.id).await.unwrap();

        let mutual = FriendshipService::mutual_friends(&pool, u1.id).await.unwrap();

        assert_eq!(mutual.len(), 2);
        assert_eq!(mutual[0].user.id, u2.id);
        assert_eq!(mutual[0].friends, vec![two_to_four]);
        assert_eq!(mutual[1].user.id, u3.id);
        assert!(mutual[1].friends.is_empty());
    }

    #[tokio::test]
    async fn mutual_friends_without_friends_is_empty() {
        let pool = memory_pool().await;
        let a = user(&pool, "A").await;

        assert!(FriendshipService::mutual_friends(&pool, a.id).await.unwrap().is_empty());
    }
}
