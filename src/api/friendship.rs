use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension, Json,
};

use crate::api::resources::{
    Envelope, FriendshipCollection, FriendshipResource, MutualFriendsCollection,
};
use crate::api::state::AppState;
use crate::db::UserId;
use crate::error::AppError;
use crate::service::FriendshipService;

/// POST /api/friendship/add/:user (requires auth)
pub async fn add_friend(
    State(state): State<AppState>,
    Extension(caller_id): Extension<UserId>,
    target: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Envelope<FriendshipResource>>, AppError> {
    // A target that isn't a user id can't name a user
    let Path(target_id) = target.map_err(|e| {
        tracing::debug!(error = %e, "unparseable friend target");
        AppError::NotFound("User not found".to_string())
    })?;

    let friendship = FriendshipService::add_friend(&state.db, caller_id, target_id).await?;

    Ok(Json(Envelope::new(friendship.into())))
}

/// GET /api/friendship/list (requires auth)
pub async fn get_friends_list(
    State(state): State<AppState>,
    Extension(caller_id): Extension<UserId>,
) -> Result<Json<FriendshipCollection>, AppError> {
    let friendships = FriendshipService::friends_list(&state.db, caller_id).await?;

    Ok(Json(friendships.into()))
}

/// GET /api/friendship/mutual (requires auth)
pub async fn get_mutual_friends(
    State(state): State<AppState>,
    Extension(caller_id): Extension<UserId>,
) -> Result<Json<MutualFriendsCollection>, AppError> {
    let friends = FriendshipService::mutual_friends(&state.db, caller_id).await?;

    Ok(Json(friends.into()))
}
