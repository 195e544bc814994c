use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use common::{ApiResponse, RelationshipType};
use serde::{Deserialize, Serialize};
use social::follow::{self, FollowResult};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::schemas::AppState;

/// Edge state after a follow or unfollow
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub is_following: bool,
    /// Target's follower count after the change
    pub follower_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_at: Option<NaiveDateTime>,
}

impl From<FollowResult> for FollowResponse {
    fn from(result: FollowResult) -> Self {
        Self {
            is_following: result.is_following,
            follower_count: result.follower_count,
            followed_at: result.followed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusResponse {
    /// Caller follows the target
    pub is_following: bool,
    /// Target follows the caller
    pub is_following_back: bool,
    pub relationship_type: RelationshipType,
}

/// Follow a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/follow",
    tag = "follow",
    params(("user_id" = String, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Now following", body = ApiResponse<FollowResponse>),
        (status = 400, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 409, description = "Already following", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, actor))]
pub async fn follow_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<FollowResponse>>), ApiError> {
    trace!("Entering follow_user function");
    debug!("{} requests to follow {}", actor.id, user_id);

    let result = follow::follow(&state.db, &actor.id, &user_id).await?;
    let message = format!("{}님을 팔로우했습니다.", result.target_name);
    info!("{} followed {}", actor.id, user_id);

    Ok((StatusCode::OK, Json(ApiResponse::ok(FollowResponse::from(result), message))))
}

/// Unfollow a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/follow",
    tag = "follow",
    params(("user_id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = ApiResponse<FollowResponse>),
        (status = 400, description = "Cannot unfollow yourself", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "User not found or not followed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, actor))]
pub async fn unfollow_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<FollowResponse>>), ApiError> {
    trace!("Entering unfollow_user function");
    debug!("{} requests to unfollow {}", actor.id, user_id);

    let result = follow::unfollow(&state.db, &actor.id, &user_id).await?;
    let message = format!("{}님을 언팔로우했습니다.", result.target_name);
    info!("{} unfollowed {}", actor.id, user_id);

    Ok((StatusCode::OK, Json(ApiResponse::ok(FollowResponse::from(result), message))))
}

/// Relationship between the caller and a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/follow",
    tag = "follow",
    params(("user_id" = String, Path, description = "Other user")),
    responses(
        (status = 200, description = "Relationship resolved", body = ApiResponse<FollowStatusResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, actor))]
pub async fn get_follow_status(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<FollowStatusResponse>>), ApiError> {
    trace!("Entering get_follow_status function");

    let relationship = follow::relationship(&state.db, &actor.id, &user_id).await?;
    let response = FollowStatusResponse {
        is_following: relationship.is_following,
        is_following_back: relationship.is_following_back,
        relationship_type: relationship.relationship_type(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(response, "팔로우 관계를 조회했습니다.")),
    ))
}
