use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use common::{ApiResponse, PaginationMeta};
use model::entities::user;
use serde::{Deserialize, Serialize};
use social::{
    follow::{self, Direction},
    guard,
    profile::{self, Profile, ProfileUpdate},
};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::extract::{AppJson, AppQuery, AuthUser, MaybeAuthUser};
use crate::handlers::page_request;
use crate::schemas::AppState;

/// Public profile with counters and the viewer's relation to it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub tag_id: String,
    pub name: String,
    /// Empty when unset
    pub bio: String,
    pub profile_image: Option<String>,
    pub is_brand: bool,
    pub is_verified: bool,
    pub location: Option<String>,
    pub website: Option<String>,
    pub joined_at: NaiveDateTime,
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    pub is_following: bool,
    pub is_followed_by: bool,
    pub is_own_profile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let user = profile.user;
        let is_brand = user.is_brand;
        // Business details are shown on brand profiles only
        let brand = |value: Option<String>| if is_brand { value } else { None };
        Self {
            business_type: brand(user.business_type),
            corporate_name: brand(user.corporate_name),
            business_email: brand(user.business_email),
            business_phone: brand(user.business_phone),
            id: user.user_id,
            tag_id: user.tag_id,
            name: user.name,
            bio: user.bio.unwrap_or_default(),
            profile_image: user.profile_image,
            is_brand: user.is_brand,
            is_verified: user.is_verified,
            location: user.location,
            website: user.website,
            joined_at: user.created_at,
            post_count: profile.post_count,
            follower_count: profile.follower_count,
            following_count: profile.following_count,
            is_following: profile.is_following,
            is_followed_by: profile.is_followed_by,
            is_own_profile: profile.is_own_profile,
        }
    }
}

/// Request body for a profile edit. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// 1 to 50 characters
    pub name: Option<String>,
    /// Up to 200 characters; empty clears it
    pub bio: Option<String>,
    /// Up to 100 characters; empty clears it
    pub location: Option<String>,
    /// Absolute URL; empty clears it
    pub website: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            bio: request.bio,
            location: request.location,
            website: request.website,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProfileResponse {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub location: Option<String>,
    pub website: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<user::Model> for UpdatedProfileResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.user_id,
            name: model.name,
            bio: model.bio.unwrap_or_default(),
            location: model.location,
            website: model.website,
            updated_at: model.updated_at,
        }
    }
}

/// A member in a follower or following list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberCard {
    pub id: String,
    pub tag_id: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub is_brand: bool,
}

impl From<user::Model> for MemberCard {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.user_id,
            tag_id: model.tag_id,
            name: model.name,
            profile_image: model.profile_image,
            is_brand: model.is_brand,
        }
    }
}

/// Query parameters for member lists
#[derive(Debug, Deserialize, IntoParams)]
pub struct MemberListQuery {
    /// 1-indexed page, default 1
    pub page: Option<i64>,
    /// Page size, default 12
    pub limit: Option<i64>,
}

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, viewer))]
pub async fn get_profile(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> Result<(StatusCode, Json<ApiResponse<ProfileResponse>>), ApiError> {
    trace!("Entering get_profile function");
    debug!("Fetching profile {} for viewer {:?}", user_id, viewer.id());

    let profile = profile::get_profile(&state.db, &user_id, viewer.id()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            ProfileResponse::from(profile),
            "사용자 정보를 성공적으로 조회했습니다.",
        )),
    ))
}

/// Update one's own profile
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UpdatedProfileResponse>),
        (status = 400, description = "Field limits violated", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Not the profile owner", body = ErrorResponse),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, actor, body))]
pub async fn update_profile(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    body: Result<AppJson<UpdateProfileRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<UpdatedProfileResponse>>), ApiError> {
    trace!("Entering update_profile function");
    debug!("Profile update of {} by {}", user_id, actor.id);

    // A non-owner is refused before the body is looked at
    guard::ensure_profile_owner(&actor, &user_id)?;
    let AppJson(request) = body?;

    let updated = profile::update_profile(&state.db, &actor, &user_id, request.into()).await?;
    info!("Profile {} updated", updated.user_id);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            UpdatedProfileResponse::from(updated),
            "프로필이 성공적으로 업데이트되었습니다.",
        )),
    ))
}

async fn member_list(
    state: &AppState,
    user_id: &str,
    direction: Direction,
    query: MemberListQuery,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MemberCard>>>), ApiError> {
    let page = page_request(query.page, query.limit, state.settings.max_page_limit)?;
    let (members, total) = follow::list_members(&state.db, user_id, direction, page).await?;
    debug!("Listing {} of {} members", members.len(), total);

    let cards = members.into_iter().map(MemberCard::from).collect();
    let meta = PaginationMeta::untyped(page.page, page.limit, total);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::page(cards, meta, "목록을 성공적으로 조회했습니다.")),
    ))
}

/// List the members following a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/followers",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier"), MemberListQuery),
    responses(
        (status = 200, description = "Followers retrieved", body = ApiResponse<Vec<MemberCard>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_followers(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MemberListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MemberCard>>>), ApiError> {
    trace!("Entering get_followers function");
    member_list(&state, &user_id, Direction::Followers, query).await
}

/// List the members a user follows
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/following",
    tag = "users",
    params(("user_id" = String, Path, description = "User identifier"), MemberListQuery),
    responses(
        (status = 200, description = "Followed members retrieved", body = ApiResponse<Vec<MemberCard>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_following(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MemberListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<MemberCard>>>), ApiError> {
    trace!("Entering get_following function");
    member_list(&state, &user_id, Direction::Following, query).await
}
