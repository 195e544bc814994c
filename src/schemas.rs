use std::sync::Arc;

use common::{ApiResponse, PaginationMeta, PostKind, RelationshipType};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use social::SessionKeys;
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::config::Settings;
use crate::handlers::{
    auth::{LoginRequest, LoginResponse, SessionResponse, SessionUser, SignupRequest, SignupResponse},
    follow::{FollowResponse, FollowStatusResponse},
    posts::PostItem,
    users::{MemberCard, ProfileResponse, UpdateProfileRequest, UpdatedProfileResponse},
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Session signing keys
    pub sessions: SessionKeys,
    pub settings: Arc<Settings>,
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Success status (always false for errors)
    pub success: bool,
    /// User-facing message
    pub message: String,
    /// Machine readable error code
    pub code: String,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::session,
        crate::handlers::users::get_profile,
        crate::handlers::users::update_profile,
        crate::handlers::users::get_followers,
        crate::handlers::users::get_following,
        crate::handlers::follow::follow_user,
        crate::handlers::follow::unfollow_user,
        crate::handlers::follow::get_follow_status,
        crate::handlers::posts::get_user_posts,
    ),
    components(
        schemas(
            ApiResponse<SignupResponse>,
            ApiResponse<LoginResponse>,
            ApiResponse<SessionResponse>,
            ApiResponse<ProfileResponse>,
            ApiResponse<UpdatedProfileResponse>,
            ApiResponse<Vec<MemberCard>>,
            ApiResponse<FollowResponse>,
            ApiResponse<FollowStatusResponse>,
            ApiResponse<Vec<PostItem>>,
            ErrorResponse,
            HealthResponse,
            SignupRequest,
            SignupResponse,
            LoginRequest,
            LoginResponse,
            SessionResponse,
            SessionUser,
            ProfileResponse,
            UpdateProfileRequest,
            UpdatedProfileResponse,
            MemberCard,
            FollowResponse,
            FollowStatusResponse,
            RelationshipType,
            PostItem,
            PostKind,
            PaginationMeta,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and session endpoints"),
        (name = "users", description = "Profile endpoints"),
        (name = "follow", description = "Follow relationship endpoints"),
        (name = "posts", description = "Profile post listings"),
    ),
    info(
        title = "Vinscent API",
        description = "Backend of the Vinscent perfume and beauty community",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
