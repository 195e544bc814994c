use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use common::{ApiResponse, PaginationMeta, PostKind};
use serde::{Deserialize, Serialize};
use social::posts::{self, PostCard};
use tracing::{debug, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::extract::{AppQuery, MaybeAuthUser};
use crate::handlers::page_request;
use crate::schemas::AppState;

pub const INVALID_KIND: &str = "잘못된 조회 타입입니다.";

/// Query parameters for profile post listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct PostListQuery {
    /// 1-indexed page, default 1
    pub page: Option<i64>,
    /// Page size, default 12
    pub limit: Option<i64>,
    /// posts, saved or magazine; default posts
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A grid tile on a profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    pub id: i32,
    /// Thumbnail, or a placeholder when the post has none
    pub image: String,
    pub like_count: u64,
    pub is_video: bool,
    pub is_private: bool,
    pub is_magazine: bool,
    pub created_at: NaiveDateTime,
    /// First hundred characters of the body
    pub caption: String,
    /// Present only for signed-in requesters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl From<PostCard> for PostItem {
    fn from(card: PostCard) -> Self {
        Self {
            image: card.image().to_string(),
            caption: card.caption(),
            id: card.post.id,
            like_count: card.like_count,
            is_video: card.post.is_video,
            is_private: card.post.is_private,
            is_magazine: card.post.is_magazine,
            created_at: card.post.created_at,
            is_liked: card.is_liked,
            is_saved: card.is_saved,
        }
    }
}

/// List a profile's posts, saved posts or magazine
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/posts",
    tag = "posts",
    params(("user_id" = String, Path, description = "Profile owner"), PostListQuery),
    responses(
        (status = 200, description = "Posts retrieved", body = ApiResponse<Vec<PostItem>>),
        (status = 400, description = "Invalid type or pagination", body = ErrorResponse),
        (status = 403, description = "Saved posts of another member, or magazine of a non-brand account", body = ErrorResponse),
        (status = 404, description = "User not found or disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, requester))]
pub async fn get_user_posts(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    requester: MaybeAuthUser,
    AppQuery(query): AppQuery<PostListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PostItem>>>), ApiError> {
    trace!("Entering get_user_posts function");

    let kind = match query.kind.as_deref() {
        None => PostKind::default(),
        Some(raw) => raw.parse::<PostKind>().map_err(|err| {
            warn!("{}", err);
            ApiError::BadRequest(INVALID_KIND.to_string())
        })?,
    };
    let page = page_request(query.page, query.limit, state.settings.max_page_limit)?;
    debug!("Listing {} of {} page {} limit {}", kind, user_id, page.page, page.limit);

    let listing = posts::list_posts(&state.db, &user_id, requester.0.as_ref(), kind, page).await?;

    let items: Vec<PostItem> = listing.items.into_iter().map(PostItem::from).collect();
    let meta = PaginationMeta::new(kind, page.page, page.limit, listing.total_count);
    let message = format!("{} 목록을 성공적으로 조회했습니다.", kind);

    Ok((StatusCode::OK, Json(ApiResponse::page(items, meta, message))))
}
