pub mod auth;
pub mod follow;
pub mod health;
pub mod posts;
pub mod users;

use common::{PageRequest, DEFAULT_PAGE_LIMIT};

use crate::error::ApiError;

pub const INVALID_PAGE: &str = "페이지 정보가 올바르지 않습니다.";

/// Reads `?page` / `?limit`, defaulting to the first page of twelve.
/// Values below one are rejected and `limit` is clamped to `max_limit`.
pub(crate) fn page_request(
    page: Option<i64>,
    limit: Option<i64>,
    max_limit: u64,
) -> Result<PageRequest, ApiError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT as i64);
    if page < 1 || limit < 1 {
        return Err(ApiError::BadRequest(INVALID_PAGE.to_string()));
    }
    Ok(PageRequest::new(page as u64, limit as u64, max_limit))
}
