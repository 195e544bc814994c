use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use social::{SocialError, login::INVALID_CREDENTIALS, posts::BRAND_ONLY_MAGAZINE, profile::USER_NOT_FOUND};
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

pub const LOGIN_REQUIRED: &str = "로그인이 필요합니다.";
pub const SELF_FOLLOW: &str = "자기 자신을 팔로우할 수 없습니다.";
pub const ALREADY_FOLLOWING: &str = "이미 팔로우 중인 사용자입니다.";
pub const NOT_FOLLOWING: &str = "팔로우하지 않은 사용자입니다.";
pub const MALFORMED_REQUEST: &str = "요청 형식이 올바르지 않습니다.";
pub const INTERNAL_ERROR: &str = "요청 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Everything a handler can fail with, rendered as the error envelope.
#[derive(Debug)]
pub enum ApiError {
    Social(SocialError),
    /// No valid session on an endpoint that needs one
    Unauthorized,
    /// Query or body could not be parsed
    BadRequest(String),
}

impl From<SocialError> for ApiError {
    fn from(error: SocialError) -> Self {
        ApiError::Social(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(MALFORMED_REQUEST.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected query string: {}", rejection.body_text());
        ApiError::BadRequest(MALFORMED_REQUEST.to_string())
    }
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", LOGIN_REQUIRED.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
            ApiError::Social(error) => match error {
                SocialError::Validation(message) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
                SocialError::Conflict(message) => (StatusCode::CONFLICT, "CONFLICT", message),
                SocialError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    INVALID_CREDENTIALS.to_string(),
                ),
                SocialError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message),
                SocialError::UserNotFound(_) | SocialError::TargetNotFound(_) => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", USER_NOT_FOUND.to_string())
                }
                SocialError::SelfFollowDenied => {
                    (StatusCode::BAD_REQUEST, "SELF_FOLLOW", SELF_FOLLOW.to_string())
                }
                SocialError::AlreadyFollowing(_) => {
                    (StatusCode::CONFLICT, "ALREADY_FOLLOWING", ALREADY_FOLLOWING.to_string())
                }
                SocialError::NotFollowing(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOLLOWING", NOT_FOLLOWING.to_string())
                }
                SocialError::NotABrandAccount(_) => (
                    StatusCode::FORBIDDEN,
                    "NOT_A_BRAND_ACCOUNT",
                    BRAND_ONLY_MAGAZINE.to_string(),
                ),
                infrastructure => {
                    error!("Request failed: {}", infrastructure);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_ERROR.to_string(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorResponse {
            success: false,
            message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
