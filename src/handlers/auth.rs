use axum::{
    extract::State,
    http::{header, StatusCode},
    response::Json,
};
use chrono::{DateTime, Utc};
use common::ApiResponse;
use model::entities::user;
use serde::{Deserialize, Serialize};
use social::{login, signup::Signup, Identity};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::extract::{AppJson, AuthUser};
use crate::schemas::AppState;

/// Request body for creating an account
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Login identifier (must be unique)
    pub user_id: Option<String>,
    /// Public handle (must be unique)
    pub tag_id: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// "0" for individuals, "1" for brands
    pub user_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth: Option<String>,
    #[serde(default)]
    pub adult_agree: bool,
    #[serde(default)]
    pub store_agree: bool,
    #[serde(default)]
    pub marketing_agree: bool,
    #[serde(default)]
    pub ap_agree: bool,
    pub business_type: Option<String>,
    pub corporate_name: Option<String>,
    pub corporate_id1: Option<String>,
    pub corporate_id2: Option<String>,
    pub business_email: Option<String>,
    pub business_phone: Option<String>,
}

impl From<SignupRequest> for Signup {
    fn from(request: SignupRequest) -> Self {
        Self {
            user_id: request.user_id,
            tag_id: request.tag_id,
            password: request.password,
            confirm_password: request.confirm_password,
            name: request.name,
            user_type: request.user_type,
            email: request.email,
            phone: request.phone,
            birth: request.birth,
            adult_agree: request.adult_agree,
            store_agree: request.store_agree,
            marketing_agree: request.marketing_agree,
            ap_agree: request.ap_agree,
            business_type: request.business_type,
            corporate_name: request.corporate_name,
            corporate_id1: request.corporate_id1,
            corporate_id2: request.corporate_id2,
            business_email: request.business_email,
            business_phone: request.business_phone,
        }
    }
}

/// Sanitized account returned after signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: String,
    pub tag_id: String,
    pub name: String,
    pub user_type: String,
    pub is_brand: bool,
}

impl From<user::Model> for SignupResponse {
    fn from(model: user::Model) -> Self {
        Self {
            user_type: if model.is_brand { "1" } else { "0" }.to_string(),
            user_id: model.user_id,
            tag_id: model.tag_id,
            name: model.name,
            is_brand: model.is_brand,
        }
    }
}

/// Request body for signing in
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

/// The signed-in member as returned by login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub tag_id: String,
    pub name: String,
    pub is_brand: bool,
    pub is_verified: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token; also set as an HttpOnly cookie
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// Claims carried by the current session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub tag: String,
    pub is_brand: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Identity> for SessionResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            tag: identity.tag,
            is_brand: identity.is_brand,
            is_verified: identity.is_verified,
            created_at: identity.created_at,
        }
    }
}

fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        name, token, max_age_secs
    )
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<SignupResponse>),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "User id or tag already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponse>>), ApiError> {
    trace!("Entering signup function");
    debug!("Signup requested for user id: {:?}", request.user_id);

    let created = social::signup::signup(&state.db, request.into(), state.settings.bcrypt_cost).await?;
    info!("Account created: {}", created.user_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SignupResponse::from(created), "회원가입이 완료되었습니다.")),
    ))
}

/// Sign in with user id and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; the token is also set as a cookie", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ApiResponse<LoginResponse>>), ApiError> {
    trace!("Entering login function");

    let user_id = request.user_id.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    let (account, issued) = login::login(
        &state.db,
        &state.sessions,
        user_id.trim(),
        &password,
        state.settings.legacy_policy(),
    )
    .await?;

    let cookie = session_cookie(
        &state.settings.session_cookie_name,
        &issued.token,
        state.sessions.max_age().num_seconds(),
    );
    info!("User {} signed in", account.user_id);

    let response = LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: SessionUser {
            id: account.user_id,
            tag_id: account.tag_id,
            name: account.name,
            is_brand: account.is_brand,
            is_verified: account.is_verified,
        },
    };
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(response, "로그인되었습니다.")),
    ))
}

/// Clear the session cookie
///
/// Tokens are stateless; clients holding a bearer token discard it themselves.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, String); 1], Json<ApiResponse<()>>) {
    trace!("Entering logout function");
    let cookie = session_cookie(&state.settings.session_cookie_name, "", 0);
    let response = ApiResponse {
        success: true,
        message: Some("로그아웃되었습니다.".to_string()),
        data: None,
        meta: None,
    };
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response))
}

/// Resolve the current session
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponse>),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
#[instrument(skip(user))]
pub async fn session(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    trace!("Entering session function");
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(SessionResponse::from(user), "세션을 조회했습니다.")),
    ))
}
