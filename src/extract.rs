//! Request extractors that reject with the error envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header, request::Parts},
};
use social::{Identity, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::schemas::AppState;

/// `axum::Json` with envelope rejections.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with envelope rejections.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// Bearer token from `Authorization`, falling back to the session cookie.
fn session_token<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

fn resolve(parts: &Parts, state: &AppState) -> Session {
    let session = state
        .sessions
        .resolve(session_token(parts, &state.settings.session_cookie_name));
    if let Some(identity) = session.identity() {
        debug!(user_id = %identity.id, "Resolved session");
    }
    session
}

/// The caller's identity; rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .into_identity()
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// The caller's identity when one is present.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(resolve(parts, state).into_identity()))
    }
}

impl MaybeAuthUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|identity| identity.id.as_str())
    }
}
