use crate::handlers::{
    auth::{login, logout, session, signup},
    follow::{follow_user, get_follow_status, unfollow_user},
    health::health_check,
    posts::get_user_posts,
    users::{get_followers, get_following, get_profile, update_profile},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/session", get(session))
        // Profile routes
        .route("/api/v1/users/:user_id", get(get_profile).patch(update_profile))
        .route("/api/v1/users/:user_id/followers", get(get_followers))
        .route("/api/v1/users/:user_id/following", get(get_following))
        // Follow routes
        .route(
            "/api/v1/users/:user_id/follow",
            post(follow_user).delete(unfollow_user).get(get_follow_status),
        )
        // Post listing
        .route("/api/v1/users/:user_id/posts", get(get_user_posts))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
