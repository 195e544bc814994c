#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use axum::http::HeaderValue;
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use model::entities::{
        follow, post, post_bookmark, post_like,
        user::{self, UserStatus},
    };
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Set};
    use social::Identity;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Password of every seeded account that has a bcrypt hash
    pub const TEST_PASSWORD: &str = "password123";
    /// Stored as plain text for the `legacy` account
    pub const LEGACY_PASSWORD: &str = "oldsite-pass";
    const TEST_SECRET: &str = "vinscent-test-secret";
    /// Cheapest cost bcrypt accepts
    const TEST_COST: u32 = 4;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    pub fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: Some(TEST_SECRET.to_string()),
            bcrypt_cost: TEST_COST,
            ..Settings::default()
        }
    }

    /// Create AppState for testing.
    ///
    /// Seeds `alice`, `bob` (individuals), `brand` (a brand account),
    /// `legacy` (plain text password) and `ghost` (disabled).
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let hashed = social::password::hash(TEST_PASSWORD.to_string(), TEST_COST)
            .await
            .expect("Failed to hash test password");

        seed_user(&db, "alice", &hashed, false, UserStatus::Active).await;
        seed_user(&db, "bob", &hashed, false, UserStatus::Active).await;
        seed_user(&db, "brand", &hashed, true, UserStatus::Active).await;
        seed_user(&db, "legacy", LEGACY_PASSWORD, false, UserStatus::Active).await;
        seed_user(&db, "ghost", &hashed, false, UserStatus::Disabled).await;

        let settings = test_settings();
        let sessions = settings.session_keys();
        AppState {
            db,
            sessions,
            settings: Arc::new(settings),
        }
    }

    async fn seed_user(
        db: &DatabaseConnection,
        user_id: &str,
        password: &str,
        is_brand: bool,
        status: UserStatus,
    ) -> user::Model {
        let business = |value: String| if is_brand { Some(value) } else { None };
        user::ActiveModel {
            user_id: Set(user_id.to_string()),
            tag_id: Set(format!("{}_tag", user_id)),
            password: Set(password.to_string()),
            name: Set(format!("{} name", user_id)),
            status: Set(status),
            is_brand: Set(is_brand),
            is_verified: Set(is_brand),
            business_type: Set(business("perfumery".to_string())),
            corporate_name: Set(business(format!("{} Inc.", user_id))),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test user")
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    ///
    /// # Returns
    ///
    /// A guard that will clean up the subscriber when dropped.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let state = setup_test_app_state().await;
        create_router(state)
    }

    /// A running test server together with the state behind it, so tests
    /// can seed rows and mint tokens directly.
    pub struct TestContext {
        pub server: TestServer,
        pub state: AppState,
        _tracing: tracing::subscriber::DefaultGuard,
    }

    pub async fn setup_test_context() -> TestContext {
        let tracing = init_test_tracing();
        let state = setup_test_app_state().await;
        let server = TestServer::new(create_router(state.clone())).unwrap();
        TestContext {
            server,
            state,
            _tracing: tracing,
        }
    }

    impl TestContext {
        pub fn db(&self) -> &DatabaseConnection {
            &self.state.db
        }

        pub async fn user(&self, user_id: &str) -> user::Model {
            user::Entity::find_by_id(user_id.to_string())
                .one(self.db())
                .await
                .unwrap()
                .expect("seeded user is missing")
        }

        /// Session token for a seeded account, as login would issue it
        pub async fn token(&self, user_id: &str) -> String {
            let account = self.user(user_id).await;
            self.state
                .sessions
                .issue(&Identity::from(&account))
                .unwrap()
                .token
        }

        /// `Authorization` header value for a seeded account
        pub async fn bearer(&self, user_id: &str) -> HeaderValue {
            HeaderValue::from_str(&format!("Bearer {}", self.token(user_id).await)).unwrap()
        }

        /// A token that expired a day ago
        pub async fn expired_bearer(&self, user_id: &str) -> HeaderValue {
            let account = self.user(user_id).await;
            let issued_at = Utc::now() - Duration::days(31);
            let issued = self
                .state
                .sessions
                .issue_at(&Identity::from(&account), issued_at)
                .unwrap();
            HeaderValue::from_str(&format!("Bearer {}", issued.token)).unwrap()
        }

        pub fn cookie(&self, token: &str) -> HeaderValue {
            HeaderValue::from_str(&format!(
                "theme=dark; {}={}",
                self.state.settings.session_cookie_name, token
            ))
            .unwrap()
        }

        pub async fn post(&self, owner: &str, private: bool, magazine: bool) -> post::Model {
            let count = post::Entity::find().all(self.db()).await.unwrap().len() as i64;
            post::ActiveModel {
                user_id: Set(owner.to_string()),
                content: Set(Some(format!("Bottle #{} by {}", count + 1, owner))),
                is_private: Set(private),
                is_magazine: Set(magazine),
                is_video: Set(false),
                created_at: Set(Utc::now().naive_utc() + Duration::seconds(count)),
                ..Default::default()
            }
            .insert(self.db())
            .await
            .unwrap()
        }

        pub async fn follow(&self, follower: &str, following: &str) {
            follow::Entity::insert(follow::ActiveModel {
                follower_id: Set(follower.to_string()),
                following_id: Set(following.to_string()),
                created_at: Set(Utc::now().naive_utc()),
            })
            .exec_without_returning(self.db())
            .await
            .unwrap();
        }

        pub async fn like(&self, user_id: &str, post_id: i32) {
            post_like::Entity::insert(post_like::ActiveModel {
                user_id: Set(user_id.to_string()),
                post_id: Set(post_id),
                created_at: Set(Utc::now().naive_utc()),
            })
            .exec_without_returning(self.db())
            .await
            .unwrap();
        }

        pub async fn bookmark(&self, user_id: &str, post_id: i32) {
            post_bookmark::Entity::insert(post_bookmark::ActiveModel {
                user_id: Set(user_id.to_string()),
                post_id: Set(post_id),
                created_at: Set(Utc::now().naive_utc()),
            })
            .exec_without_returning(self.db())
            .await
            .unwrap();
        }
    }
}
