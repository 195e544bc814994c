use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use sea_orm::Database;
use serde::Deserialize;
use social::{SessionKeys, login::LegacyPolicy, session::MAX_SESSION_DAYS};
use tracing::{debug, info, warn};

use crate::schemas::AppState;

/// Signing secret used when none is configured. Never use it in production.
const DEVELOPMENT_JWT_SECRET: &str = "vinscent-development-secret";

/// Runtime settings, layered as defaults, then `vinscent.toml`, then
/// `VINSCENT_*` environment variables.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: Option<String>,
    pub session_max_age_days: i64,
    pub bcrypt_cost: u32,
    pub rehash_legacy_passwords: bool,
    pub max_page_limit: u64,
    pub session_cookie_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://vinscent.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            jwt_secret: None,
            session_max_age_days: MAX_SESSION_DAYS,
            bcrypt_cost: 12,
            rehash_legacy_passwords: true,
            max_page_limit: 50,
            session_cookie_name: "vinscent_session".to_string(),
        }
    }
}

// Keeps the secret out of logs
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("session_max_age_days", &self.session_max_age_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("rehash_legacy_passwords", &self.rehash_legacy_passwords)
            .field("max_page_limit", &self.max_page_limit)
            .field("session_cookie_name", &self.session_cookie_name)
            .finish()
    }
}

impl Settings {
    /// Load configuration from `.env`, `vinscent.toml` and the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let settings: Settings = config::Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("session_max_age_days", defaults.session_max_age_days)?
            .set_default("bcrypt_cost", i64::from(defaults.bcrypt_cost))?
            .set_default("rehash_legacy_passwords", defaults.rehash_legacy_passwords)?
            .set_default("max_page_limit", defaults.max_page_limit as i64)?
            .set_default("session_cookie_name", defaults.session_cookie_name)?
            .add_source(config::File::with_name("vinscent").required(false))
            .add_source(config::Environment::with_prefix("VINSCENT"))
            .build()?
            .try_deserialize()?;

        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    pub fn legacy_policy(&self) -> LegacyPolicy {
        if self.rehash_legacy_passwords {
            LegacyPolicy::Rehash {
                cost: self.bcrypt_cost,
            }
        } else {
            LegacyPolicy::Keep
        }
    }

    pub fn session_keys(&self) -> SessionKeys {
        let secret = match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("No jwt_secret configured, signing sessions with the development secret");
                DEVELOPMENT_JWT_SECRET
            }
        };
        if self.session_max_age_days > MAX_SESSION_DAYS {
            warn!(
                "session_max_age_days {} exceeds the {} day ceiling and will be capped",
                self.session_max_age_days, MAX_SESSION_DAYS
            );
        }
        SessionKeys::new(secret.as_bytes(), self.session_max_age_days)
    }
}

/// Initialize application state from loaded settings
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;
    let sessions = settings.session_keys();

    Ok(AppState {
        db,
        sessions,
        settings: Arc::new(settings),
    })
}
