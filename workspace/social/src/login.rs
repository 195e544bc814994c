//! Credential sign-in.
//!
//! Every failure reaches the caller as the same `InvalidCredentials`; the
//! actual cause is only written to the log.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{error, info, instrument, trace, warn};

use model::entities::user;

use crate::error::{Result, SocialError};
use crate::password::{self, Credential, Verification};
use crate::session::{Identity, IssuedToken, SessionKeys};

pub const INVALID_CREDENTIALS: &str = "아이디 또는 비밀번호가 올바르지 않습니다.";

/// How sign-in treats accounts still holding a plaintext password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyPolicy {
    /// Accept them as they are.
    Keep,
    /// Replace them with a bcrypt hash at the given cost after a successful sign-in.
    Rehash { cost: u32 },
}

fn rejected(cause: &str) -> SocialError {
    warn!(cause, "Authentication failed");
    SocialError::InvalidCredentials
}

/// Rejects after a decoy bcrypt check so the response time matches a mismatch.
async fn decoy_rejected(password: &str, cause: &str) -> SocialError {
    if let Err(err) = password::check_decoy(password.to_string()).await {
        error!(%err, "Decoy credential check failed");
    }
    rejected(cause)
}

/// Checks `password` for `user_id` and returns the account on success.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    user_id: &str,
    password: &str,
    legacy: LegacyPolicy,
) -> Result<user::Model> {
    trace!("Entering authenticate function");

    if user_id.is_empty() || password.is_empty() {
        return Err(rejected("missing user id or password"));
    }

    let account = match user::Entity::find_by_id(user_id.to_string()).one(db).await? {
        None => return Err(decoy_rejected(password, "user not found").await),
        Some(account) if !account.is_active() => {
            return Err(decoy_rejected(password, "account disabled").await);
        }
        Some(account) => account,
    };

    match password::check_blocking(password.to_string(), account.password.clone()).await? {
        Verification::Match => {}
        Verification::Mismatch => return Err(rejected("password mismatch")),
        Verification::MalformedHash => return Err(rejected("malformed hash")),
    }

    if Credential::parse(&account.password).is_legacy() {
        warn!(user_id, "Signed in with a plaintext credential");
        if let LegacyPolicy::Rehash { cost } = legacy {
            rehash(db, &account, password, cost).await;
        }
    }

    info!("User {} authenticated", account.user_id);
    Ok(account)
}

/// Best effort; a failure here must not fail the sign-in.
async fn rehash(db: &DatabaseConnection, account: &user::Model, password: &str, cost: u32) {
    let hashed = match password::hash(password.to_string(), cost).await {
        Ok(hashed) => hashed,
        Err(err) => {
            error!(%err, "Could not hash legacy credential");
            return;
        }
    };

    let update = user::ActiveModel {
        user_id: Set(account.user_id.clone()),
        password: Set(hashed),
        ..Default::default()
    };
    match update.update(db).await {
        Ok(_) => info!("Rehashed legacy credential of {}", account.user_id),
        Err(err) => error!(%err, "Could not store rehashed credential"),
    }
}

/// Authenticates and mints a session token for the account.
pub async fn login(
    db: &DatabaseConnection,
    keys: &SessionKeys,
    user_id: &str,
    password: &str,
    legacy: LegacyPolicy,
) -> Result<(user::Model, IssuedToken)> {
    let account = authenticate(db, user_id, password, legacy).await?;
    let token = keys.issue(&Identity::from(&account))?;
    Ok((account, token))
}
