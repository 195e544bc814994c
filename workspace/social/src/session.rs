//! Stateless session tokens.
//!
//! A token is an HS256 JWT whose claims are the member's identity as it was
//! at sign-in. Resolving a token never touches the database, so a renamed or
//! disabled account keeps its old claims until the token expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use model::entities::user;

use crate::error::Result;

/// Hard ceiling on a session lifetime.
pub const MAX_SESSION_DAYS: i64 = 30;

/// The authenticated member a request acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub tag: String,
    pub is_brand: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.user_id.clone(),
            tag: user.tag_id.clone(),
            is_brand: user.is_brand,
            is_verified: user.is_verified,
            created_at: user.created_at.and_utc(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID
    sub: String,
    tag: String,
    brand: bool,
    verified: bool,
    /// Account creation time (Unix timestamp)
    created_at: i64,
    /// Issued at time (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

impl Claims {
    fn into_identity(self) -> Identity {
        Identity {
            id: self.sub,
            tag: self.tag,
            is_brand: self.brand,
            is_verified: self.verified,
            created_at: DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// What a request's token resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }
}

/// Signing material plus the configured token lifetime.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    max_age: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// `max_age_days` is clamped to `1..=MAX_SESSION_DAYS`.
    pub fn new(secret: &[u8], max_age_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            max_age: Duration::days(max_age_days.clamp(1, MAX_SESSION_DAYS)),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Mints a token for `identity` valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken> {
        self.issue_at(identity, Utc::now())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedToken> {
        let expires_at = now + self.max_age;
        let claims = Claims {
            sub: identity.id.clone(),
            tag: identity.tag.clone(),
            brand: identity.is_brand,
            verified: identity.is_verified,
            created_at: identity.created_at.timestamp(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(expires_at = %expires_at, "Issued session token");
        Ok(IssuedToken { token, expires_at })
    }

    /// Resolves a token to a session. Missing, tampered and expired tokens all
    /// resolve to [`Session::Anonymous`].
    pub fn resolve(&self, token: Option<&str>) -> Session {
        let Some(token) = token else {
            return Session::Anonymous;
        };

        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Session::Authenticated(data.claims.into_identity()),
            Err(err) => {
                match err.kind() {
                    ErrorKind::ExpiredSignature => debug!("Session token expired"),
                    _ => debug!(%err, "Rejected session token"),
                }
                Session::Anonymous
            }
        }
    }
}
