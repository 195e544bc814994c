use thiserror::Error;

/// Error types for the social domain
///
/// Business-rule violations are typed variants the HTTP layer maps to 4xx
/// statuses. The remaining variants are infrastructure failures and surface as
/// a generic 500.
#[derive(Error, Debug)]
pub enum SocialError {
    /// Malformed or missing input; carries the user-facing message
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate user identifier or tag; carries the user-facing message
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login failed. The cause is logged, never returned.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not allowed; carries the user-facing message
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or disabled user
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Missing or disabled follow target
    #[error("Follow target not found: {0}")]
    TargetNotFound(String),

    #[error("A user cannot follow themselves")]
    SelfFollowDenied,

    #[error("Already following {0}")]
    AlreadyFollowing(String),

    #[error("Not following {0}")]
    NotFollowing(String),

    /// Magazine listings exist only for brand accounts
    #[error("{0} is not a brand account")]
    NotABrandAccount(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error while signing a session token
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Error while hashing a password
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Runtime error for unexpected situations
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl SocialError {
    /// True for failures that are not the caller's fault.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            SocialError::Database(_)
                | SocialError::Token(_)
                | SocialError::PasswordHash(_)
                | SocialError::Runtime(_)
        )
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SocialError::Validation(message.into())
    }
}

impl From<tokio::task::JoinError> for SocialError {
    fn from(error: tokio::task::JoinError) -> Self {
        SocialError::Runtime(format!("Blocking task failed: {}", error))
    }
}

/// Type alias for Result with SocialError
pub type Result<T> = std::result::Result<T, SocialError>;
