//! Domain logic of the Vinscent community: credentials, sessions, ownership
//! rules, follow edges and profile listings.
//!
//! Everything here takes a `DatabaseConnection` and returns typed
//! [`SocialError`]s; the HTTP layer decides how they are presented.

pub mod error;
pub mod follow;
pub mod guard;
pub mod login;
pub mod password;
pub mod posts;
pub mod profile;
pub mod session;
pub mod signup;

#[cfg(test)]
mod testing;

pub use error::{Result, SocialError};
pub use session::{Identity, Session, SessionKeys};
