//! Password verification for both credential encodings found in the user table.
//!
//! Accounts created here store a bcrypt hash. Accounts imported from the old
//! site still hold their password verbatim until the owner next signs in.

use std::sync::OnceLock;

use tracing::{instrument, warn};

use crate::error::Result;

/// Every bcrypt variant (`$2a$`, `$2b$`, `$2y$`) starts with this.
pub const HASH_MARKER: &str = "$2";

/// A stored credential, classified by its prefix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    Hashed(&'a str),
    Plain(&'a str),
}

impl<'a> Credential<'a> {
    pub fn parse(stored: &'a str) -> Self {
        if stored.starts_with(HASH_MARKER) {
            Credential::Hashed(stored)
        } else {
            Credential::Plain(stored)
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Credential::Plain(_))
    }
}

/// Outcome of comparing a supplied password with a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Match,
    Mismatch,
    /// The credential carried the hash marker but could not be parsed.
    MalformedHash,
}

impl Verification {
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }
}

/// Compares `supplied` against `stored`, reporting why it failed.
pub fn check(supplied: &str, stored: &str) -> Verification {
    match Credential::parse(stored) {
        Credential::Hashed(hash) => match bcrypt::verify(supplied, hash) {
            Ok(true) => Verification::Match,
            Ok(false) => Verification::Mismatch,
            Err(err) => {
                warn!(%err, "Stored password hash could not be parsed");
                Verification::MalformedHash
            }
        },
        Credential::Plain(plain) if plain == supplied => Verification::Match,
        Credential::Plain(_) => Verification::Mismatch,
    }
}

/// Returns true only on a match. A malformed hash reads as a wrong password.
pub fn verify(supplied: &str, stored: &str) -> bool {
    check(supplied, stored).is_match()
}

/// Runs [`check`] on the blocking pool; bcrypt is deliberately slow.
pub async fn check_blocking(supplied: String, stored: String) -> Result<Verification> {
    Ok(tokio::task::spawn_blocking(move || check(&supplied, &stored)).await?)
}

static DECOY_HASH: OnceLock<String> = OnceLock::new();

/// A bcrypt hash at the default cost that no account owns.
fn decoy_hash() -> &'static str {
    DECOY_HASH.get_or_init(|| {
        bcrypt::hash("vinscent-decoy-credential", bcrypt::DEFAULT_COST).unwrap_or_default()
    })
}

/// Spends one bcrypt verification when there is no stored credential to check,
/// so an unknown account costs as much as a wrong password.
pub async fn check_decoy(supplied: String) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let _ = bcrypt::verify(&supplied, decoy_hash());
    })
    .await?;
    Ok(())
}

/// Hashes `password` with bcrypt at `cost` on the blocking pool.
#[instrument(skip(password))]
pub async fn hash(password: String, cost: u32) -> Result<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}
