//! Ownership rules applied before any mutation or private read.

use tracing::warn;

use crate::error::{Result, SocialError};
use crate::session::Identity;

pub const PROFILE_OWNER_ONLY: &str = "본인의 프로필만 수정할 수 있습니다.";
pub const SAVED_OWNER_ONLY: &str = "본인의 저장된 게시글만 조회할 수 있습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Permit,
    Deny,
}

/// Only the owner may mutate their own resources.
pub fn can_mutate(actor: &Identity, owner_id: &str) -> Access {
    if actor.id == owner_id {
        Access::Permit
    } else {
        Access::Deny
    }
}

/// Profile updates. Runs before the target is looked up, so a non-owner is
/// refused even when the target does not exist.
pub fn ensure_profile_owner(actor: &Identity, owner_id: &str) -> Result<()> {
    match can_mutate(actor, owner_id) {
        Access::Permit => Ok(()),
        Access::Deny => {
            warn!(actor = %actor.id, owner = %owner_id, "Profile update by non-owner refused");
            Err(SocialError::Forbidden(PROFILE_OWNER_ONLY.to_string()))
        }
    }
}

/// Follow edges never point at their own source.
pub fn ensure_not_self(actor_id: &str, target_id: &str) -> Result<()> {
    if actor_id == target_id {
        warn!(actor = %actor_id, "Self-follow refused");
        return Err(SocialError::SelfFollowDenied);
    }
    Ok(())
}

/// Saved posts are visible to their owner only, anonymous requesters included.
pub fn ensure_can_view_saved(requester: Option<&Identity>, owner_id: &str) -> Result<()> {
    match requester.map(|actor| can_mutate(actor, owner_id)) {
        Some(Access::Permit) => Ok(()),
        _ => {
            warn!(owner = %owner_id, "Saved listing by non-owner refused");
            Err(SocialError::Forbidden(SAVED_OWNER_ONLY.to_string()))
        }
    }
}
