//! Member profiles: lookup with derived statistics, and self-service edits.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info, instrument, trace, warn};
use validator::{Validate, ValidateUrl, ValidationErrors};

use model::entities::user::{self, UserStatus};

use crate::error::{Result, SocialError};
use crate::follow::{self, Relationship};
use crate::guard;
use crate::posts;
use crate::session::Identity;

pub const USER_NOT_FOUND: &str = "사용자를 찾을 수 없습니다.";
pub const NAME_REQUIRED: &str = "이름을 입력해주세요.";
pub const NAME_TOO_LONG: &str = "이름은 50자 이하여야 합니다.";
pub const BIO_TOO_LONG: &str = "소개는 200자 이하여야 합니다.";
pub const LOCATION_TOO_LONG: &str = "위치는 100자 이하여야 합니다.";
pub const INVALID_WEBSITE: &str = "올바른 웹사이트 URL을 입력해주세요.";
const INVALID_INPUT: &str = "입력 정보가 올바르지 않습니다.";

/// Loads a user that other members may see. Disabled accounts read as absent.
pub async fn find_active_user(db: &DatabaseConnection, user_id: &str) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(user_id.to_string())
        .filter(user::Column::Status.eq(UserStatus::Active))
        .one(db)
        .await?)
}

/// A profile together with its counters and the viewer's relation to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: user::Model,
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    /// The viewer follows this profile.
    pub is_following: bool,
    /// This profile follows the viewer.
    pub is_followed_by: bool,
    pub is_own_profile: bool,
}

#[instrument(skip(db))]
pub async fn get_profile(
    db: &DatabaseConnection,
    user_id: &str,
    viewer_id: Option<&str>,
) -> Result<Profile> {
    trace!("Entering get_profile function");

    let user = find_active_user(db, user_id)
        .await?
        .ok_or_else(|| SocialError::UserNotFound(user_id.to_string()))?;

    let is_own_profile = viewer_id == Some(user_id);

    // Counters are independent of each other
    let (follower_count, following_count, post_count) = tokio::try_join!(
        follow::follower_count(db, user_id),
        follow::following_count(db, user_id),
        posts::visible_post_count(db, user_id, is_own_profile),
    )?;

    let relationship = match viewer_id {
        Some(viewer) if !is_own_profile => follow::relationship(db, viewer, user_id).await?,
        _ => Relationship::default(),
    };

    debug!(
        follower_count,
        following_count, post_count, "Loaded profile counters"
    );

    Ok(Profile {
        user,
        post_count,
        follower_count,
        following_count,
        is_following: relationship.is_following,
        is_followed_by: relationship.is_following_back,
        is_own_profile,
    })
}

/// Requested profile changes. `None` leaves a field untouched; an empty bio,
/// location or website clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 50, message = "이름은 50자 이하여야 합니다."))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "소개는 200자 이하여야 합니다."))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "위치는 100자 이하여야 합니다."))]
    pub location: Option<String>,
    pub website: Option<String>,
}

impl ProfileUpdate {
    /// Checks the limits, reporting the first offending field in declaration order.
    pub fn check(&self) -> Result<()> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(SocialError::validation(NAME_REQUIRED));
        }

        self.validate()
            .map_err(|errors| SocialError::Validation(first_message(&errors)))?;

        match self.website.as_deref() {
            Some(website) if !website.is_empty() && !website.validate_url() => {
                Err(SocialError::validation(INVALID_WEBSITE))
            }
            _ => Ok(()),
        }
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["name", "bio", "location"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| INVALID_INPUT.to_string())
}

fn none_if_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Applies `changes` to `user_id` on behalf of `actor`.
///
/// Ownership is checked first, then the input, then existence. A non-owner
/// therefore always gets `Forbidden`.
#[instrument(skip(db, actor), fields(actor = %actor.id))]
pub async fn update_profile(
    db: &DatabaseConnection,
    actor: &Identity,
    user_id: &str,
    changes: ProfileUpdate,
) -> Result<user::Model> {
    trace!("Entering update_profile function");

    guard::ensure_profile_owner(actor, user_id)?;

    if let Err(err) = changes.check() {
        warn!(%err, "Profile update rejected");
        return Err(err);
    }

    let existing = find_active_user(db, user_id)
        .await?
        .ok_or_else(|| SocialError::UserNotFound(user_id.to_string()))?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(none_if_empty(bio));
    }
    if let Some(location) = changes.location {
        active.location = Set(none_if_empty(location));
    }
    if let Some(website) = changes.website {
        active.website = Set(none_if_empty(website));
    }
    active.updated_at = Set(Some(Utc::now().naive_utc()));

    let updated = active.update(db).await?;
    info!("Updated profile of {}", updated.user_id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[tokio::test]
    async fn test_profile_counts_and_flags() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;
        let carol = new_user(&db, "carol").await?;

        new_follow(&db, &bob, &alice).await?;
        new_follow(&db, &carol, &alice).await?;
        new_follow(&db, &alice, &bob).await?;
        new_post(&db, &alice, PostFlags::default()).await?;
        new_post(&db, &alice, PostFlags { private: true, ..Default::default() }).await?;

        let as_bob = get_profile(&db, "alice", Some("bob")).await?;
        assert_eq!(as_bob.follower_count, 2);
        assert_eq!(as_bob.following_count, 1);
        assert_eq!(as_bob.post_count, 1);
        assert!(as_bob.is_following);
        assert!(as_bob.is_followed_by);
        assert!(!as_bob.is_own_profile);

        let own = get_profile(&db, "alice", Some("alice")).await?;
        assert_eq!(own.post_count, 2);
        assert!(own.is_own_profile);
        assert!(!own.is_following);

        let anonymous = get_profile(&db, "alice", None).await?;
        assert!(!anonymous.is_following && !anonymous.is_followed_by);
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_profile_is_not_found_even_for_owner() -> TestResult {
        let db = setup_db().await?;
        let ghost = new_user(&db, "ghost").await?;
        disable(&db, ghost).await?;

        for viewer in [None, Some("ghost"), Some("someone")] {
            assert!(matches!(
                get_profile(&db, "ghost", viewer).await,
                Err(SocialError::UserNotFound(_))
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_followers_are_not_counted() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;
        new_follow(&db, &bob, &alice).await?;
        disable(&db, bob).await?;

        let profile = get_profile(&db, "alice", None).await?;
        assert_eq!(profile.follower_count, 0);
        Ok(())
    }

    #[test]
    fn test_update_limits() {
        let ok = ProfileUpdate {
            name: Some("가".repeat(50)),
            bio: Some("b".repeat(200)),
            location: Some(String::new()),
            website: Some("https://vinscent.example/about".to_string()),
        };
        assert!(ok.check().is_ok());

        let cases = [
            (ProfileUpdate { name: Some("가".repeat(51)), ..Default::default() }, NAME_TOO_LONG),
            (ProfileUpdate { name: Some("  ".to_string()), ..Default::default() }, NAME_REQUIRED),
            (ProfileUpdate { bio: Some("b".repeat(201)), ..Default::default() }, BIO_TOO_LONG),
            (ProfileUpdate { location: Some("l".repeat(101)), ..Default::default() }, LOCATION_TOO_LONG),
            (ProfileUpdate { website: Some("not a url".to_string()), ..Default::default() }, INVALID_WEBSITE),
        ];
        for (update, expected) in cases {
            match update.check() {
                Err(SocialError::Validation(message)) => assert_eq!(message, expected),
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        // Empty website clears the field
        let clear = ProfileUpdate { website: Some(String::new()), ..Default::default() };
        assert!(clear.check().is_ok());
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_before_existence() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;

        let result = update_profile(
            &db,
            &Identity::from(&alice),
            "nobody",
            ProfileUpdate { bio: Some("b".repeat(500)), ..Default::default() },
        )
        .await;
        assert!(matches!(result, Err(SocialError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_applies_and_clears_fields() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let actor = Identity::from(&alice);

        let updated = update_profile(
            &db,
            &actor,
            "alice",
            ProfileUpdate {
                name: Some(" Alice Kim ".to_string()),
                bio: Some("Citrus and vetiver".to_string()),
                website: Some("https://alice.example".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.name, "Alice Kim");
        assert_eq!(updated.bio.as_deref(), Some("Citrus and vetiver"));
        assert!(updated.updated_at.is_some());

        let cleared = update_profile(
            &db,
            &actor,
            "alice",
            ProfileUpdate { website: Some(String::new()), ..Default::default() },
        )
        .await?;
        assert_eq!(cleared.website, None);
        assert_eq!(cleared.bio.as_deref(), Some("Citrus and vetiver"));
        assert_eq!(cleared.name, "Alice Kim");
        Ok(())
    }
}
