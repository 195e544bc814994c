//! Directed follow edges between members.
//!
//! The composite primary key on `(follower_id, following_id)` is the only
//! guard against duplicate edges. Inserts are written expecting to lose a race
//! against that constraint, and a rejected insert reads as `AlreadyFollowing`.
//! Counters are always computed from the edge table, never stored.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};
use tracing::{debug, info, instrument, trace, warn};

use common::{PageRequest, RelationshipType};
use model::entities::{
    follow,
    user::{self, UserStatus},
};

use crate::error::{Result, SocialError};
use crate::guard;
use crate::profile::find_active_user;

/// State of an edge after a follow or unfollow, with the target's fresh
/// follower count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowResult {
    pub target_name: String,
    pub is_following: bool,
    pub follower_count: u64,
    pub followed_at: Option<NaiveDateTime>,
}

/// The two independent edges between a pair of members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relationship {
    /// `a` follows `b`
    pub is_following: bool,
    /// `b` follows `a`
    pub is_following_back: bool,
}

impl Relationship {
    pub fn relationship_type(&self) -> RelationshipType {
        RelationshipType::from_flags(self.is_following, self.is_following_back)
    }
}

async fn find_target(db: &DatabaseConnection, target_id: &str) -> Result<user::Model> {
    match find_active_user(db, target_id).await? {
        Some(target) => Ok(target),
        None => {
            warn!(target = %target_id, "Follow target is missing or disabled");
            Err(SocialError::TargetNotFound(target_id.to_string()))
        }
    }
}

async fn edge_exists(db: &DatabaseConnection, follower_id: &str, following_id: &str) -> Result<bool> {
    Ok(
        follow::Entity::find_by_id((follower_id.to_string(), following_id.to_string()))
            .one(db)
            .await?
            .is_some(),
    )
}

fn insert_error(err: DbErr, actor_id: &str, target_id: &str) -> SocialError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(actor = %actor_id, target = %target_id, "Concurrent follow lost the insert race");
            SocialError::AlreadyFollowing(target_id.to_string())
        }
        // The actor's own row vanished after its token was issued
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            warn!(actor = %actor_id, "Follow by an unknown actor");
            SocialError::UserNotFound(actor_id.to_string())
        }
        _ => SocialError::Database(err),
    }
}

/// Creates the edge `actor_id -> target_id`.
#[instrument(skip(db))]
pub async fn follow(db: &DatabaseConnection, actor_id: &str, target_id: &str) -> Result<FollowResult> {
    trace!("Entering follow function");

    guard::ensure_not_self(actor_id, target_id)?;
    let target = find_target(db, target_id).await?;

    if edge_exists(db, actor_id, target_id).await? {
        warn!(actor = %actor_id, target = %target_id, "Already following");
        return Err(SocialError::AlreadyFollowing(target_id.to_string()));
    }

    let followed_at = Utc::now().naive_utc();
    let edge = follow::ActiveModel {
        follower_id: Set(actor_id.to_string()),
        following_id: Set(target_id.to_string()),
        created_at: Set(followed_at),
    };
    follow::Entity::insert(edge)
        .exec_without_returning(db)
        .await
        .map_err(|err| insert_error(err, actor_id, target_id))?;

    let follower_count = follower_count(db, target_id).await?;
    info!("{} now follows {} ({} followers)", actor_id, target_id, follower_count);

    Ok(FollowResult {
        target_name: target.name,
        is_following: true,
        follower_count,
        followed_at: Some(followed_at),
    })
}

/// Removes the edge `actor_id -> target_id`. A second call reports `NotFollowing`.
#[instrument(skip(db))]
pub async fn unfollow(db: &DatabaseConnection, actor_id: &str, target_id: &str) -> Result<FollowResult> {
    trace!("Entering unfollow function");

    guard::ensure_not_self(actor_id, target_id)?;
    let target = find_target(db, target_id).await?;

    let deleted = follow::Entity::delete_many()
        .filter(follow::Column::FollowerId.eq(actor_id))
        .filter(follow::Column::FollowingId.eq(target_id))
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        warn!(actor = %actor_id, target = %target_id, "Unfollow without an edge");
        return Err(SocialError::NotFollowing(target_id.to_string()));
    }

    let follower_count = follower_count(db, target_id).await?;
    info!("{} unfollowed {} ({} followers)", actor_id, target_id, follower_count);

    Ok(FollowResult {
        target_name: target.name,
        is_following: false,
        follower_count,
        followed_at: None,
    })
}

/// Reads both edges between `a` and `b`.
#[instrument(skip(db))]
pub async fn relationship(db: &DatabaseConnection, a: &str, b: &str) -> Result<Relationship> {
    let (is_following, is_following_back) =
        tokio::try_join!(edge_exists(db, a, b), edge_exists(db, b, a))?;
    debug!(is_following, is_following_back, "Resolved relationship");
    Ok(Relationship {
        is_following,
        is_following_back,
    })
}

/// Active members following `user_id`.
pub async fn follower_count(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    Ok(follow::Entity::find()
        .join(JoinType::InnerJoin, follow::Relation::Follower.def())
        .filter(follow::Column::FollowingId.eq(user_id))
        .filter(user::Column::Status.eq(UserStatus::Active))
        .count(db)
        .await?)
}

/// Active members `user_id` follows.
pub async fn following_count(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    Ok(follow::Entity::find()
        .join(JoinType::InnerJoin, follow::Relation::Following.def())
        .filter(follow::Column::FollowerId.eq(user_id))
        .filter(user::Column::Status.eq(UserStatus::Active))
        .count(db)
        .await?)
}

/// Which side of the edge a member listing is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Followers,
    Following,
}

/// One page of active counterparts of `user_id`, newest edge first, together
/// with the total count under the same filter.
#[instrument(skip(db))]
pub async fn list_members(
    db: &DatabaseConnection,
    user_id: &str,
    direction: Direction,
    page: PageRequest,
) -> Result<(Vec<user::Model>, u64)> {
    trace!("Entering list_members function");

    find_active_user(db, user_id)
        .await?
        .ok_or_else(|| SocialError::UserNotFound(user_id.to_string()))?;

    // Join users onto the side of the edge that names the counterpart
    let (relation, owner_column) = match direction {
        Direction::Followers => (follow::Relation::Follower, follow::Column::FollowingId),
        Direction::Following => (follow::Relation::Following, follow::Column::FollowerId),
    };

    let paginator = user::Entity::find()
        .join(JoinType::InnerJoin, relation.def().rev())
        .filter(owner_column.eq(user_id))
        .filter(user::Column::Status.eq(UserStatus::Active))
        .order_by_desc(follow::Column::CreatedAt)
        .order_by_asc(user::Column::UserId)
        .paginate(db, page.limit);

    let total = paginator.num_items().await?;
    let members = if page.reaches(total) {
        paginator.fetch_page(page.index()).await?
    } else {
        Vec::new()
    };
    debug!("Fetched {} of {} members", members.len(), total);

    Ok((members, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[tokio::test]
    async fn test_follow_then_unfollow() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "alice").await?;
        new_user(&db, "bob").await?;

        let followed = follow(&db, "alice", "bob").await?;
        assert!(followed.is_following);
        assert_eq!(followed.follower_count, 1);
        assert_eq!(followed.target_name, "BOB");
        assert!(followed.followed_at.is_some());

        let unfollowed = unfollow(&db, "alice", "bob").await?;
        assert!(!unfollowed.is_following);
        assert_eq!(unfollowed.follower_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unfollow_twice_reports_not_following() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;
        new_follow(&db, &alice, &bob).await?;

        assert!(unfollow(&db, "alice", "bob").await.is_ok());
        assert!(matches!(
            unfollow(&db, "alice", "bob").await,
            Err(SocialError::NotFollowing(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_follow_twice_reports_already_following() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "alice").await?;
        new_user(&db, "bob").await?;

        follow(&db, "alice", "bob").await?;
        assert!(matches!(
            follow(&db, "alice", "bob").await,
            Err(SocialError::AlreadyFollowing(_))
        ));
        assert_eq!(follower_count(&db, "bob").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_follows_leave_one_edge() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "alice").await?;
        new_user(&db, "bob").await?;

        let (first, second) = tokio::join!(follow(&db, "alice", "bob"), follow(&db, "alice", "bob"));
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|r| matches!(r, Err(SocialError::AlreadyFollowing(_))))
                .count(),
            1
        );
        assert_eq!(follower_count(&db, "bob").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_already_following() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;
        new_follow(&db, &alice, &bob).await?;

        // Bypass the existence check to hit the constraint directly
        let err = follow::Entity::insert(follow::ActiveModel {
            follower_id: Set("alice".to_string()),
            following_id: Set("bob".to_string()),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec_without_returning(&db)
        .await
        .unwrap_err();
        assert!(matches!(
            insert_error(err, "alice", "bob"),
            SocialError::AlreadyFollowing(_)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_self_follow_is_denied_regardless_of_existence() -> TestResult {
        let db = setup_db().await?;
        let ghost = new_user(&db, "ghost").await?;
        disable(&db, ghost).await?;

        for id in ["alice", "ghost", "nobody"] {
            assert!(matches!(
                follow(&db, id, id).await,
                Err(SocialError::SelfFollowDenied)
            ));
            assert!(matches!(
                unfollow(&db, id, id).await,
                Err(SocialError::SelfFollowDenied)
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_or_disabled_target() -> TestResult {
        let db = setup_db().await?;
        new_user(&db, "alice").await?;
        let ghost = new_user(&db, "ghost").await?;
        disable(&db, ghost).await?;

        for target in ["nobody", "ghost"] {
            assert!(matches!(
                follow(&db, "alice", target).await,
                Err(SocialError::TargetNotFound(_))
            ));
            assert!(matches!(
                unfollow(&db, "alice", target).await,
                Err(SocialError::TargetNotFound(_))
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_relationship_derivation() -> TestResult {
        let db = setup_db().await?;
        let alice = new_user(&db, "alice").await?;
        let bob = new_user(&db, "bob").await?;

        let none = relationship(&db, "alice", "bob").await?;
        assert_eq!(none.relationship_type(), RelationshipType::None);

        new_follow(&db, &alice, &bob).await?;
        assert_eq!(
            relationship(&db, "alice", "bob").await?.relationship_type(),
            RelationshipType::Following
        );
        assert_eq!(
            relationship(&db, "bob", "alice").await?.relationship_type(),
            RelationshipType::Follower
        );

        new_follow(&db, &bob, &alice).await?;
        let mutual = relationship(&db, "alice", "bob").await?;
        assert!(mutual.is_following && mutual.is_following_back);
        assert_eq!(mutual.relationship_type(), RelationshipType::Mutual);
        Ok(())
    }

    #[tokio::test]
    async fn test_member_lists_hide_disabled_and_paginate() -> TestResult {
        let db = setup_db().await?;
        let star = new_user(&db, "star").await?;
        for id in ["f1", "f2", "f3"] {
            let fan = new_user(&db, id).await?;
            new_follow(&db, &fan, &star).await?;
        }
        let gone = new_user(&db, "gone").await?;
        new_follow(&db, &gone, &star).await?;
        disable(&db, gone).await?;

        let (first, total) =
            list_members(&db, "star", Direction::Followers, PageRequest::new(1, 2, 50)).await?;
        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|member| member.user_id != "gone"));

        let (second, _) =
            list_members(&db, "star", Direction::Followers, PageRequest::new(2, 2, 50)).await?;
        assert_eq!(second.len(), 1);

        let (following, total) =
            list_members(&db, "f1", Direction::Following, PageRequest::new(1, 12, 50)).await?;
        assert_eq!(total, 1);
        assert_eq!(following[0].user_id, "star");

        assert_eq!(follower_count(&db, "star").await?, total_followers(&db, "star").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_member_page_beyond_range_is_empty() -> TestResult {
        let db = setup_db().await?;
        let star = new_user(&db, "star").await?;
        let fan = new_user(&db, "fan").await?;
        new_follow(&db, &fan, &star).await?;

        let (members, total) = list_members(
            &db,
            "star",
            Direction::Followers,
            PageRequest::new(i64::MAX as u64, 12, 50),
        )
        .await?;
        assert_eq!(total, 1);
        assert!(members.is_empty());
        Ok(())
    }

    async fn total_followers(db: &DatabaseConnection, id: &str) -> Result<u64> {
        let (_, total) =
            list_members(db, id, Direction::Followers, PageRequest::new(1, 1, 50)).await?;
        Ok(total)
    }
}
