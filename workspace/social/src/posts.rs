//! Post listings shown on a profile: authored posts, saved posts and the
//! magazine shelf of brand accounts.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use tracing::{debug, instrument, trace, warn};

use common::{PageRequest, PostKind};
use model::entities::{
    post, post_bookmark, post_like,
    user::{self, UserStatus},
};

use crate::error::{Result, SocialError};
use crate::guard;
use crate::profile::find_active_user;
use crate::session::Identity;

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";
pub const CAPTION_LENGTH: usize = 100;
pub const BRAND_ONLY_MAGAZINE: &str = "브랜드 회원의 매거진만 조회할 수 있습니다.";

/// A post as it appears in a profile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub post: post::Model,
    pub like_count: u64,
    /// Only set when the listing was requested by a signed-in member
    pub is_liked: Option<bool>,
    pub is_saved: Option<bool>,
}

impl PostCard {
    pub fn image(&self) -> &str {
        self.post
            .thumbnail_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// The first hundred characters of the body.
    pub fn caption(&self) -> String {
        self.post
            .content
            .as_deref()
            .map(|content| content.chars().take(CAPTION_LENGTH).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub items: Vec<PostCard>,
    pub total_count: u64,
}

fn authored(owner_id: &str, include_private: bool) -> Select<post::Entity> {
    let mut select = post::Entity::find().filter(post::Column::UserId.eq(owner_id));
    if !include_private {
        select = select.filter(post::Column::IsPrivate.eq(false));
    }
    select
}

fn saved(owner_id: &str) -> Select<post::Entity> {
    post::Entity::find()
        .join(JoinType::InnerJoin, post::Relation::PostBookmark.def())
        .join(JoinType::InnerJoin, post::Relation::User.def())
        .filter(post_bookmark::Column::UserId.eq(owner_id))
        .filter(user::Column::Status.eq(UserStatus::Active))
        .filter(
            Condition::any()
                .add(post::Column::IsPrivate.eq(false))
                .add(post::Column::UserId.eq(owner_id)),
        )
        .order_by_desc(post_bookmark::Column::CreatedAt)
}

/// Number of `owner_id`'s posts a viewer can see.
pub async fn visible_post_count(
    db: &DatabaseConnection,
    owner_id: &str,
    include_private: bool,
) -> Result<u64> {
    Ok(authored(owner_id, include_private).count(db).await?)
}

/// Lists one page of `kind` posts from `owner_id`'s profile.
///
/// The owner must exist and be active. Saved posts are visible to the owner
/// only and magazine shelves exist only on brand accounts; both rules are
/// checked before any post is read.
#[instrument(skip(db, requester), fields(requester = requester.map(|r| r.id.as_str())))]
pub async fn list_posts(
    db: &DatabaseConnection,
    owner_id: &str,
    requester: Option<&Identity>,
    kind: PostKind,
    page: PageRequest,
) -> Result<PostPage> {
    trace!("Entering list_posts function");

    let owner = find_active_user(db, owner_id)
        .await?
        .ok_or_else(|| SocialError::UserNotFound(owner_id.to_string()))?;
    let is_own = requester.is_some_and(|r| r.id == owner.user_id);

    let select = match kind {
        PostKind::Posts => authored(owner_id, is_own),
        PostKind::Saved => {
            guard::ensure_can_view_saved(requester, owner_id)?;
            saved(owner_id)
        }
        PostKind::Magazine => {
            if !owner.is_brand {
                warn!(owner = %owner_id, "Magazine listing for a non-brand account");
                return Err(SocialError::NotABrandAccount(owner_id.to_string()));
            }
            authored(owner_id, is_own).filter(post::Column::IsMagazine.eq(true))
        }
    };

    let paginator = select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .paginate(db, page.limit);
    let total_count = paginator.num_items().await?;
    // Pages past the end are empty without touching the paginator's offset math
    let posts = if page.reaches(total_count) {
        paginator.fetch_page(page.index()).await?
    } else {
        Vec::new()
    };
    debug!("Fetched {} of {} {} posts", posts.len(), total_count, kind);

    let items = decorate(db, posts, requester).await?;
    Ok(PostPage { items, total_count })
}

/// Attaches like counts and, for signed-in requesters, their own like and
/// bookmark flags. Issues one grouped query per concern.
async fn decorate(
    db: &DatabaseConnection,
    posts: Vec<post::Model>,
    requester: Option<&Identity>,
) -> Result<Vec<PostCard>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = posts.iter().map(|post| post.id).collect();

    let like_counts: HashMap<i32, i64> = post_like::Entity::find()
        .select_only()
        .column(post_like::Column::PostId)
        .column_as(post_like::Column::UserId.count(), "like_count")
        .filter(post_like::Column::PostId.is_in(ids.clone()))
        .group_by(post_like::Column::PostId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let flags = match requester {
        Some(requester) => {
            let liked: HashSet<i32> = post_like::Entity::find()
                .select_only()
                .column(post_like::Column::PostId)
                .filter(post_like::Column::UserId.eq(requester.id.as_str()))
                .filter(post_like::Column::PostId.is_in(ids.clone()))
                .into_tuple::<i32>()
                .all(db)
                .await?
                .into_iter()
                .collect();
            let saved: HashSet<i32> = post_bookmark::Entity::find()
                .select_only()
                .column(post_bookmark::Column::PostId)
                .filter(post_bookmark::Column::UserId.eq(requester.id.as_str()))
                .filter(post_bookmark::Column::PostId.is_in(ids))
                .into_tuple::<i32>()
                .all(db)
                .await?
                .into_iter()
                .collect();
            Some((liked, saved))
        }
        None => None,
    };

    Ok(posts
        .into_iter()
        .map(|post| {
            let like_count = like_counts.get(&post.id).copied().unwrap_or(0).max(0) as u64;
            let (is_liked, is_saved) = match &flags {
                Some((liked, saved)) => (Some(liked.contains(&post.id)), Some(saved.contains(&post.id))),
                None => (None, None),
            };
            PostCard {
                post,
                like_count,
                is_liked,
                is_saved,
            }
        })
        .collect())
}
