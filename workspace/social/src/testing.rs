use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Set,
};

use model::entities::{
    follow, post, post_bookmark, post_like,
    user::{self, UserStatus},
};

use crate::error::Result;
use crate::session::Identity;

pub type TestResult = Result<()>;

/// Cheapest cost bcrypt accepts.
pub const TEST_COST: u32 = 4;

pub async fn setup_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn new_user_with_password(
    db: &DatabaseConnection,
    user_id: &str,
    password: &str,
) -> Result<user::Model> {
    Ok(user::ActiveModel {
        user_id: Set(user_id.to_string()),
        tag_id: Set(format!("{}_tag", user_id)),
        password: Set(password.to_string()),
        name: Set(user_id.to_uppercase()),
        status: Set(UserStatus::Active),
        is_brand: Set(false),
        is_verified: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn new_user(db: &DatabaseConnection, user_id: &str) -> Result<user::Model> {
    new_user_with_password(db, user_id, "password123").await
}

pub async fn new_brand(db: &DatabaseConnection, user_id: &str) -> Result<user::Model> {
    let brand = new_user(db, user_id).await?;
    let mut active: user::ActiveModel = brand.into();
    active.is_brand = Set(true);
    active.business_type = Set(Some("perfumery".to_string()));
    active.corporate_name = Set(Some(format!("{} Inc.", user_id)));
    Ok(active.update(db).await?)
}

pub async fn disable(db: &DatabaseConnection, user: user::Model) -> Result<user::Model> {
    let mut active: user::ActiveModel = user.into();
    active.status = Set(UserStatus::Disabled);
    Ok(active.update(db).await?)
}

pub fn identity(user: &user::Model) -> Identity {
    Identity::from(user)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostFlags {
    pub private: bool,
    pub magazine: bool,
    pub video: bool,
}

pub async fn new_post(db: &DatabaseConnection, owner: &user::Model, flags: PostFlags) -> Result<post::Model> {
    // Distinct timestamps keep newest-first ordering deterministic
    let count = post::Entity::find().all(db).await?.len() as i64;
    Ok(post::ActiveModel {
        user_id: Set(owner.user_id.clone()),
        content: Set(Some(format!("Notes on bottle #{}", count + 1))),
        is_private: Set(flags.private),
        is_magazine: Set(flags.magazine),
        is_video: Set(flags.video),
        created_at: Set(Utc::now().naive_utc() + Duration::seconds(count)),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn new_follow(
    db: &DatabaseConnection,
    follower: &user::Model,
    following: &user::Model,
) -> Result<()> {
    follow::Entity::insert(follow::ActiveModel {
        follower_id: Set(follower.user_id.clone()),
        following_id: Set(following.user_id.clone()),
        created_at: Set(Utc::now().naive_utc()),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

pub async fn new_like(db: &DatabaseConnection, user: &user::Model, post: &post::Model) -> Result<()> {
    post_like::Entity::insert(post_like::ActiveModel {
        user_id: Set(user.user_id.clone()),
        post_id: Set(post.id),
        created_at: Set(Utc::now().naive_utc()),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

pub async fn new_bookmark(
    db: &DatabaseConnection,
    user: &user::Model,
    post: &post::Model,
) -> Result<()> {
    post_bookmark::Entity::insert(post_bookmark::ActiveModel {
        user_id: Set(user.user_id.clone()),
        post_id: Set(post.id),
        created_at: Set(Utc::now().naive_utc()),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

