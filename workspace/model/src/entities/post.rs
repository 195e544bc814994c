use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// A feed post. Brand accounts may flag a post as magazine content.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub thumbnail_url: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_video: bool,
    /// Only the author sees private posts.
    #[sea_orm(default_value = "false")]
    pub is_private: bool,
    #[sea_orm(default_value = "false")]
    pub is_magazine: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_bookmark::Entity")]
    PostBookmark,
    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLike,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_bookmark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostBookmark.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
