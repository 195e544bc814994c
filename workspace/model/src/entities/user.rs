use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// Whether an account may sign in and be seen by other members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum UserStatus {
    #[sea_orm(num_value = 0)]
    Disabled,
    #[sea_orm(num_value = 1)]
    Active,
}

/// A member of the community, either an individual or a brand.
///
/// `user_id` doubles as the login handle, `tag_id` is the public `@handle`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(unique)]
    pub tag_id: String,
    /// Either a bcrypt hash or, for accounts imported from the old site, plain text.
    pub password: String,
    pub name: String,
    pub status: UserStatus,
    /// Fixed at signup.
    pub is_brand: bool,
    pub is_verified: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,

    // Brand accounts only
    pub business_type: Option<String>,
    pub corporate_name: Option<String>,
    pub corporate_id1: Option<String>,
    pub corporate_id2: Option<String>,
    pub business_email: Option<String>,
    pub business_phone: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Entity {
    pub fn find_by_tag(tag_id: &str) -> Select<Entity> {
        Self::find().filter(Column::TagId.eq(tag_id))
    }
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::user_term::Entity")]
    UserTerm,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user_term::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTerm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
