//! SeaORM entities backing the Vinscent community site.
//!
//! Users are keyed by their login identifier (a string), which every other
//! table references directly.

pub mod follow;
pub mod post;
pub mod post_bookmark;
pub mod post_like;
pub mod user;
pub mod user_term;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::follow::Entity as Follow;
    pub use super::post::Entity as Post;
    pub use super::post_bookmark::Entity as PostBookmark;
    pub use super::post_like::Entity as PostLike;
    pub use super::user::Entity as User;
    pub use super::user_term::Entity as UserTerm;
}
