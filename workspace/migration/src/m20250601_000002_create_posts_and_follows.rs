use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create posts table
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(pk_auto(Posts::Id))
                    .col(string(Posts::UserId))
                    .col(string_null(Posts::Title))
                    .col(text_null(Posts::Content))
                    .col(string_null(Posts::ThumbnailUrl))
                    .col(boolean(Posts::IsVideo).default(false))
                    .col(boolean(Posts::IsPrivate).default(false))
                    .col(boolean(Posts::IsMagazine).default(false))
                    .col(date_time(Posts::CreatedAt).default(Expr::current_timestamp()))
                    .col(date_time_null(Posts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_user_created")
                    .table(Posts::Table)
                    .col(Posts::UserId)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create follows table. The composite primary key is the uniqueness
        // constraint on (follower, following).
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(string(Follows::FollowerId))
                    .col(string(Follows::FollowingId))
                    .col(date_time(Follows::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .name("pk_follows")
                            .col(Follows::FollowerId)
                            .col(Follows::FollowingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_follower")
                            .from(Follows::Table, Follows::FollowerId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_following")
                            .from(Follows::Table, Follows::FollowingId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Follower counts look edges up by the followed side
        manager
            .create_index(
                Index::create()
                    .name("idx_follows_following")
                    .table(Follows::Table)
                    .col(Follows::FollowingId)
                    .to_owned(),
            )
            .await?;

        // Create post_bookmarks table (join table)
        manager
            .create_table(
                Table::create()
                    .table(PostBookmarks::Table)
                    .if_not_exists()
                    .col(string(PostBookmarks::UserId))
                    .col(integer(PostBookmarks::PostId))
                    .col(date_time(PostBookmarks::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .name("pk_post_bookmarks")
                            .col(PostBookmarks::UserId)
                            .col(PostBookmarks::PostId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_bookmarks_user")
                            .from(PostBookmarks::Table, PostBookmarks::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_bookmarks_post")
                            .from(PostBookmarks::Table, PostBookmarks::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create post_likes table (join table)
        manager
            .create_table(
                Table::create()
                    .table(PostLikes::Table)
                    .if_not_exists()
                    .col(string(PostLikes::UserId))
                    .col(integer(PostLikes::PostId))
                    .col(date_time(PostLikes::CreatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .name("pk_post_likes")
                            .col(PostLikes::UserId)
                            .col(PostLikes::PostId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_user")
                            .from(PostLikes::Table, PostLikes::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_likes_post")
                            .from(PostLikes::Table, PostLikes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostBookmarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    UserId,
    Title,
    Content,
    ThumbnailUrl,
    IsVideo,
    IsPrivate,
    IsMagazine,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Follows {
    Table,
    FollowerId,
    FollowingId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PostBookmarks {
    Table,
    UserId,
    PostId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PostLikes {
    Table,
    UserId,
    PostId,
    CreatedAt,
}
