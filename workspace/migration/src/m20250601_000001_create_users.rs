use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table, keyed by the login identifier
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string(Users::UserId).primary_key())
                    .col(string(Users::TagId).unique_key())
                    .col(string(Users::Password))
                    .col(string(Users::Name))
                    .col(integer(Users::Status).default(1))
                    .col(boolean(Users::IsBrand).default(false))
                    .col(boolean(Users::IsVerified).default(false))
                    .col(string_null(Users::Email))
                    .col(string_null(Users::Phone))
                    .col(string_null(Users::Birth))
                    .col(string_null(Users::Bio))
                    .col(string_null(Users::Location))
                    .col(string_null(Users::Website))
                    .col(string_null(Users::ProfileImage))
                    .col(string_null(Users::BusinessType))
                    .col(string_null(Users::CorporateName))
                    .col(string_null(Users::CorporateId1))
                    .col(string_null(Users::CorporateId2))
                    .col(string_null(Users::BusinessEmail))
                    .col(string_null(Users::BusinessPhone))
                    .col(date_time(Users::CreatedAt).default(Expr::current_timestamp()))
                    .col(date_time_null(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create user_terms table
        manager
            .create_table(
                Table::create()
                    .table(UserTerms::Table)
                    .if_not_exists()
                    .col(pk_auto(UserTerms::Id))
                    .col(string(UserTerms::UserId))
                    .col(boolean(UserTerms::AdultAgree))
                    .col(boolean(UserTerms::StoreAgree))
                    .col(boolean(UserTerms::MarketingAgree).default(false))
                    .col(boolean(UserTerms::ApAgree))
                    .col(date_time(UserTerms::AgreedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_terms_user")
                            .from(UserTerms::Table, UserTerms::UserId)
                            .to(Users::Table, Users::UserId)
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
            .drop_table(Table::drop().table(UserTerms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    UserId,
    TagId,
    Password,
    Name,
    Status,
    IsBrand,
    IsVerified,
    Email,
    Phone,
    Birth,
    Bio,
    Location,
    Website,
    ProfileImage,
    BusinessType,
    CorporateName,
    CorporateId1,
    CorporateId2,
    BusinessEmail,
    BusinessPhone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserTerms {
    Table,
    Id,
    UserId,
    AdultAgree,
    StoreAgree,
    MarketingAgree,
    ApAgree,
    AgreedAt,
}
