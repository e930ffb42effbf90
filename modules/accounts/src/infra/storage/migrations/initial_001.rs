use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::Name).string().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::RelationToPatient)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfiles::FamilyId).uuid().not_null())
                    .col(ColumnDef::new(UserProfiles::AvatarKey).string())
                    .col(ColumnDef::new(UserProfiles::AvatarUrl).string())
                    .col(
                        ColumnDef::new(UserProfiles::MainChallenges)
                            .json()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfiles::HelpNeeds).json().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::TermsAcceptedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FamilyLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FamilyLinks::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(FamilyLinks::UniqueCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FamilyLinks::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(FamilyLinks::FamilyId).uuid().not_null())
                    .col(ColumnDef::new(FamilyLinks::Status).string().not_null())
                    .col(
                        ColumnDef::new(FamilyLinks::MemberCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_family_links_creator")
                    .table(FamilyLinks::Table)
                    .col(FamilyLinks::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmailChangeRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailChangeRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmailChangeRequests::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailChangeRequests::NewEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailChangeRequests::CodeHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailChangeRequests::SentAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailChangeRequests::VerifiedAt)
                            .timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_email_change_requests_user_sent")
                    .table(EmailChangeRequests::Table)
                    .col(EmailChangeRequests::UserId)
                    .col(EmailChangeRequests::SentAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PushTokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PushTokens::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PushTokens::UserId).uuid().not_null())
                    .col(ColumnDef::new(PushTokens::Token).string().not_null())
                    .col(ColumnDef::new(PushTokens::Platform).string().not_null())
                    .col(
                        ColumnDef::new(PushTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_push_tokens_user_token")
                    .table(PushTokens::Table)
                    .col(PushTokens::UserId)
                    .col(PushTokens::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Body).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_created")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PushTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailChangeRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FamilyLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Name,
    Email,
    RelationToPatient,
    FamilyId,
    AvatarKey,
    AvatarUrl,
    MainChallenges,
    HelpNeeds,
    TermsAcceptedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FamilyLinks {
    Table,
    Id,
    UniqueCode,
    CreatorId,
    FamilyId,
    Status,
    MemberCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EmailChangeRequests {
    Table,
    Id,
    UserId,
    NewEmail,
    CodeHash,
    SentAt,
    VerifiedAt,
}

#[derive(DeriveIden)]
enum PushTokens {
    Table,
    Id,
    UserId,
    Token,
    Platform,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Body,
    Read,
    CreatedAt,
}
