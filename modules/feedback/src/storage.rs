use anyhow::Context;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use sea_orm_migration::prelude::*;

use crate::domain::{Feedback, FeedbackRepository};

pub mod entity {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "feedback")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub rating: i16,
        pub comment: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub struct SeaOrmFeedbackRepository {
    conn: DatabaseConnection,
}

impl SeaOrmFeedbackRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl FeedbackRepository for SeaOrmFeedbackRepository {
    async fn insert(&self, feedback: Feedback) -> anyhow::Result<()> {
        let m = entity::ActiveModel {
            id: Set(feedback.id),
            user_id: Set(feedback.user_id),
            rating: Set(feedback.rating),
            comment: Set(feedback.comment),
            created_at: Set(feedback.created_at),
        };
        m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }
}

// --- migrations ---

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(InitialMigration)]
    }
}

pub struct InitialMigration;

impl MigrationName for InitialMigration {
    fn name(&self) -> &str {
        "m_feedback_initial_001"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for InitialMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeedbackTable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedbackTable::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedbackTable::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(FeedbackTable::Rating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeedbackTable::Comment).string())
                    .col(
                        ColumnDef::new(FeedbackTable::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeedbackTable::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeedbackTable {
    #[sea_orm(iden = "feedback")]
    Table,
    Id,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}
