//! SeaORM entities for the planner module.

pub mod appointment {
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "appointments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
        pub reminder: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::contract::model::Appointment {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                user_id: m.user_id,
                title: m.title,
                description: m.description,
                date: m.date,
                start_time: m.start_time,
                end_time: m.end_time,
                reminder: m.reminder,
                created_at: m.created_at,
                updated_at: m.updated_at,
            }
        }
    }
}

pub mod care_log {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "logs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub appointment_id: Option<Uuid>,
        pub text: String,
        pub date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::contract::model::LogEntry {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                user_id: m.user_id,
                appointment_id: m.appointment_id,
                text: m.text,
                date: m.date,
                created_at: m.created_at,
                updated_at: m.updated_at,
            }
        }
    }
}
