//! SeaORM-backed repository implementation for the planner domain port.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Appointment, LogEntry};
use crate::domain::repo::PlannerRepository;
use crate::infra::storage::entity::{appointment, care_log};

pub struct SeaOrmPlannerRepository {
    conn: DatabaseConnection,
}

impl SeaOrmPlannerRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

/// Delete every planner row owned by `user_id` on the given connection.
/// Generic over `ConnectionTrait` so the accounts deletion fan-out can run it
/// inside its own transaction. Returns the number of rows removed.
pub async fn purge_user_rows<C>(conn: &C, user_id: Uuid) -> anyhow::Result<u64>
where
    C: ConnectionTrait,
{
    let logs = care_log::Entity::delete_many()
        .filter(care_log::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .context("log purge failed")?
        .rows_affected;
    let appointments = appointment::Entity::delete_many()
        .filter(appointment::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .context("appointment purge failed")?
        .rows_affected;
    Ok(logs + appointments)
}

fn appointment_active_model(a: &Appointment) -> appointment::ActiveModel {
    appointment::ActiveModel {
        id: Set(a.id),
        user_id: Set(a.user_id),
        title: Set(a.title.clone()),
        description: Set(a.description.clone()),
        date: Set(a.date),
        start_time: Set(a.start_time),
        end_time: Set(a.end_time),
        reminder: Set(a.reminder),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

fn log_active_model(l: &LogEntry) -> care_log::ActiveModel {
    care_log::ActiveModel {
        id: Set(l.id),
        user_id: Set(l.user_id),
        appointment_id: Set(l.appointment_id),
        text: Set(l.text.clone()),
        date: Set(l.date),
        created_at: Set(l.created_at),
        updated_at: Set(l.updated_at),
    }
}

#[async_trait::async_trait]
impl PlannerRepository for SeaOrmPlannerRepository {
    async fn list_appointments(&self, user_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        let rows = appointment::Entity::find()
            .filter(appointment::Column::UserId.eq(user_id))
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::StartTime)
            .all(&self.conn)
            .await
            .context("list_appointments failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_appointment(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Appointment>> {
        let found = appointment::Entity::find_by_id(id)
            .filter(appointment::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("find_appointment failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_appointment_owner(&self, id: Uuid) -> anyhow::Result<Option<Uuid>> {
        let found = appointment::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_appointment_owner failed")?;
        Ok(found.map(|m| m.user_id))
    }

    async fn insert_appointment(&self, a: Appointment) -> anyhow::Result<()> {
        appointment_active_model(&a)
            .insert(&self.conn)
            .await
            .context("insert_appointment failed")?;
        Ok(())
    }

    async fn update_appointment(&self, a: Appointment) -> anyhow::Result<()> {
        appointment_active_model(&a)
            .update(&self.conn)
            .await
            .context("update_appointment failed")?;
        Ok(())
    }

    async fn delete_appointment_cascade(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let existing = appointment::Entity::find_by_id(id)
            .filter(appointment::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("appointment lookup failed")?;
        if existing.is_none() {
            txn.rollback().await.context("rollback failed")?;
            return Ok(false);
        }

        // Dependent logs go first so the cascade cannot orphan them.
        care_log::Entity::delete_many()
            .filter(care_log::Column::AppointmentId.eq(id))
            .exec(&txn)
            .await
            .context("dependent log delete failed")?;

        appointment::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("appointment delete failed")?;

        txn.commit().await.context("commit failed")?;
        Ok(true)
    }

    async fn list_logs(&self, user_id: Uuid) -> anyhow::Result<Vec<LogEntry>> {
        let rows = care_log::Entity::find()
            .filter(care_log::Column::UserId.eq(user_id))
            .order_by_desc(care_log::Column::Date)
            .all(&self.conn)
            .await
            .context("list_logs failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_log(&self, id: Uuid) -> anyhow::Result<Option<LogEntry>> {
        let found = care_log::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_log failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_log(&self, l: LogEntry) -> anyhow::Result<()> {
        log_active_model(&l)
            .insert(&self.conn)
            .await
            .context("insert_log failed")?;
        Ok(())
    }

    async fn update_log(&self, l: LogEntry) -> anyhow::Result<()> {
        log_active_model(&l)
            .update(&self.conn)
            .await
            .context("update_log failed")?;
        Ok(())
    }

    async fn delete_log(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = care_log::Entity::delete_many()
            .filter(care_log::Column::Id.eq(id))
            .filter(care_log::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("delete_log failed")?;
        Ok(res.rows_affected > 0)
    }
}
