use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Appointment, LogEntry};

/// Port for the planner's persistence operations. Reads are scoped by
/// `user_id` so a row can never leak across accounts; the appointment delete
/// cascades over dependent logs inside one transaction.
#[async_trait]
pub trait PlannerRepository: Send + Sync {
    // --- appointments ---
    async fn list_appointments(&self, user_id: Uuid) -> anyhow::Result<Vec<Appointment>>;
    async fn find_appointment(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Appointment>>;
    /// Owner of an appointment regardless of caller, for 403-vs-404 mapping.
    async fn find_appointment_owner(&self, id: Uuid) -> anyhow::Result<Option<Uuid>>;
    async fn insert_appointment(&self, appointment: Appointment) -> anyhow::Result<()>;
    async fn update_appointment(&self, appointment: Appointment) -> anyhow::Result<()>;
    /// Delete dependent logs, then the appointment, in one transaction.
    /// Returns false when the appointment does not exist for this user.
    async fn delete_appointment_cascade(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    // --- logs ---
    async fn list_logs(&self, user_id: Uuid) -> anyhow::Result<Vec<LogEntry>>;
    async fn find_log(&self, id: Uuid) -> anyhow::Result<Option<LogEntry>>;
    async fn insert_log(&self, log: LogEntry) -> anyhow::Result<()>;
    async fn update_log(&self, log: LogEntry) -> anyhow::Result<()>;
    async fn delete_log(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
}
