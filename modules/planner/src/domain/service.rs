use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    Appointment, AppointmentPatch, LogEntry, LogPatch, NewAppointment, NewLog,
};
use crate::domain::error::DomainError;
use crate::domain::repo::PlannerRepository;

/// Domain service for appointments and care logs.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn PlannerRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn PlannerRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "planner.service.list_appointments", skip(self), fields(user_id = %user_id))]
    pub async fn list_appointments(&self, user_id: Uuid) -> Result<Vec<Appointment>, DomainError> {
        self.repo
            .list_appointments(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "planner.service.create_appointment", skip_all, fields(user_id = %new.user_id))]
    pub async fn create_appointment(
        &self,
        new: NewAppointment,
    ) -> Result<Appointment, DomainError> {
        if new.title.trim().is_empty() {
            return Err(DomainError::missing_field("title"));
        }
        if new.end_time < new.start_time {
            return Err(DomainError::validation(
                "endTime",
                "must not be before startTime",
            ));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            reminder: new.reminder,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert_appointment(appointment.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(appointment_id = %appointment.id, "Appointment created");
        Ok(appointment)
    }

    #[instrument(name = "planner.service.update_appointment", skip_all, fields(appointment_id = %id))]
    pub async fn update_appointment(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, DomainError> {
        let mut current = self
            .repo
            .find_appointment(id, user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::appointment_not_found(id))?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(DomainError::missing_field("title"));
            }
            current.title = title;
        }
        if let Some(description) = patch.description {
            current.description = description;
        }
        if let Some(date) = patch.date {
            current.date = date;
        }
        if let Some(start_time) = patch.start_time {
            current.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            current.end_time = end_time;
        }
        if let Some(reminder) = patch.reminder {
            current.reminder = reminder;
        }
        if current.end_time < current.start_time {
            return Err(DomainError::validation(
                "endTime",
                "must not be before startTime",
            ));
        }
        current.updated_at = Utc::now();

        self.repo
            .update_appointment(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(current)
    }

    #[instrument(name = "planner.service.delete_appointment", skip(self), fields(appointment_id = %id))]
    pub async fn delete_appointment(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_appointment_cascade(id, user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::appointment_not_found(id));
        }

        info!("Appointment and dependent logs deleted");
        Ok(())
    }

    #[instrument(name = "planner.service.list_logs", skip(self), fields(user_id = %user_id))]
    pub async fn list_logs(&self, user_id: Uuid) -> Result<Vec<LogEntry>, DomainError> {
        self.repo
            .list_logs(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "planner.service.create_log", skip_all, fields(user_id = %new.user_id))]
    pub async fn create_log(&self, new: NewLog) -> Result<LogEntry, DomainError> {
        if new.text.trim().is_empty() {
            return Err(DomainError::missing_field("text"));
        }

        // A log may reference an appointment, but only one the author owns.
        if let Some(appointment_id) = new.appointment_id {
            match self
                .repo
                .find_appointment_owner(appointment_id)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
            {
                None => return Err(DomainError::appointment_not_found(appointment_id)),
                Some(owner) if owner != new.user_id => return Err(DomainError::NotOwner),
                Some(_) => {}
            }
        }

        let now = Utc::now();
        let log = LogEntry {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            appointment_id: new.appointment_id,
            text: new.text,
            date: new.date,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert_log(log.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!(log_id = %log.id, "Log created");
        Ok(log)
    }

    #[instrument(name = "planner.service.update_log", skip_all, fields(log_id = %id))]
    pub async fn update_log(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: LogPatch,
    ) -> Result<LogEntry, DomainError> {
        let mut current = self
            .repo
            .find_log(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::log_not_found(id))?;

        if current.user_id != user_id {
            return Err(DomainError::NotOwner);
        }

        if let Some(text) = patch.text {
            if text.trim().is_empty() {
                return Err(DomainError::missing_field("text"));
            }
            current.text = text;
        }
        if let Some(date) = patch.date {
            current.date = date;
        }
        current.updated_at = Utc::now();

        self.repo
            .update_log(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(current)
    }

    #[instrument(name = "planner.service.delete_log", skip(self), fields(log_id = %id))]
    pub async fn delete_log(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_log(id, user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::log_not_found(id));
        }
        Ok(())
    }
}
