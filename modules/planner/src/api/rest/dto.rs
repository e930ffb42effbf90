use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    Appointment, AppointmentPatch, LogEntry, LogPatch, NewAppointment, NewLog,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
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

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            title: a.title,
            description: a.description,
            date: a.date,
            start_time: a.start_time,
            end_time: a.end_time,
            reminder: a.reminder,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub reminder: bool,
}

impl From<CreateAppointmentReq> for NewAppointment {
    fn from(req: CreateAppointmentReq) -> Self {
        Self {
            user_id: req.user_id,
            title: req.title,
            description: req.description,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            reminder: req.reminder,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentReq {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reminder: Option<bool>,
}

impl From<UpdateAppointmentReq> for AppointmentPatch {
    fn from(req: UpdateAppointmentReq) -> Self {
        Self {
            title: req.title,
            description: req.description.map(Some),
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            reminder: req.reminder,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub text: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LogEntry> for LogDto {
    fn from(l: LogEntry) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            appointment_id: l.appointment_id,
            text: l.text,
            date: l.date,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogReq {
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    #[serde(default)]
    pub text: String,
    pub date: DateTime<Utc>,
}

impl From<CreateLogReq> for NewLog {
    fn from(req: CreateLogReq) -> Self {
        Self {
            user_id: req.user_id,
            appointment_id: req.appointment_id,
            text: req.text,
            date: req.date,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogReq {
    pub user_id: Uuid,
    pub text: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl From<UpdateLogReq> for LogPatch {
    fn from(req: UpdateLogReq) -> Self {
        Self {
            text: req.text,
            date: req.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `?userId=` query scope used by the delete endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserScopeQuery {
    pub user_id: Uuid,
}
