use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Appointment not found: {id}")]
    AppointmentNotFound { id: Uuid },

    #[error("Log not found: {id}")]
    LogNotFound { id: Uuid },

    #[error("Row belongs to another user")]
    NotOwner,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn appointment_not_found(id: Uuid) -> Self {
        Self::AppointmentNotFound { id }
    }

    pub fn log_not_found(id: Uuid) -> Self {
        Self::LogNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
