use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Terms of service must be accepted")]
    TermsNotAccepted,

    #[error("An account with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Email '{email}' is already in use")]
    EmailInUse { email: String },

    #[error("Family code '{code}' does not resolve to an active family link")]
    InvalidFamilyCode { code: String },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Family link not found")]
    FamilyLinkNotFound,

    #[error("Invalid family link status: '{value}'")]
    InvalidStatus { value: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("A confirmation email was sent recently; retry in {retry_in_secs}s")]
    CooldownActive { retry_in_secs: i64 },

    #[error("No pending email change request")]
    NoPendingRequest,

    #[error("Confirmation code has expired")]
    CodeExpired,

    #[error("Confirmation code does not match")]
    CodeMismatch,

    #[error("Invalid or expired bearer token")]
    InvalidToken,

    #[error("Token subject does not match the requested account")]
    NotAccountOwner,

    #[error("Avatar too large: {size} bytes (max: {max})")]
    AvatarTooLarge { size: usize, max: usize },

    #[error("Unsupported media type: '{mime}'")]
    UnsupportedMediaType { mime: String },

    #[error("Identity service error: {message}")]
    Identity { message: String },

    #[error("{service} error: {message}")]
    Upstream { service: &'static str, message: String },

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

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn email_in_use(email: impl Into<String>) -> Self {
        Self::EmailInUse {
            email: email.into(),
        }
    }

    pub fn invalid_family_code(code: impl Into<String>) -> Self {
        Self::InvalidFamilyCode { code: code.into() }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn invalid_status(value: impl Into<String>) -> Self {
        Self::InvalidStatus {
            value: value.into(),
        }
    }

    pub fn cooldown_active(retry_in_secs: i64) -> Self {
        Self::CooldownActive { retry_in_secs }
    }

    pub fn avatar_too_large(size: usize, max: usize) -> Self {
        Self::AvatarTooLarge { size, max }
    }

    pub fn unsupported_media_type(mime: impl Into<String>) -> Self {
        Self::UnsupportedMediaType { mime: mime.into() }
    }

    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity {
            message: message.into(),
        }
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
