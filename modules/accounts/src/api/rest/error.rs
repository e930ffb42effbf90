use api_problem::{Problem, ProblemResponse};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.memora.app/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_request_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    use DomainError::*;
    match e {
        MissingField { .. }
        | Validation { .. }
        | InvalidEmail { .. }
        | TermsNotAccepted => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_VALIDATION",
            "Validation error",
            format!("{}", e),
            instance,
        ),
        EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "ACCOUNTS_EMAIL_CONFLICT",
            "Email already exists",
            format!("An account with email '{}' already exists", email),
            instance,
        ),
        EmailInUse { email } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_EMAIL_IN_USE",
            "Email in use",
            format!("Email '{}' is already in use", email),
            instance,
        ),
        InvalidFamilyCode { code } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_INVALID_FAMILY_CODE",
            "Invalid family code",
            format!("Family code '{}' does not resolve", code),
            instance,
        ),
        UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "ACCOUNTS_NOT_FOUND",
            "User not found",
            format!("User with id {} was not found", id),
            instance,
        ),
        FamilyLinkNotFound => from_parts(
            StatusCode::NOT_FOUND,
            "ACCOUNTS_LINK_NOT_FOUND",
            "Family link not found",
            "No family link exists for this user",
            instance,
        ),
        InvalidStatus { value } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_INVALID_STATUS",
            "Invalid status",
            format!("'{}' is not a valid family link status", value),
            instance,
        ),
        InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "ACCOUNTS_INVALID_CREDENTIALS",
            "Unauthorized",
            // One message for unknown email and wrong password.
            "Invalid email or password",
            instance,
        ),
        CooldownActive { retry_in_secs } => from_parts(
            StatusCode::TOO_MANY_REQUESTS,
            "ACCOUNTS_EMAIL_CHANGE_COOLDOWN",
            "Too many requests",
            format!(
                "A confirmation email was sent recently; retry in {}s",
                retry_in_secs
            ),
            instance,
        ),
        NoPendingRequest => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_NO_PENDING_REQUEST",
            "No pending request",
            "No pending email change request exists",
            instance,
        ),
        CodeExpired => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_CODE_EXPIRED",
            "Code expired",
            "The confirmation code has expired; request a new one",
            instance,
        ),
        CodeMismatch => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_CODE_MISMATCH",
            "Invalid code",
            "The confirmation code does not match",
            instance,
        ),
        InvalidToken => from_parts(
            StatusCode::UNAUTHORIZED,
            "ACCOUNTS_INVALID_TOKEN",
            "Unauthorized",
            "Invalid or expired bearer token",
            instance,
        ),
        NotAccountOwner => from_parts(
            StatusCode::FORBIDDEN,
            "ACCOUNTS_FORBIDDEN",
            "Forbidden",
            "Token subject does not match the requested account",
            instance,
        ),
        AvatarTooLarge { size, max } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_AVATAR_TOO_LARGE",
            "Avatar too large",
            format!("Avatar is {} bytes (max: {})", size, max),
            instance,
        ),
        UnsupportedMediaType { mime } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_UNSUPPORTED_MEDIA_TYPE",
            "Unsupported media type",
            format!("'{}' is not an image content type", mime),
            instance,
        ),
        Identity { .. } | Upstream { .. } | Database { .. } => {
            // Log the internal details but keep the client message generic.
            tracing::error!(error = ?e, "Downstream failure");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ACCOUNTS_INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}
