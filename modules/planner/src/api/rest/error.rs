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
        MissingField { .. } | Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "PLANNER_VALIDATION",
            "Validation error",
            format!("{}", e),
            instance,
        ),
        AppointmentNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PLANNER_APPOINTMENT_NOT_FOUND",
            "Appointment not found",
            format!("Appointment with id {} was not found", id),
            instance,
        ),
        LogNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PLANNER_LOG_NOT_FOUND",
            "Log not found",
            format!("Log with id {} was not found", id),
            instance,
        ),
        NotOwner => from_parts(
            StatusCode::FORBIDDEN,
            "PLANNER_FORBIDDEN",
            "Forbidden",
            "Row belongs to another user",
            instance,
        ),
        Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PLANNER_INTERNAL",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
