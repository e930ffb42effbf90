use api_problem::{Problem, ProblemResponse};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

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
        UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "GUIDES_USER_NOT_FOUND",
            "User not found",
            format!("User with id {} was not found", id),
            instance,
        ),
        Content { .. } | Profile { .. } => {
            tracing::error!(error = ?e, "Downstream failure");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "GUIDES_INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}
