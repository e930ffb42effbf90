use axum::{http::StatusCode, http::Uri, response::Json, routing::post, Extension, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use api_problem::{Problem, ProblemResponse};

use crate::domain::{DomainError, Service};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackReq {
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessDto {
    pub success: bool,
}

fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let (status, code, title, detail) = match e {
        DomainError::InvalidRating { .. } => (
            StatusCode::BAD_REQUEST,
            "FEEDBACK_INVALID_RATING",
            "Invalid rating",
            format!("{}", e),
        ),
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FEEDBACK_INTERNAL",
                "Internal error",
                "An internal database error occurred".to_string(),
            )
        }
    };

    ProblemResponse(
        Problem::new(status, title, detail)
            .with_type(format!("https://errors.memora.app/{}", code))
            .with_code(code)
            .with_instance(instance),
    )
}

/// Record app feedback.
#[utoipa::path(
    post,
    path = "/submit-feedback",
    tag = "feedback",
    request_body = SubmitFeedbackReq,
    responses(
        (status = 200, description = "Feedback recorded", body = SuccessDto),
        (status = 400, description = "Rating out of range")
    )
)]
pub async fn submit_feedback(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<SubmitFeedbackReq>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc.submit(req.user_id, req.rating, req.comment).await {
        Ok(()) => Ok(Json(SuccessDto { success: true })),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/submit-feedback", post(submit_feedback))
        .layer(Extension(service))
}
