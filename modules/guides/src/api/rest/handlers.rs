use axum::{http::Uri, response::Json, Extension};
use std::sync::Arc;

use api_problem::ProblemResponse;

use crate::api::rest::dto::{GuideDto, GuideListDto, MatchGuidesReq};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// Return the guides matching the user's personalization answers.
#[utoipa::path(
    post,
    path = "/match-guides",
    tag = "guides",
    request_body = MatchGuidesReq,
    responses(
        (status = 200, description = "Matched guides", body = GuideListDto),
        (status = 404, description = "Unknown user"),
        (status = 500, description = "CMS failure")
    )
)]
pub async fn match_guides(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<MatchGuidesReq>,
) -> Result<Json<GuideListDto>, ProblemResponse> {
    match svc.match_guides(req.user_id).await {
        Ok(guides) => Ok(Json(GuideListDto {
            guides: guides.into_iter().map(GuideDto::from).collect(),
        })),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}
