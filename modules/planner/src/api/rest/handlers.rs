use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use std::sync::Arc;
use uuid::Uuid;

use api_problem::ProblemResponse;

use crate::api::rest::dto::{
    AppointmentDto, CreateAppointmentReq, CreateLogReq, LogDto, SuccessDto, UpdateAppointmentReq,
    UpdateLogReq, UserScopeQuery,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// List a user's appointments ordered by date.
#[utoipa::path(
    get,
    path = "/appointments/{userId}",
    tag = "planner",
    params(("userId" = Uuid, Path, description = "Owner user UUID")),
    responses((status = 200, description = "Appointments", body = [AppointmentDto]))
)]
pub async fn list_appointments(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentDto>>, ProblemResponse> {
    match svc.list_appointments(user_id).await {
        Ok(rows) => Ok(Json(rows.into_iter().map(Into::into).collect())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Create an appointment.
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "planner",
    request_body = CreateAppointmentReq,
    responses(
        (status = 201, description = "Created appointment", body = AppointmentDto),
        (status = 400, description = "Missing title or invalid times")
    )
)]
pub async fn create_appointment(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<CreateAppointmentReq>,
) -> Result<(StatusCode, Json<AppointmentDto>), ProblemResponse> {
    match svc.create_appointment(req.into()).await {
        Ok(row) => Ok((StatusCode::CREATED, Json(row.into()))),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Update an appointment owned by the requesting user.
#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "planner",
    params(("id" = Uuid, Path, description = "Appointment UUID")),
    request_body = UpdateAppointmentReq,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentDto),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn update_appointment(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentReq>,
) -> Result<Json<AppointmentDto>, ProblemResponse> {
    let user_id = req.user_id;
    match svc.update_appointment(id, user_id, req.into()).await {
        Ok(row) => Ok(Json(row.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Delete an appointment; dependent logs are removed first.
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "planner",
    params(
        ("id" = Uuid, Path, description = "Appointment UUID"),
        ("userId" = Uuid, Query, description = "Owner user UUID")
    ),
    responses(
        (status = 200, description = "Deleted", body = SuccessDto),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn delete_appointment(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Query(scope): Query<UserScopeQuery>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc.delete_appointment(id, scope.user_id).await {
        Ok(()) => Ok(Json(SuccessDto::ok())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// List a user's logs, newest first.
#[utoipa::path(
    get,
    path = "/logs/{userId}",
    tag = "planner",
    params(("userId" = Uuid, Path, description = "Owner user UUID")),
    responses((status = 200, description = "Logs", body = [LogDto]))
)]
pub async fn list_logs(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<LogDto>>, ProblemResponse> {
    match svc.list_logs(user_id).await {
        Ok(rows) => Ok(Json(rows.into_iter().map(Into::into).collect())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Create a log, optionally attached to an owned appointment.
#[utoipa::path(
    post,
    path = "/logs",
    tag = "planner",
    request_body = CreateLogReq,
    responses(
        (status = 201, description = "Created log", body = LogDto),
        (status = 400, description = "Missing text"),
        (status = 403, description = "Appointment owned by another user"),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn create_log(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<CreateLogReq>,
) -> Result<(StatusCode, Json<LogDto>), ProblemResponse> {
    match svc.create_log(req.into()).await {
        Ok(row) => Ok((StatusCode::CREATED, Json(row.into()))),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Update a log owned by the requesting user.
#[utoipa::path(
    put,
    path = "/logs/{id}",
    tag = "planner",
    params(("id" = Uuid, Path, description = "Log UUID")),
    request_body = UpdateLogReq,
    responses(
        (status = 200, description = "Updated log", body = LogDto),
        (status = 403, description = "Log owned by another user"),
        (status = 404, description = "Unknown log")
    )
)]
pub async fn update_log(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLogReq>,
) -> Result<Json<LogDto>, ProblemResponse> {
    let user_id = req.user_id;
    match svc.update_log(id, user_id, req.into()).await {
        Ok(row) => Ok(Json(row.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Delete a log.
#[utoipa::path(
    delete,
    path = "/logs/{id}",
    tag = "planner",
    params(
        ("id" = Uuid, Path, description = "Log UUID"),
        ("userId" = Uuid, Query, description = "Owner user UUID")
    ),
    responses(
        (status = 200, description = "Deleted", body = SuccessDto),
        (status = 404, description = "Unknown log")
    )
)]
pub async fn delete_log(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Query(scope): Query<UserScopeQuery>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc.delete_log(id, scope.user_id).await {
        Ok(()) => Ok(Json(SuccessDto::ok())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}
