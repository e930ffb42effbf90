use axum::{
    extract::{Multipart, Path},
    http::{HeaderMap, StatusCode, Uri},
    response::Json,
    Extension,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use api_problem::ProblemResponse;

use crate::api::rest::dto::{
    AvatarDto, ChangePasswordReq, ConfirmEmailChangeReq, EmailChangedDto, FamilyLinkDto,
    FamilyLinkStatusReq, GenerateFamilyLinkReq, LoginReq, NotificationDto, NotificationListDto,
    PushTokenReq, RegisterReq, RegisteredUserDto, RequestEmailChangeReq, SuccessDto, UpdateProfileReq,
    UserDto,
};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::domain::service::Service;

/// Register a new account and join or create a family.
#[utoipa::path(
    post,
    path = "/register",
    tag = "accounts",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created", body = RegisteredUserDto),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Downstream failure")
    )
)]
pub async fn register(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegisteredUserDto>), ProblemResponse> {
    match svc.register(req.into()).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(profile.into()))),
        Err(e) => {
            error!("Registration failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/login",
    tag = "accounts",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Authenticated", body = UserDto),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.login(&req.email, &req.password).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Rotate the account password.
#[utoipa::path(
    post,
    path = "/change-password",
    tag = "accounts",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password changed", body = SuccessDto),
        (status = 401, description = "Wrong current password"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn change_password(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<ChangePasswordReq>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc
        .change_password(req.user_id, &req.current_password, &req.new_password)
        .await
    {
        Ok(()) => Ok(Json(SuccessDto::ok())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Start an email change; sends a 6-digit confirmation code.
#[utoipa::path(
    post,
    path = "/request-email-change",
    tag = "accounts",
    request_body = RequestEmailChangeReq,
    responses(
        (status = 200, description = "Confirmation code sent", body = SuccessDto),
        (status = 400, description = "Email invalid or already in use"),
        (status = 429, description = "Resend cooldown active")
    )
)]
pub async fn request_email_change(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<RequestEmailChangeReq>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc.request_email_change(req.user_id, &req.new_email).await {
        Ok(()) => Ok(Json(SuccessDto::ok())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Finish an email change by confirming the code.
#[utoipa::path(
    post,
    path = "/confirm-email-change",
    tag = "accounts",
    request_body = ConfirmEmailChangeReq,
    responses(
        (status = 200, description = "Email changed", body = EmailChangedDto),
        (status = 400, description = "No request, expired, or wrong code")
    )
)]
pub async fn confirm_email_change(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<ConfirmEmailChangeReq>,
) -> Result<Json<EmailChangedDto>, ProblemResponse> {
    match svc.confirm_email_change(req.user_id, &req.code).await {
        Ok(email) => Ok(Json(EmailChangedDto {
            success: true,
            email,
        })),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Delete the account and every row it owns. The bearer token subject must
/// match the path id.
#[utoipa::path(
    delete,
    path = "/user/{id}/delete-account",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Account deleted", body = SuccessDto),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token subject mismatch")
    )
)]
pub async fn delete_account(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    let token = match bearer_token(&headers) {
        Some(token) => token,
        None => {
            return Err(from_parts(
                StatusCode::UNAUTHORIZED,
                "ACCOUNTS_INVALID_TOKEN",
                "Unauthorized",
                "Missing bearer token",
                uri.path(),
            ))
        }
    };

    match svc.delete_account(id, token).await {
        Ok(()) => {
            info!(user_id = %id, "Account deletion completed");
            Ok(Json(SuccessDto::ok()))
        }
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Upload a profile image (multipart: `userId` text field + `image` file).
#[utoipa::path(
    post,
    path = "/upload-avatar",
    tag = "accounts",
    responses(
        (status = 200, description = "Avatar stored", body = AvatarDto),
        (status = 400, description = "Missing file or userId, too large, or not an image")
    )
)]
pub async fn upload_avatar(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    mut multipart: Multipart,
) -> Result<Json<AvatarDto>, ProblemResponse> {
    let mut user_id: Option<Uuid> = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(from_parts(
                    StatusCode::BAD_REQUEST,
                    "ACCOUNTS_BAD_MULTIPART",
                    "Bad request",
                    format!("Malformed multipart body: {}", e),
                    uri.path(),
                ))
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("userId") => {
                let text = field.text().await.unwrap_or_default();
                user_id = Uuid::parse_str(text.trim()).ok();
            }
            Some("image") | Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(e) => {
                        return Err(from_parts(
                            StatusCode::BAD_REQUEST,
                            "ACCOUNTS_BAD_MULTIPART",
                            "Bad request",
                            format!("Failed to read image field: {}", e),
                            uri.path(),
                        ))
                    }
                };
                image = Some((content_type, bytes));
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| {
        from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_MISSING_USER_ID",
            "Bad request",
            "Missing or invalid userId field",
            uri.path(),
        )
    })?;
    let (content_type, bytes) = image.ok_or_else(|| {
        from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_MISSING_IMAGE",
            "Bad request",
            "Missing image file field",
            uri.path(),
        )
    })?;

    match svc.upload_avatar(user_id, &content_type, bytes).await {
        Ok(upload) => Ok(Json(upload.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Fetch a user profile.
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Profile", body = UserDto),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_profile(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.profile(id).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Partially update profile fields.
#[utoipa::path(
    put,
    path = "/user/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn update_profile(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.update_profile(id, req.into()).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Register a device push token.
#[utoipa::path(
    post,
    path = "/push-token",
    tag = "accounts",
    request_body = PushTokenReq,
    responses(
        (status = 200, description = "Token stored", body = SuccessDto),
        (status = 400, description = "Missing token or bad platform"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn register_push_token(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<PushTokenReq>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    match svc
        .register_push_token(req.user_id, &req.token, &req.platform)
        .await
    {
        Ok(()) => Ok(Json(SuccessDto::ok())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// List a user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/notifications/{userId}",
    tag = "accounts",
    params(("userId" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Notifications", body = NotificationListDto)
    )
)]
pub async fn list_notifications(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<NotificationListDto>, ProblemResponse> {
    match svc.notifications(user_id).await {
        Ok(items) => Ok(Json(NotificationListDto {
            notifications: items.into_iter().map(NotificationDto::from).collect(),
        })),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Return the user's active family link, minting one lazily.
#[utoipa::path(
    post,
    path = "/family-link/generate",
    tag = "family-links",
    request_body = GenerateFamilyLinkReq,
    responses(
        (status = 200, description = "Family link", body = FamilyLinkDto),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn generate_family_link(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<GenerateFamilyLinkReq>,
) -> Result<Json<FamilyLinkDto>, ProblemResponse> {
    match svc.generate_family_link(req.user_id).await {
        Ok(link) => Ok(Json(link.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Fetch the family link created by a user.
#[utoipa::path(
    get,
    path = "/family-link/{userId}",
    tag = "family-links",
    params(("userId" = Uuid, Path, description = "Creator user UUID")),
    responses(
        (status = 200, description = "Family link", body = FamilyLinkDto),
        (status = 404, description = "No link for this user")
    )
)]
pub async fn get_family_link(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FamilyLinkDto>, ProblemResponse> {
    match svc.family_link_for_user(user_id).await {
        Ok(link) => Ok(Json(link.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Toggle a family link between active and inactive.
#[utoipa::path(
    put,
    path = "/family-link/{id}/status",
    tag = "family-links",
    params(("id" = Uuid, Path, description = "Family link UUID")),
    request_body = FamilyLinkStatusReq,
    responses(
        (status = 200, description = "Updated link", body = FamilyLinkDto),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Unknown link")
    )
)]
pub async fn set_family_link_status(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Json(req): Json<FamilyLinkStatusReq>,
) -> Result<Json<FamilyLinkDto>, ProblemResponse> {
    match svc.set_family_link_status(id, &req.status).await {
        Ok(link) => Ok(Json(link.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
