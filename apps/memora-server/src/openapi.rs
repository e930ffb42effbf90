use axum::response::Json;
use std::sync::OnceLock;
use utoipa::OpenApi;

/// Aggregated OpenAPI document for every module's REST surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Memora Server API",
        description = "Backend façade for the Memora companion app",
        version = "0.1.0"
    ),
    paths(
        accounts::api::rest::handlers::register,
        accounts::api::rest::handlers::login,
        accounts::api::rest::handlers::change_password,
        accounts::api::rest::handlers::request_email_change,
        accounts::api::rest::handlers::confirm_email_change,
        accounts::api::rest::handlers::delete_account,
        accounts::api::rest::handlers::upload_avatar,
        accounts::api::rest::handlers::get_profile,
        accounts::api::rest::handlers::update_profile,
        accounts::api::rest::handlers::register_push_token,
        accounts::api::rest::handlers::list_notifications,
        accounts::api::rest::handlers::generate_family_link,
        accounts::api::rest::handlers::get_family_link,
        accounts::api::rest::handlers::set_family_link_status,
        planner::api::rest::handlers::list_appointments,
        planner::api::rest::handlers::create_appointment,
        planner::api::rest::handlers::update_appointment,
        planner::api::rest::handlers::delete_appointment,
        planner::api::rest::handlers::list_logs,
        planner::api::rest::handlers::create_log,
        planner::api::rest::handlers::update_log,
        planner::api::rest::handlers::delete_log,
        guides::api::rest::handlers::match_guides,
        feedback::api::submit_feedback,
    ),
    components(schemas(
        api_problem::Problem,
        accounts::api::rest::dto::RegisterReq,
        accounts::api::rest::dto::RegisteredUserDto,
        accounts::api::rest::dto::LoginReq,
        accounts::api::rest::dto::UserDto,
        accounts::api::rest::dto::ChangePasswordReq,
        accounts::api::rest::dto::RequestEmailChangeReq,
        accounts::api::rest::dto::ConfirmEmailChangeReq,
        accounts::api::rest::dto::SuccessDto,
        accounts::api::rest::dto::EmailChangedDto,
        accounts::api::rest::dto::AvatarDto,
        accounts::api::rest::dto::UpdateProfileReq,
        accounts::api::rest::dto::PushTokenReq,
        accounts::api::rest::dto::NotificationDto,
        accounts::api::rest::dto::NotificationListDto,
        accounts::api::rest::dto::GenerateFamilyLinkReq,
        accounts::api::rest::dto::FamilyLinkDto,
        accounts::api::rest::dto::FamilyLinkStatusReq,
        planner::api::rest::dto::SuccessDto,
        planner::api::rest::dto::AppointmentDto,
        planner::api::rest::dto::CreateAppointmentReq,
        planner::api::rest::dto::UpdateAppointmentReq,
        planner::api::rest::dto::LogDto,
        planner::api::rest::dto::CreateLogReq,
        planner::api::rest::dto::UpdateLogReq,
        guides::api::rest::dto::MatchGuidesReq,
        guides::api::rest::dto::GuideDto,
        guides::api::rest::dto::GuideListDto,
        feedback::api::SubmitFeedbackReq,
    ))
)]
pub struct ApiDoc;

/// Serve the document as static JSON; built once, no per-request rebuilding.
pub async fn openapi_json() -> Json<serde_json::Value> {
    static DOC: OnceLock<serde_json::Value> = OnceLock::new();
    let doc = DOC.get_or_init(|| {
        serde_json::to_value(ApiDoc::openapi()).unwrap_or_else(|_| serde_json::json!({}))
    });
    Json(doc.clone())
}
