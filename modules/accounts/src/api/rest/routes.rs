use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Build the accounts router. The service is injected per-router via
/// `Extension`, mirroring how the other modules wire their handlers.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/change-password", post(handlers::change_password))
        .route("/request-email-change", post(handlers::request_email_change))
        .route("/confirm-email-change", post(handlers::confirm_email_change))
        .route("/user/{id}/delete-account", delete(handlers::delete_account))
        .route("/upload-avatar", post(handlers::upload_avatar))
        .route(
            "/user/{id}",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/push-token", post(handlers::register_push_token))
        .route("/notifications/{userId}", get(handlers::list_notifications))
        .route(
            "/family-link/generate",
            post(handlers::generate_family_link),
        )
        .route("/family-link/{userId}", get(handlers::get_family_link))
        .route(
            "/family-link/{id}/status",
            put(handlers::set_family_link_status),
        )
        .layer(Extension(service))
}
