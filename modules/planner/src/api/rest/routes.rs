use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn router(service: Arc<Service>) -> Router {
    // GET /appointments/{userId} and PUT/DELETE /appointments/{id} share one
    // path shape, so they register as a single route; the handlers interpret
    // the segment.
    Router::new()
        .route("/appointments", post(handlers::create_appointment))
        .route(
            "/appointments/{id}",
            get(handlers::list_appointments)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/logs", post(handlers::create_log))
        .route(
            "/logs/{id}",
            get(handlers::list_logs)
                .put(handlers::update_log)
                .delete(handlers::delete_log),
        )
        .layer(Extension(service))
}
