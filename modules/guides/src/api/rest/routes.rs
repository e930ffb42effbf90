use axum::{routing::post, Extension, Router};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/match-guides", post(handlers::match_guides))
        .layer(Extension(service))
}
