use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, patch, delete},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/", get(handlers::list_doctors))
        .route("/by-email/{email}", get(handlers::get_doctor_by_email))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}", patch(handlers::update_doctor))
        .route("/{doctor_id}", delete(handlers::delete_doctor))
        .with_state(state)
}
