// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/stats", get(handlers::get_appointment_stats))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .with_state(state)
}

/// Mounted under the doctor prefix so slots read as a doctor sub-resource.
pub fn slot_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{doctor_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
