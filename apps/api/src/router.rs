use std::sync::Arc;

use axum::{
    Json,
    Router,
    routing::get,
};
use serde_json::{json, Value};

use doctor_cell::router::doctor_routes;
use scheduling_cell::router::{appointment_routes, slot_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital API is running!" }))
        .route("/health", get(health))
        .nest("/appointments", appointment_routes(state.clone()))
        // Slot listing hangs off the doctor prefix
        .nest("/doctors", doctor_routes(state.clone()).merge(slot_routes(state)))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "hospital-api"
    }))
}
