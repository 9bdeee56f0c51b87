// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AppointmentSearchQuery, AppointmentStatus, BookAppointmentRequest, SchedulingError,
    UpdateStatusRequest,
};
use crate::services::{AppointmentBookingService, SlotService};

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<NaiveDate>,
    pub upcoming: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub doctor_id: Option<Uuid>,
}

fn scheduling_error_response(e: SchedulingError) -> AppError {
    let message = e.to_string();
    match e {
        SchedulingError::DoctorNotFound | SchedulingError::AppointmentNotFound => {
            AppError::NotFound(message)
        }
        SchedulingError::InvalidTimeFormat(_) => AppError::BadRequest(message),
        SchedulingError::ValidationError(msg) => AppError::ValidationError(msg),
        SchedulingError::SlotTaken { .. } | SchedulingError::InvalidTransition { .. } => {
            AppError::Conflict(message)
        }
        SchedulingError::DoctorUnavailable
        | SchedulingError::OutsideVisitingHours { .. }
        | SchedulingError::AppointmentInPast(_)
        | SchedulingError::PastCompletionDenied(_) => AppError::Unprocessable(message),
        SchedulingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.book_appointment(request).await
        .map_err(scheduling_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.get_appointment(appointment_id).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    // `upcoming` is shorthand for from_date = today
    let from_date = match (query.from_date, query.upcoming) {
        (Some(date), _) => Some(date),
        (None, Some(true)) => Some(Utc::now().date_naive()),
        _ => None,
    };

    let search = AppointmentSearchQuery {
        doctor_id: query.doctor_id,
        patient_id: query.patient_id,
        date: query.date,
        status: query.status,
        from_date,
    };

    let appointments = booking_service.search_appointments(search).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.update_status(appointment_id, request.status).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment status updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.cancel_appointment(appointment_id).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment_stats(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let stats = booking_service.get_appointment_stats(query.doctor_id).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!(stats)))
}

// ==============================================================================
// SLOT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let slot_service = SlotService::new(&state);

    let slots = slot_service.get_available_slots(doctor_id, query.date).await
        .map_err(scheduling_error_response)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "slots": slots,
        "total": slots.len()
    })))
}
