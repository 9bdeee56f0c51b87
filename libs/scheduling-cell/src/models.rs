// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;
use thiserror::Error;

/// Length of a bookable slot.
pub const SLOT_LENGTH_MINUTES: i64 = 30;

/// Minimum separation required between two distinct bookings.
pub const SLOT_GAP_MINUTES: i64 = 10;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Scheduled start as a civil datetime. Date and time are combined here
    /// rather than on `NaiveTime` alone so arithmetic never wraps at midnight.
    pub fn scheduled_start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn scheduled_end(&self) -> NaiveDateTime {
        self.scheduled_start() + Duration::minutes(SLOT_LENGTH_MINUTES)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Active appointments count toward slot conflicts.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Statuses that block a slot for new bookings.
pub const ACTIVE_STATUSES: [AppointmentStatus; 2] =
    [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    /// Raw requested time-of-day; parsed as `HH:MM` or `HH:MM:SS`.
    pub time: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub notes: Option<String>,
    /// Caller identity, when the booking is made by a known patient.
    /// Anonymous bookings carry contact fields only.
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    /// Keep only appointments scheduled on or after this date.
    pub from_date: Option<NaiveDate>,
}

/// Row sent to storage when a booking is persisted. The storage layer owns
/// id and timestamp generation.
#[derive(Debug, Clone)]
pub struct NewAppointmentRecord {
    pub doctor_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor is not currently accepting appointments")]
    DoctorUnavailable,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Invalid appointment time: {0}")]
    InvalidTimeFormat(String),

    #[error("Requested time {time} is outside visiting hours ({start} - {end})")]
    OutsideVisitingHours {
        time: NaiveTime,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Appointment time {0} is not in the future")]
    AppointmentInPast(NaiveDateTime),

    #[error("Slot on {date} at {time} is already booked")]
    SlotTaken { date: NaiveDate, time: NaiveTime },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Cannot mark appointment scheduled at {0} as completed after the fact")]
    PastCompletionDenied(NaiveDateTime),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
