use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveTime};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub visiting_start_time: NaiveTime,
    pub visiting_end_time: NaiveTime,
    pub consultation_fee: Option<f64>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    /// Whether a time-of-day falls inside the visiting window. Both
    /// endpoints are bookable.
    pub fn is_within_visiting_hours(&self, time: NaiveTime) -> bool {
        !(time < self.visiting_start_time || time > self.visiting_end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub visiting_start_time: NaiveTime,
    pub visiting_end_time: NaiveTime,
    pub consultation_fee: Option<f64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub visiting_start_time: Option<NaiveTime>,
    pub visiting_end_time: Option<NaiveTime>,
    pub consultation_fee: Option<f64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialization: Option<String>,
    pub available_only: Option<bool>,
}

// Error types specific to doctor roster operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DoctorError {
    NotFound,
    EmailExists(String),
    ActiveAppointments,
    ValidationError(String),
    DatabaseError(String),
}

impl std::fmt::Display for DoctorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorError::NotFound => write!(f, "Doctor not found"),
            DoctorError::EmailExists(email) => write!(f, "Doctor with email {} already exists", email),
            DoctorError::ActiveAppointments => write!(f, "Cannot delete doctor with active appointments"),
            DoctorError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            DoctorError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DoctorError {}
