use std::sync::Arc;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub database_url: String,
    pub database_api_key: String,
    pub port: u16,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            database_url: "http://localhost:54321".to_string(),
            database_api_key: "test-api-key".to_string(),
            port: 3000,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            database_api_key: self.database_api_key.clone(),
            port: self.port,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// A date comfortably in the future, for booking requests that must pass
/// the not-in-the-past check.
pub fn upcoming_date() -> NaiveDate {
    (Utc::now() + Duration::days(14)).date_naive()
}

pub struct MockRestResponses;

impl MockRestResponses {
    pub fn doctor_row(doctor_id: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "name": "Dr. Sarah Johnson",
            "specialization": "Cardiology",
            "email": "sarah.johnson@hospital.test",
            "phone_number": "+15550100",
            "description": "Senior cardiologist",
            "visiting_start_time": "09:00:00",
            "visiting_end_time": "17:00:00",
            "consultation_fee": 150.0,
            "is_available": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row_with_hours(doctor_id: &str, start: &str, end: &str) -> serde_json::Value {
        let mut row = Self::doctor_row(doctor_id);
        row["visiting_start_time"] = json!(start);
        row["visiting_end_time"] = json!(end);
        row
    }

    pub fn unavailable_doctor_row(doctor_id: &str) -> serde_json::Value {
        let mut row = Self::doctor_row(doctor_id);
        row["name"] = json!("Dr. Michael Chen");
        row["specialization"] = json!("Neurology");
        row["email"] = json!("michael.chen@hospital.test");
        row["is_available"] = json!(false);
        row
    }

    pub fn appointment_row(
        appointment_id: &str,
        doctor_id: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "doctor_id": doctor_id,
            "patient_id": null,
            "patient_name": "Test Patient",
            "patient_email": "patient@example.com",
            "patient_phone": "+15550199",
            "date": date,
            "time": time,
            "notes": null,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn empty_rows() -> serde_json::Value {
        json!([])
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
