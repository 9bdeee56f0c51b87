use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;

use crate::models::{
    Doctor, DoctorError, DoctorSearchFilters,
    CreateDoctorRequest, UpdateDoctorRequest,
};

pub struct DoctorService {
    db: PostgrestClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    /// Add a doctor to the roster
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor roster entry for: {}", request.email);

        if request.name.trim().is_empty() {
            return Err(DoctorError::ValidationError("Doctor name must not be blank".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(DoctorError::ValidationError("Doctor email must not be blank".to_string()));
        }
        if request.visiting_start_time >= request.visiting_end_time {
            return Err(DoctorError::ValidationError(
                "Visiting start time must be before visiting end time".to_string(),
            ));
        }

        if self.find_doctor_by_email(&request.email).await?.is_some() {
            return Err(DoctorError::EmailExists(request.email));
        }

        let doctor_data = json!({
            "name": request.name,
            "specialization": request.specialization,
            "email": request.email,
            "phone_number": request.phone_number,
            "description": request.description,
            "visiting_start_time": request.visiting_start_time,
            "visiting_end_time": request.visiting_end_time,
            "consultation_fee": request.consultation_fee,
            "is_available": request.is_available.unwrap_or(true),
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.db.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(doctor_data),
            Some(headers),
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next()
            .ok_or_else(|| DoctorError::DatabaseError("Insert returned no doctor row".to_string()))?;

        let doctor: Doctor = serde_json::from_value(row)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;
        info!("Doctor {} added to roster with ID: {}", doctor.name, doctor.id);

        Ok(doctor)
    }

    /// Get doctor by ID
    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.db.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;

        serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Get doctor by email
    pub async fn get_doctor_by_email(&self, email: &str) -> Result<Doctor, DoctorError> {
        self.find_doctor_by_email(email).await?.ok_or(DoctorError::NotFound)
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, DoctorError> {
        let path = format!("/rest/v1/doctors?email=eq.{}", urlencoding::encode(email));
        let result: Vec<Value> = self.db.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let doctor = serde_json::from_value(row)
                    .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    /// List roster doctors, optionally filtered by specialization or
    /// availability flag
    pub async fn search_doctors(
        &self,
        filters: DoctorSearchFilters,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Searching doctors with filters: {:?}", filters);

        let mut query_parts: Vec<String> = Vec::new();

        if let Some(specialization) = filters.specialization {
            query_parts.push(format!("specialization=ilike.%{}%", urlencoding::encode(&specialization)));
        }
        if filters.available_only.unwrap_or(false) {
            query_parts.push("is_available=eq.true".to_string());
        }

        let mut path = if query_parts.is_empty() {
            "/rest/v1/doctors?order=name.asc".to_string()
        } else {
            format!("/rest/v1/doctors?{}&order=name.asc", query_parts.join("&"))
        };

        if let Some(limit_val) = limit {
            path.push_str(&format!("&limit={}", limit_val));
        }
        if let Some(offset_val) = offset {
            path.push_str(&format!("&offset={}", offset_val));
        }

        let result: Vec<Value> = self.db.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let doctors: Vec<Doctor> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(doctors)
    }

    /// Update roster entry with only the provided fields
    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor: {}", doctor_id);

        let current = self.get_doctor(doctor_id).await?;

        if let Some(ref email) = request.email {
            if email.trim().is_empty() {
                return Err(DoctorError::ValidationError("Doctor email must not be blank".to_string()));
            }
            if *email != current.email && self.find_doctor_by_email(email).await?.is_some() {
                return Err(DoctorError::EmailExists(email.clone()));
            }
        }

        let new_start = request.visiting_start_time.unwrap_or(current.visiting_start_time);
        let new_end = request.visiting_end_time.unwrap_or(current.visiting_end_time);
        if new_start >= new_end {
            return Err(DoctorError::ValidationError(
                "Visiting start time must be before visiting end time".to_string(),
            ));
        }

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(DoctorError::ValidationError("Doctor name must not be blank".to_string()));
            }
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone_number) = request.phone_number {
            update_data.insert("phone_number".to_string(), json!(phone_number));
        }
        if let Some(description) = request.description {
            update_data.insert("description".to_string(), json!(description));
        }
        if let Some(start) = request.visiting_start_time {
            update_data.insert("visiting_start_time".to_string(), json!(start));
        }
        if let Some(end) = request.visiting_end_time {
            update_data.insert("visiting_end_time".to_string(), json!(end));
        }
        if let Some(fee) = request.consultation_fee {
            update_data.insert("consultation_fee".to_string(), json!(fee));
        }
        if let Some(available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(available));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.db.request_with_headers(
            Method::PATCH,
            &path,
            Some(Value::Object(update_data)),
            Some(headers),
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(DoctorError::NotFound)?;

        serde_json::from_value(row).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Remove a doctor from the roster. Appointments are history rows and
    /// block deletion while any of them is still active.
    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", doctor_id);

        self.get_doctor(doctor_id).await?;

        let appointments_path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&status=in.(pending,confirmed)",
            doctor_id
        );
        let active_appointments: Vec<Value> = self.db.request(
            Method::GET,
            &appointments_path,
            None,
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if !active_appointments.is_empty() {
            return Err(DoctorError::ActiveAppointments);
        }

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let _: Vec<Value> = self.db.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(headers),
        ).await.map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor {} removed from roster", doctor_id);
        Ok(())
    }
}
