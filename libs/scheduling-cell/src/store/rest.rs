use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::models::Doctor;
use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;

use crate::models::{Appointment, AppointmentSearchQuery, AppointmentStatus, NewAppointmentRecord};
use crate::store::SchedulingStore;

/// Production store speaking to the hospital database over its PostgREST
/// interface.
pub struct RestSchedulingStore {
    db: PostgrestClient,
}

impl RestSchedulingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
        headers
    }
}

#[async_trait]
impl SchedulingStore for RestSchedulingStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    async fn search_appointments(&self, query: &AppointmentSearchQuery) -> Result<Vec<Appointment>> {
        let mut query_parts: Vec<String> = Vec::new();

        if let Some(doctor_id) = query.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = query.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(date) = query.date {
            query_parts.push(format!("date=eq.{}", date));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(from_date) = query.from_date {
            query_parts.push(format!("date=gte.{}", from_date));
        }

        let path = if query_parts.is_empty() {
            "/rest/v1/appointments?order=date.asc,time.asc".to_string()
        } else {
            format!("/rest/v1/appointments?{}&order=date.asc,time.asc", query_parts.join("&"))
        };

        debug!("Searching appointments: {}", path);
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;

        let appointments = rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()?;

        Ok(appointments)
    }

    async fn count_conflicting(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        statuses: &[AppointmentStatus],
    ) -> Result<u64> {
        let status_list = statuses.iter()
            .map(|status| status.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&time=eq.{}&status=in.({})",
            doctor_id, date, time, status_list
        );

        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        Ok(rows.len() as u64)
    }

    async fn insert_appointment(&self, record: &NewAppointmentRecord) -> Result<Appointment> {
        let appointment_data = json!({
            "doctor_id": record.doctor_id,
            "patient_id": record.patient_id,
            "patient_name": record.patient_name,
            "patient_email": record.patient_email,
            "patient_phone": record.patient_phone,
            "date": record.date,
            "time": record.time,
            "notes": record.notes,
            "status": record.status,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let rows: Vec<Value> = self.db.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(appointment_data),
            Some(Self::representation_headers()),
        ).await?;

        let row = rows.into_iter().next()
            .ok_or_else(|| anyhow!("Insert returned no appointment row"))?;

        Ok(serde_json::from_value(row)?)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let update_data = json!({
            "status": status,
            "updated_at": Utc::now().to_rfc3339()
        });

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Value> = self.db.request_with_headers(
            Method::PATCH,
            &path,
            Some(update_data),
            Some(Self::representation_headers()),
        ).await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}
