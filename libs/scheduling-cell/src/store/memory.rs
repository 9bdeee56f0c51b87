use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use doctor_cell::models::Doctor;

use crate::models::{Appointment, AppointmentSearchQuery, AppointmentStatus, NewAppointmentRecord};
use crate::store::SchedulingStore;

/// Mutex-held maps standing in for the database. Public so engine callers
/// can run the full rule set in tests without any HTTP backend.
#[derive(Default)]
pub struct InMemorySchedulingStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    doctors: HashMap<Uuid, Doctor>,
    appointments: HashMap<Uuid, Appointment>,
}

impl InMemorySchedulingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_doctor(&self, doctor: Doctor) {
        let mut inner = self.inner.lock().expect("scheduling store lock poisoned");
        inner.doctors.insert(doctor.id, doctor);
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        let mut inner = self.inner.lock().expect("scheduling store lock poisoned");
        inner.appointments.insert(appointment.id, appointment);
    }
}

#[async_trait]
impl SchedulingStore for InMemorySchedulingStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>> {
        let inner = self.inner.lock().expect("scheduling store lock poisoned");
        Ok(inner.doctors.get(&doctor_id).cloned())
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>> {
        let inner = self.inner.lock().expect("scheduling store lock poisoned");
        Ok(inner.appointments.get(&appointment_id).cloned())
    }

    async fn search_appointments(&self, query: &AppointmentSearchQuery) -> Result<Vec<Appointment>> {
        let inner = self.inner.lock().expect("scheduling store lock poisoned");

        let mut matches: Vec<Appointment> = inner.appointments.values()
            .filter(|appointment| {
                query.doctor_id.map_or(true, |doctor_id| appointment.doctor_id == doctor_id)
                    && query.patient_id.map_or(true, |patient_id| appointment.patient_id == Some(patient_id))
                    && query.date.map_or(true, |date| appointment.date == date)
                    && query.status.map_or(true, |status| appointment.status == status)
                    && query.from_date.map_or(true, |from_date| appointment.date >= from_date)
            })
            .cloned()
            .collect();

        matches.sort_by_key(|appointment| (appointment.date, appointment.time));
        Ok(matches)
    }

    async fn count_conflicting(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        statuses: &[AppointmentStatus],
    ) -> Result<u64> {
        let inner = self.inner.lock().expect("scheduling store lock poisoned");

        let count = inner.appointments.values()
            .filter(|appointment| {
                appointment.doctor_id == doctor_id
                    && appointment.date == date
                    && appointment.time == time
                    && statuses.contains(&appointment.status)
            })
            .count();

        Ok(count as u64)
    }

    async fn insert_appointment(&self, record: &NewAppointmentRecord) -> Result<Appointment> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: record.doctor_id,
            patient_id: record.patient_id,
            patient_name: record.patient_name.clone(),
            patient_email: record.patient_email.clone(),
            patient_phone: record.patient_phone.clone(),
            date: record.date,
            time: record.time,
            notes: record.notes.clone(),
            status: record.status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut inner = self.inner.lock().expect("scheduling store lock poisoned");
        inner.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let mut inner = self.inner.lock().expect("scheduling store lock poisoned");

        match inner.appointments.get_mut(&appointment_id) {
            Some(appointment) => {
                appointment.status = status;
                appointment.updated_at = Utc::now();
                Ok(Some(appointment.clone()))
            }
            None => Ok(None),
        }
    }
}
