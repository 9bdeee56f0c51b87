// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use shared_config::AppConfig;

use crate::models::{
    Appointment, AppointmentSearchQuery, AppointmentStats, AppointmentStatus,
    BookAppointmentRequest, NewAppointmentRecord, SchedulingError, ACTIVE_STATUSES,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::store::{RestSchedulingStore, SchedulingStore};

/// Books appointments and drives them through their lifecycle. All booking
/// rules run here against the storage port; the store itself only persists.
pub struct AppointmentBookingService {
    store: Arc<dyn SchedulingStore>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_store(Arc::new(RestSchedulingStore::new(config)))
    }

    pub fn with_store(store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Book a new appointment. Every booking starts out pending.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!("Booking appointment with doctor {} on {}", request.doctor_id, request.date);

        // Patient contact details are mandatory
        if request.patient_name.trim().is_empty()
            || request.patient_email.trim().is_empty()
            || request.patient_phone.trim().is_empty()
        {
            return Err(SchedulingError::ValidationError(
                "Patient name, email and phone number are required".to_string(),
            ));
        }

        let doctor = self.get_doctor(request.doctor_id).await?;

        if !doctor.is_available {
            warn!("Doctor {} is not accepting appointments", doctor.id);
            return Err(SchedulingError::DoctorUnavailable);
        }

        let now = Utc::now().naive_utc();
        let time = self.validate_booking_time(&doctor, request.date, &request.time, now)?;

        // The requested slot must be free of active appointments
        let conflicts = self
            .store
            .count_conflicting(request.doctor_id, request.date, time, &ACTIVE_STATUSES)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        if conflicts > 0 {
            warn!(
                "Booking conflict for doctor {} on {} at {}",
                request.doctor_id, request.date, time
            );
            return Err(SchedulingError::SlotTaken {
                date: request.date,
                time,
            });
        }

        let record = NewAppointmentRecord {
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            patient_name: request.patient_name,
            patient_email: request.patient_email,
            patient_phone: request.patient_phone,
            date: request.date,
            time,
            notes: request.notes,
            status: AppointmentStatus::Pending,
        };

        let appointment = self
            .store
            .insert_appointment(&record)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        info!(
            "Appointment {} booked with doctor {} on {} at {}",
            appointment.id, appointment.doctor_id, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Move an appointment to a new status through the transition lattice.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment {} status to {}", appointment_id, new_status);

        let current = self.get_appointment(appointment_id).await?;

        // The lattice is checked first, so completing a pending appointment
        // reports an invalid transition even when it is also in the past.
        self.lifecycle.validate_transition(&current.status, &new_status)?;

        let now = Utc::now().naive_utc();
        self.lifecycle
            .check_completion_timing(&new_status, current.scheduled_start(), now)?;

        let updated = self
            .store
            .update_status(appointment_id, new_status)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::AppointmentNotFound)?;

        info!(
            "Appointment {} moved from {} to {}",
            appointment_id, current.status, updated.status
        );
        Ok(updated)
    }

    /// Cancel an appointment. Cancellation is a plain lattice transition and
    /// is allowed for past appointments.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Cancelling appointment: {}", appointment_id);

        self.update_status(appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    /// Get appointment by ID.
    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Fetching appointment: {}", appointment_id);

        self.store
            .get_appointment(appointment_id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    /// Search appointments with optional filters, ordered by date then time.
    pub async fn search_appointments(
        &self,
        query: AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        debug!("Searching appointments: {:?}", query);

        self.store
            .search_appointments(&query)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    /// Count appointments per status, across the whole book or scoped to one
    /// doctor.
    pub async fn get_appointment_stats(
        &self,
        doctor_id: Option<Uuid>,
    ) -> Result<AppointmentStats, SchedulingError> {
        debug!("Calculating appointment statistics");

        let query = AppointmentSearchQuery {
            doctor_id,
            ..Default::default()
        };
        let appointments = self.search_appointments(query).await?;

        let total = appointments.len();
        let pending = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Pending)
            .count();
        let confirmed = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Confirmed)
            .count();
        let completed = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .count();
        let cancelled = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Cancelled)
            .count();

        Ok(AppointmentStats {
            total,
            pending,
            confirmed,
            completed,
            cancelled,
        })
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, SchedulingError> {
        self.store
            .get_doctor(doctor_id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::DoctorNotFound)
    }

    /// Parse the requested time and check it against the doctor's visiting
    /// window and the clock. Both window endpoints are bookable; the
    /// scheduled moment must lie strictly in the future.
    fn validate_booking_time(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        raw_time: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveTime, SchedulingError> {
        let time = parse_appointment_time(raw_time)?;

        if !doctor.is_within_visiting_hours(time) {
            return Err(SchedulingError::OutsideVisitingHours {
                time,
                start: doctor.visiting_start_time,
                end: doctor.visiting_end_time,
            });
        }

        let scheduled = date.and_time(time);
        if scheduled <= now {
            return Err(SchedulingError::AppointmentInPast(scheduled));
        }

        Ok(time)
    }
}

/// Accepts `HH:MM:SS` and falls back to `HH:MM`.
fn parse_appointment_time(raw: &str) -> Result<NaiveTime, SchedulingError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| SchedulingError::InvalidTimeFormat(raw.to_string()))
}
