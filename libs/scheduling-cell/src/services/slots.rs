// libs/scheduling-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::models::Doctor;
use shared_config::AppConfig;

use crate::models::{
    Appointment, AppointmentSearchQuery, SchedulingError, SLOT_GAP_MINUTES, SLOT_LENGTH_MINUTES,
};
use crate::store::{RestSchedulingStore, SchedulingStore};

/// Computes bookable slots for a doctor's day. Slots are derived eagerly on
/// every request from the visiting window and the day's active appointments.
pub struct SlotService {
    store: Arc<dyn SchedulingStore>,
}

impl SlotService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(RestSchedulingStore::new(config)),
        }
    }

    pub fn with_store(store: Arc<dyn SchedulingStore>) -> Self {
        Self { store }
    }

    /// List available slot start times for a doctor on a date.
    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        debug!("Calculating available slots for doctor {} on {}", doctor_id, date);

        let doctor = self
            .store
            .get_doctor(doctor_id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::DoctorNotFound)?;

        let query = AppointmentSearchQuery {
            doctor_id: Some(doctor_id),
            date: Some(date),
            ..Default::default()
        };
        let appointments = self
            .store
            .search_appointments(&query)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        let slots = self.compute_slots_for_day(&doctor, date, &appointments);
        debug!("Found {} available slots", slots.len());

        Ok(slots)
    }

    /// Walk candidate start times through the visiting window and keep those
    /// clear of every active appointment.
    ///
    /// Candidates advance by slot length plus gap from the start of the
    /// window; a candidate is valid while it starts strictly before the end
    /// of the window. A candidate survives an appointment when the slot ends,
    /// gap included, strictly before the appointment starts, or starts
    /// strictly after the appointment ends plus the gap. Comparisons are done
    /// on full date-times so the window math never wraps across midnight.
    fn compute_slots_for_day(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        appointments: &[Appointment],
    ) -> Vec<NaiveTime> {
        let slot_length = Duration::minutes(SLOT_LENGTH_MINUTES);
        let gap = Duration::minutes(SLOT_GAP_MINUTES);

        let busy: Vec<_> = appointments
            .iter()
            .filter(|appointment| appointment.status.is_active() && appointment.date == date)
            .map(|appointment| (appointment.scheduled_start(), appointment.scheduled_end()))
            .collect();

        let window_end = date.and_time(doctor.visiting_end_time);

        let mut slots = Vec::new();
        let mut current = date.and_time(doctor.visiting_start_time);

        while current < window_end {
            let slot_end = current + slot_length;

            let has_conflict = busy.iter().any(|(appointment_start, appointment_end)| {
                let clears_before = slot_end + gap < *appointment_start;
                let clears_after = current > *appointment_end + gap;
                !(clears_before || clears_after)
            });

            if !has_conflict {
                slots.push(current.time());
            }

            current += slot_length + gap;
        }

        slots
    }
}
