use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use doctor_cell::models::Doctor;

use crate::models::{Appointment, AppointmentSearchQuery, AppointmentStatus, NewAppointmentRecord};

pub mod memory;
pub mod rest;

pub use memory::InMemorySchedulingStore;
pub use rest::RestSchedulingStore;

/// Narrow storage port for the scheduling engine. The engine owns every
/// booking and lifecycle rule; implementations own persistence and nothing
/// else, so the engine can be exercised against [`InMemorySchedulingStore`]
/// without a database.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>>;

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>>;

    /// Appointments matching every set filter, ordered by date then time.
    async fn search_appointments(&self, query: &AppointmentSearchQuery) -> Result<Vec<Appointment>>;

    /// Number of appointments for the doctor at exactly this date and time
    /// whose status is one of `statuses`.
    async fn count_conflicting(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        statuses: &[AppointmentStatus],
    ) -> Result<u64>;

    async fn insert_appointment(&self, record: &NewAppointmentRecord) -> Result<Appointment>;

    /// Persist a status change; returns `None` when the row no longer exists.
    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>>;
}
