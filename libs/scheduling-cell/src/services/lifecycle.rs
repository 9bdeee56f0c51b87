// libs/scheduling-cell/src/services/lifecycle.rs
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::models::{AppointmentStatus, SchedulingError};

/// Enforces the appointment lifecycle: the fixed transition lattice plus the
/// completion timing guard. All decisions are pure; callers supply the clock.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed by the lattice.
    ///
    /// This check is independent of time. Timing rules (the past-completion
    /// guard) apply only after the lattice admits the transition, so a
    /// lattice violation is always reported as `InvalidTransition`.
    pub fn validate_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        let valid_transitions = self.valid_transitions(current_status);

        if !valid_transitions.contains(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(SchedulingError::InvalidTransition {
                from: *current_status,
                to: *new_status,
            });
        }

        Ok(())
    }

    /// Allowed next statuses for a given current status. `Completed` and
    /// `Cancelled` are terminal.
    pub fn valid_transitions(&self, current_status: &AppointmentStatus) -> &'static [AppointmentStatus] {
        match current_status {
            AppointmentStatus::Pending => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Confirmed => &[
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Completed => &[],
            AppointmentStatus::Cancelled => &[],
        }
    }

    /// Completion may not be asserted for an appointment whose scheduled
    /// time already elapsed. Completing early (before the scheduled time)
    /// and exactly at the scheduled time are both allowed, and cancellation
    /// carries no timing guard at all.
    pub fn check_completion_timing(
        &self,
        new_status: &AppointmentStatus,
        scheduled_start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), SchedulingError> {
        if *new_status == AppointmentStatus::Completed && scheduled_start < now {
            warn!("Rejected completion of past appointment scheduled at {}", scheduled_start);
            return Err(SchedulingError::PastCompletionDenied(scheduled_start));
        }

        Ok(())
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
