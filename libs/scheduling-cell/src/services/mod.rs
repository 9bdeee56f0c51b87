pub mod booking;
pub mod lifecycle;
pub mod slots;

pub use booking::AppointmentBookingService;
pub use lifecycle::AppointmentLifecycleService;
pub use slots::SlotService;
