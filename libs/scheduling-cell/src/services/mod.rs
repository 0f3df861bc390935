mod availability;
mod recurrence;
mod slots;

pub use availability::AvailabilityService;
pub use recurrence::RecurrenceService;
pub use slots::generate_slots_for_window;
