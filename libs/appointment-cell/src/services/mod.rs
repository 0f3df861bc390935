mod booking;
mod followup;
mod leave;
mod walkin;

pub use booking::BookingService;
pub use followup::FollowUpService;
pub use leave::LeaveService;
pub use walkin::WalkInService;

pub(crate) use booking::token_suffix;
