mod earnings;
mod fees;
mod payments;
mod reconcile;

pub use earnings::EarningsService;
pub use fees::{resolve_split, FeeService};
pub use payments::PaymentService;
pub use reconcile::Reconciler;
