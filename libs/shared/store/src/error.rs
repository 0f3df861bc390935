use thiserror::Error;

/// Failures surfaced by the storage layer. Cells map these onto their own
/// error taxonomies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unique constraint violated: {0}")]
    Duplicate(&'static str),

    #[error("slot is already booked")]
    SlotTaken,

    #[error("slot is booked and cannot be deleted")]
    SlotBooked,
}
