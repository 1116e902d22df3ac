//! Snapshot validation errors.

use thiserror::Error;

/// Reasons a persisted snapshot can't be turned into a reservation state.
///
/// These never escape the store: a rejected snapshot is treated the same as
/// a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Neither `basePrice` nor a `base` item was present.
    #[error("snapshot has no base price")]
    MissingBasePrice,

    /// The item prices don't add up to a representable total.
    #[error("snapshot total is out of range")]
    AmountOutOfRange,
}
