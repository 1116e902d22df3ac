//! Client-side store for an in-progress camp reservation.
//!
//! This crate provides:
//! - Line item types (`ReservationItem`, `ItemType`, `ItemMetadata`)
//! - The selected camp snapshot (`Camp`)
//! - `ReservationState` with its derived total and tolerant snapshot hydration
//! - `ReservationStore`, the mutable store shared by all booking steps, with
//!   change notification and session persistence

pub mod camp;
pub mod error;
pub mod events;
pub mod item;
pub mod state;
pub mod store;

pub use camp::{Camp, CampProperties};
pub use common::{CampId, Money};
pub use error::SnapshotError;
pub use events::ReservationEvent;
pub use item::{BASE_ITEM_ID, ItemMetadata, ItemPatch, ItemType, NewItem, ReservationItem};
pub use state::{PartialReservationState, ReservationState};
pub use store::{Observer, ReservationStore, SubscriptionId};
