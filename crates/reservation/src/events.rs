//! Reservation change events.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::camp::Camp;
use crate::item::{ItemType, ReservationItem};

/// What changed in the store. Delivered to observers together with the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReservationEvent {
    /// The store finished its first load. `restored` is false when it fell back to defaults.
    Hydrated { restored: bool },

    /// A new item was appended.
    ItemAdded { item: ReservationItem },

    /// A single-slot item was overwritten in place.
    ItemReplaced {
        previous: ReservationItem,
        current: ReservationItem,
    },

    /// An item was removed by id.
    ItemRemoved { item: ReservationItem },

    /// All items of a category were removed.
    ItemsRemovedByType {
        item_type: ItemType,
        removed: Vec<ReservationItem>,
    },

    /// An item was patched.
    ItemUpdated {
        previous: ReservationItem,
        current: ReservationItem,
    },

    /// The selected camp was replaced.
    CampUpdated { camp: Option<Camp> },

    /// The store returned to its default state.
    Reset { base_price: Money },
}

impl ReservationEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            ReservationEvent::Hydrated { .. } => "Hydrated",
            ReservationEvent::ItemAdded { .. } => "ItemAdded",
            ReservationEvent::ItemReplaced { .. } => "ItemReplaced",
            ReservationEvent::ItemRemoved { .. } => "ItemRemoved",
            ReservationEvent::ItemsRemovedByType { .. } => "ItemsRemovedByType",
            ReservationEvent::ItemUpdated { .. } => "ItemUpdated",
            ReservationEvent::CampUpdated { .. } => "CampUpdated",
            ReservationEvent::Reset { .. } => "Reset",
        }
    }
}
