//! Reservation state and snapshot hydration.

use std::collections::HashSet;

use common::Money;
use serde::{Deserialize, Serialize};

use crate::camp::Camp;
use crate::error::SnapshotError;
use crate::item::{BASE_ITEM_ID, ItemType, ReservationItem};

/// The in-progress booking: priced line items, the selected camp and the running total.
///
/// Invariants upheld by every constructor and by the store:
/// - exactly one `base` item, with id `"base"`;
/// - at most one item of each single-slot category;
/// - addon names are unique;
/// - `total_price` equals the sum of item prices.
///
/// Deserialization goes through [`PartialReservationState`] and
/// [`ReservationState::with_defaults`], so a stored snapshot that breaks an
/// invariant is repaired rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PartialReservationState")]
pub struct ReservationState {
    base_price: Money,
    items: Vec<ReservationItem>,
    total_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    camp: Option<Camp>,
}

/// A snapshot as read from storage, with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialReservationState {
    #[serde(default)]
    pub base_price: Option<Money>,
    #[serde(default)]
    pub items: Option<Vec<ReservationItem>>,
    /// Ignored on hydration; the total is always recomputed from items.
    #[serde(default)]
    pub total_price: Option<Money>,
    #[serde(default)]
    pub camp: Option<Camp>,
}

impl ReservationState {
    /// Creates the default state: a single base item and no camp.
    pub fn new(base_price: Money) -> Self {
        Self {
            base_price,
            items: vec![ReservationItem::base(base_price)],
            total_price: base_price,
            camp: None,
        }
    }

    /// Fills the gaps of `partial` from `defaults`, field by field.
    ///
    /// Total: never fails. Item lists are normalized so the result upholds
    /// every invariant: a missing base item is restored at the front,
    /// duplicate base, single-slot, addon-name and id entries keep their
    /// first occurrence only, and the total is recomputed.
    pub fn with_defaults(partial: PartialReservationState, defaults: &ReservationState) -> Self {
        let base_price = partial.base_price.unwrap_or(defaults.base_price);
        let items = partial.items.unwrap_or_else(|| defaults.items.clone());
        let camp = partial.camp.or_else(|| defaults.camp.clone());

        let mut state = Self {
            base_price,
            items: normalize_items(items, base_price),
            total_price: Money::zero(),
            camp,
        };
        state.recalculate_total();
        state
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn camp(&self) -> Option<&Camp> {
        self.camp.as_ref()
    }

    /// Returns all items in insertion order.
    pub fn items(&self) -> &[ReservationItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the item with the given id.
    pub fn item(&self, id: &str) -> Option<&ReservationItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.item(id).is_some()
    }

    /// Returns the first item of a category. For single-slot categories this is the only one.
    pub fn item_of_type(&self, item_type: ItemType) -> Option<&ReservationItem> {
        self.items.iter().find(|item| item.item_type == item_type)
    }

    pub fn items_of_type(&self, item_type: ItemType) -> impl Iterator<Item = &ReservationItem> {
        self.items
            .iter()
            .filter(move |item| item.item_type == item_type)
    }

    /// Returns the base price item.
    pub fn base_item(&self) -> Option<&ReservationItem> {
        self.item(BASE_ITEM_ID)
    }

    /// Returns how much the promotions take off the total.
    ///
    /// Promotions flagged as not reducing the price are left out.
    pub fn promotion_discount(&self) -> Money {
        self.items_of_type(ItemType::Promotion)
            .filter(|item| {
                !item
                    .metadata
                    .as_ref()
                    .is_some_and(|m| m.does_not_reduce_price())
            })
            .filter(|item| item.price.is_negative())
            .fold(Money::zero(), |discount, item| {
                discount.saturating_add(Money::from_grosze(item.price.grosze().saturating_neg()))
            })
    }

    /// Returns the total as it would be without promotions.
    pub fn price_before_discounts(&self) -> Money {
        self.total_price.saturating_add(self.promotion_discount())
    }

    /// Returns true if nothing beyond the base item has been selected.
    pub fn is_pristine(&self) -> bool {
        self.camp.is_none()
            && self.items.len() == 1
            && self.base_item().is_some_and(|b| b.price == self.base_price)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<ReservationItem> {
        &mut self.items
    }

    pub(crate) fn set_camp(&mut self, camp: Option<Camp>) {
        self.camp = camp;
    }

    /// Recomputes the total from the items, clamping at the numeric bounds.
    pub(crate) fn recalculate_total(&mut self) {
        self.total_price = self
            .items
            .iter()
            .fold(Money::zero(), |total, item| total.saturating_add(item.price));
    }

    /// Returns the exact sum of item prices, or `None` if it overflows.
    fn checked_total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |total, item| total.checked_add(item.price))
    }

    /// Returns `candidate` if no item uses it yet, otherwise `candidate` with a random suffix.
    pub(crate) fn unused_id(&self, candidate: String) -> String {
        if !self.contains(&candidate) {
            return candidate;
        }
        loop {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            let id = format!("{candidate}-{}", &suffix[..8]);
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

impl TryFrom<PartialReservationState> for ReservationState {
    type Error = SnapshotError;

    fn try_from(partial: PartialReservationState) -> Result<Self, Self::Error> {
        let base_price = partial
            .base_price
            .or_else(|| {
                partial
                    .items
                    .as_ref()
                    .and_then(|items| items.iter().find(|item| item.is_base()))
                    .map(|item| item.price)
            })
            .ok_or(SnapshotError::MissingBasePrice)?;

        let state = Self::with_defaults(partial, &Self::new(base_price));
        if state.checked_total().is_none() {
            return Err(SnapshotError::AmountOutOfRange);
        }
        Ok(state)
    }
}

fn normalize_items(items: Vec<ReservationItem>, base_price: Money) -> Vec<ReservationItem> {
    let mut seen_ids = HashSet::new();
    let mut seen_slots = HashSet::new();
    let mut seen_addons = HashSet::new();
    let mut has_base = false;

    let mut normalized: Vec<ReservationItem> = items
        .into_iter()
        .filter(|item| {
            if !seen_ids.insert(item.id.clone()) {
                return false;
            }
            match item.item_type {
                ItemType::Base => {
                    let keep = !has_base && item.id == BASE_ITEM_ID;
                    has_base |= keep;
                    keep
                }
                ItemType::Addon => seen_addons.insert(item.name.clone()),
                other => seen_slots.insert(other),
            }
        })
        .collect();

    if !has_base {
        // An item of another category may still hold the base id.
        normalized.retain(|item| item.id != BASE_ITEM_ID);
        normalized.insert(0, ReservationItem::base(base_price));
    }

    normalized
}
