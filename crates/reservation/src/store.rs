//! The reservation store shared by every booking step.

use common::Money;
use session_store::SnapshotStore;

use crate::camp::Camp;
use crate::events::ReservationEvent;
use crate::item::{BASE_ITEM_ID, ItemPatch, ItemType, NewItem, ReservationItem};
use crate::state::ReservationState;

/// Callback invoked after every effective change.
pub type Observer = Box<dyn Fn(&ReservationEvent, &ReservationState) + Send + Sync>;

/// Handle returned by [`ReservationStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single source of truth for the in-progress booking.
///
/// The store is a plain owned value: whoever drives the booking flow owns it
/// and hands `&mut` access to the current step. Operations never fail;
/// references to unknown ids are ignored and the backend remains the
/// authority on the final price.
///
/// When a persistence slot is attached, every change is saved once
/// [`hydrate`](Self::hydrate) has run, so a not-yet-loaded snapshot is never
/// overwritten by the transient default state. Save failures are logged and
/// otherwise ignored; the in-memory state stays authoritative.
pub struct ReservationStore {
    state: ReservationState,
    persistence: Option<Box<dyn SnapshotStore<ReservationState>>>,
    hydrated: bool,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ReservationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationStore")
            .field("state", &self.state)
            .field("persistent", &self.persistence.is_some())
            .field("hydrated", &self.hydrated)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ReservationStore {
    /// Creates an in-memory store in its default state.
    pub fn new(base_price: Money) -> Self {
        Self {
            state: ReservationState::new(base_price),
            persistence: None,
            hydrated: false,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store backed by a snapshot slot without loading it yet.
    ///
    /// Nothing is saved until [`hydrate`](Self::hydrate) has been called.
    pub fn with_persistence(
        base_price: Money,
        persistence: impl SnapshotStore<ReservationState> + 'static,
    ) -> Self {
        Self {
            persistence: Some(Box::new(persistence)),
            ..Self::new(base_price)
        }
    }

    /// Creates a store backed by a snapshot slot and hydrates it immediately.
    pub fn open(
        base_price: Money,
        persistence: impl SnapshotStore<ReservationState> + 'static,
    ) -> Self {
        let mut store = Self::with_persistence(base_price, persistence);
        store.hydrate();
        store
    }

    /// Loads the persisted snapshot, if any, and enables saving.
    ///
    /// A missing or unreadable snapshot leaves the store in its default
    /// state. Returns true if a snapshot was restored.
    #[tracing::instrument(skip(self))]
    pub fn hydrate(&mut self) -> bool {
        let loaded = match &self.persistence {
            Some(persistence) => match persistence.load() {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    tracing::warn!(%error, "discarding unreadable reservation snapshot");
                    metrics::counter!("reservation_persistence_failures_total", "op" => "load")
                        .increment(1);
                    None
                }
            },
            None => None,
        };

        let restored = loaded.is_some();
        self.state = loaded.unwrap_or_else(|| ReservationState::new(self.state.base_price()));
        self.hydrated = true;

        tracing::debug!(
            restored,
            items = self.state.item_count(),
            total = %self.state.total_price(),
            "reservation hydrated"
        );
        self.notify(&ReservationEvent::Hydrated { restored });
        restored
    }

    /// Returns true once the first load has completed.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Registers an observer called after every change.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&ReservationEvent, &ReservationState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }
}

// Queries
impl ReservationStore {
    /// Returns the latest state.
    pub fn state(&self) -> &ReservationState {
        &self.state
    }

    pub fn items(&self) -> &[ReservationItem] {
        self.state.items()
    }

    pub fn total_price(&self) -> Money {
        self.state.total_price()
    }

    pub fn base_price(&self) -> Money {
        self.state.base_price()
    }

    pub fn camp(&self) -> Option<&Camp> {
        self.state.camp()
    }
}

// Mutations
impl ReservationStore {
    /// Adds a line item.
    ///
    /// - if `custom_id` is already in use, nothing happens;
    /// - base items can't be added;
    /// - an addon whose name is already present is ignored;
    /// - a single-slot item replaces the existing item of its category in
    ///   place, keeping that item's id.
    ///
    /// New items get `custom_id` when given, otherwise an id derived from
    /// their category (or name, for addons).
    pub fn add_item(&mut self, item: NewItem, custom_id: Option<&str>) {
        if let Some(id) = custom_id
            && self.state.contains(id)
        {
            tracing::debug!(id, "item id already present, ignoring add");
            return;
        }

        match item.item_type {
            ItemType::Base => {
                tracing::debug!("base item can't be added");
            }
            ItemType::Addon => {
                let duplicate = self
                    .state
                    .items_of_type(ItemType::Addon)
                    .any(|existing| existing.name == item.name);
                if duplicate {
                    tracing::debug!(name = %item.name, "addon already selected");
                    return;
                }
                self.append(item, custom_id);
            }
            item_type => {
                let slot = self
                    .state
                    .items_mut()
                    .iter_mut()
                    .find(|existing| existing.item_type == item_type);

                match slot {
                    Some(existing) => {
                        let previous = existing.clone();
                        *existing = ReservationItem::from_new(previous.id.clone(), item);
                        let current = existing.clone();
                        metrics::counter!("reservation_items_replaced_total", "type" => item_type.as_str())
                            .increment(1);
                        self.commit(ReservationEvent::ItemReplaced { previous, current });
                    }
                    None => self.append(item, custom_id),
                }
            }
        }
    }

    /// Removes the item with the given id. The base item can't be removed.
    pub fn remove_item(&mut self, id: &str) {
        if id == BASE_ITEM_ID {
            return;
        }

        let items = self.state.items_mut();
        let Some(position) = items.iter().position(|item| item.id == id) else {
            return;
        };
        let item = items.remove(position);

        metrics::counter!("reservation_items_removed_total", "type" => item.item_type.as_str())
            .increment(1);
        self.commit(ReservationEvent::ItemRemoved { item });
    }

    /// Removes every item of a category. The base category is left alone.
    pub fn remove_items_by_type(&mut self, item_type: ItemType) {
        if item_type == ItemType::Base {
            return;
        }

        let items = std::mem::take(self.state.items_mut());
        let (removed, kept): (Vec<_>, Vec<_>) = items
            .into_iter()
            .partition(|item| item.item_type == item_type);
        *self.state.items_mut() = kept;

        if removed.is_empty() {
            return;
        }

        metrics::counter!("reservation_items_removed_total", "type" => item_type.as_str())
            .increment(removed.len() as u64);
        self.commit(ReservationEvent::ItemsRemovedByType { item_type, removed });
    }

    /// Shallow-merges `patch` into the item with the given id.
    ///
    /// Renaming an addon to a name another addon already has keeps the
    /// current name; the rest of the patch still applies.
    pub fn update_item(&mut self, id: &str, mut patch: ItemPatch) {
        let is_addon = self
            .state
            .item(id)
            .is_some_and(|item| item.item_type == ItemType::Addon);
        let name_taken = is_addon
            && patch.name.as_deref().is_some_and(|name| {
                self.state
                    .items_of_type(ItemType::Addon)
                    .any(|other| other.id != id && other.name == name)
            });
        if name_taken {
            tracing::debug!(id, "addon name already taken, keeping the current name");
            patch.name = None;
        }

        let Some(item) = self
            .state
            .items_mut()
            .iter_mut()
            .find(|item| item.id == id)
        else {
            return;
        };

        let previous = item.clone();
        if !item.apply(patch) {
            return;
        }
        let current = item.clone();
        self.commit(ReservationEvent::ItemUpdated { previous, current });
    }

    /// Replaces the selected camp. Items and total are untouched.
    pub fn update_camp(&mut self, camp: Option<Camp>) {
        if self.state.camp() == camp.as_ref() {
            return;
        }
        self.state.set_camp(camp.clone());
        self.commit(ReservationEvent::CampUpdated { camp });
    }

    /// Returns to the default state: the base item alone and no camp.
    pub fn reset(&mut self) {
        let base_price = self.state.base_price();
        self.state = ReservationState::new(base_price);
        metrics::counter!("reservation_resets_total").increment(1);
        self.commit(ReservationEvent::Reset { base_price });
    }

    /// Resets to the default state for a different base price.
    pub fn rebase(&mut self, base_price: Money) {
        self.state = ReservationState::new(base_price);
        metrics::counter!("reservation_resets_total").increment(1);
        self.commit(ReservationEvent::Reset { base_price });
    }

    fn append(&mut self, item: NewItem, custom_id: Option<&str>) {
        let id = match custom_id {
            Some(id) => id.to_string(),
            None => self.state.unused_id(item.derived_id()),
        };
        let item = ReservationItem::from_new(id, item);

        metrics::counter!("reservation_items_added_total", "type" => item.item_type.as_str())
            .increment(1);
        self.state.items_mut().push(item.clone());
        self.commit(ReservationEvent::ItemAdded { item });
    }

    fn commit(&mut self, event: ReservationEvent) {
        self.state.recalculate_total();
        metrics::gauge!("reservation_total_price_pln").set(self.state.total_price().as_pln_f64());

        tracing::debug!(
            event = event.event_type(),
            items = self.state.item_count(),
            total = %self.state.total_price(),
            "reservation changed"
        );

        self.persist();
        self.notify(&event);
    }

    fn persist(&self) {
        if !self.hydrated {
            return;
        }
        let Some(persistence) = &self.persistence else {
            return;
        };
        if let Err(error) = persistence.save(&self.state) {
            tracing::warn!(%error, "failed to save reservation snapshot");
            metrics::counter!("reservation_persistence_failures_total", "op" => "save")
                .increment(1);
        }
    }

    fn notify(&self, event: &ReservationEvent) {
        for (_, observer) in &self.observers {
            observer(event, &self.state);
        }
    }
}
