//! Integration tests for the reservation store.
//!
//! These tests cover the booking-step scenarios end to end, including
//! hydration from and saving to a session slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use reservation::{
    BASE_ITEM_ID, Camp, CampProperties, ItemMetadata, ItemPatch, ItemType, Money, NewItem,
    ReservationState, ReservationStore,
};
use session_store::{
    InMemorySessionStorage, JsonSlot, Result as StoreResult, SessionStoreError, SnapshotStore,
};

fn pln(amount: i64) -> Money {
    Money::from_pln(amount)
}

fn sample_camp() -> Camp {
    Camp::new(
        3u64,
        "Obóz językowy",
        CampProperties {
            period: "lato".to_string(),
            city: "Zakopane".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
        },
    )
}

fn assert_invariants(state: &ReservationState) {
    let sum: Money = state.items().iter().map(|item| item.price).sum();
    assert_eq!(state.total_price(), sum, "total drifted from items");
    assert_eq!(state.items_of_type(ItemType::Base).count(), 1);
    assert!(state.contains(BASE_ITEM_ID));
    for item_type in ItemType::ALL.iter().filter(|t| t.is_single_slot()) {
        assert!(state.items_of_type(*item_type).count() <= 1);
    }
}

mod booking_steps {
    use super::*;

    #[test]
    fn test_worked_example_totals() {
        let mut store = ReservationStore::new(pln(2200));

        store.add_item(
            NewItem::new("Dieta wegetariańska", pln(50), ItemType::Diet),
            None,
        );
        assert_eq!(store.total_price(), pln(2250));

        store.add_item(NewItem::new("Tarcza", pln(30), ItemType::Protection), None);
        assert_eq!(store.total_price(), pln(2280));

        store.remove_items_by_type(ItemType::Diet);
        assert_eq!(store.total_price(), pln(2230));

        store.reset();
        assert_eq!(store.total_price(), pln(2200));
        assert_eq!(store.state(), &ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_invariants_hold_after_every_mutation() {
        let mut store = ReservationStore::new(pln(1999));
        let mut steps: Vec<Box<dyn Fn(&mut ReservationStore)>> = vec![
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Dieta", pln(40), ItemType::Diet), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Kajak", pln(120), ItemType::Addon), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Rower", pln(90), ItemType::Addon), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Kajak", pln(5), ItemType::Addon), None)),
            Box::new(|s: &mut ReservationStore| {
                s.add_item(
                    NewItem::new("Pokój 2-os.", Money::from_grosze(15_050), ItemType::Accommodation),
                    None,
                )
            }),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Dieta bezglutenowa", pln(70), ItemType::Diet), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::promotion("Rodzeństwo", pln(150), pln(2000)), None)),
            Box::new(|s: &mut ReservationStore| s.update_item("addon-rower", ItemPatch::new().price(pln(110)))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Autokar", pln(200), ItemType::Transport), Some("bus"))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Znajomi", pln(0), ItemType::Source), None)),
            Box::new(|s: &mut ReservationStore| s.remove_item("addon-kajak")),
            Box::new(|s: &mut ReservationStore| s.remove_item(BASE_ITEM_ID)),
            Box::new(|s: &mut ReservationStore| s.remove_items_by_type(ItemType::Base)),
            Box::new(|s: &mut ReservationStore| s.update_item(BASE_ITEM_ID, ItemPatch::new().price(pln(1800)))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Inne", Money::from_grosze(-1), ItemType::Other), None)),
            Box::new(|s: &mut ReservationStore| s.remove_items_by_type(ItemType::Promotion)),
        ];

        for step in steps.drain(..) {
            step(&mut store);
            assert_invariants(store.state());
        }

        let ids: Vec<_> = store.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["base", "diet", "addon-rower", "accommodation", "bus", "source", "other"]
        );
        assert_eq!(store.state().item("diet").unwrap().name, "Dieta bezglutenowa");
    }

    #[test]
    fn test_camp_selection_is_independent_of_items() {
        let mut store = ReservationStore::new(pln(2200));
        store.add_item(NewItem::new("Tarcza", pln(30), ItemType::Protection), None);

        store.update_camp(Some(sample_camp()));
        assert_eq!(store.camp().unwrap().name, "Obóz językowy");
        assert_eq!(store.total_price(), pln(2230));

        store.update_camp(None);
        assert!(store.camp().is_none());
        assert_eq!(store.items().len(), 2);
    }
}

mod persistence {
    use super::*;

    fn populated(store: &mut ReservationStore) {
        store.update_camp(Some(sample_camp()));
        store.add_item(NewItem::new("Dieta", Money::from_grosze(4999), ItemType::Diet), None);
        store.add_item(NewItem::new("Kajak", pln(120), ItemType::Addon), None);
        store.add_item(NewItem::promotion("First minute", pln(100), pln(2200)), None);
    }

    #[test]
    fn test_snapshot_roundtrip_is_lossless() {
        let storage = InMemorySessionStorage::new();
        let mut store = ReservationStore::open(pln(2200), JsonSlot::new(storage.clone()));
        populated(&mut store);

        let slot = JsonSlot::new(storage);
        let loaded: ReservationState = slot.load().unwrap().unwrap();
        assert_eq!(&loaded, store.state());
    }

    #[test]
    fn test_store_resumes_from_previous_session_slot() {
        let storage = InMemorySessionStorage::new();
        let expected = {
            let mut store = ReservationStore::open(pln(2200), JsonSlot::new(storage.clone()));
            populated(&mut store);
            store.state().clone()
        };

        let resumed = ReservationStore::open(pln(9999), JsonSlot::new(storage));
        assert_eq!(resumed.state(), &expected);
        assert_eq!(resumed.base_price(), pln(2200));
    }

    #[test]
    fn test_nothing_is_saved_before_hydration() {
        let storage = InMemorySessionStorage::new();
        let previous = {
            let mut store = ReservationStore::open(pln(2200), JsonSlot::new(storage.clone()));
            populated(&mut store);
            store.state().clone()
        };

        let mut store = ReservationStore::with_persistence(pln(2200), JsonSlot::new(storage.clone()));
        store.reset();
        assert!(!store.is_hydrated());

        let slot = JsonSlot::new(storage.clone());
        let untouched: ReservationState = slot.load().unwrap().unwrap();
        assert_eq!(untouched, previous);

        assert!(store.hydrate());
        assert_eq!(store.state(), &previous);

        store.reset();
        let saved: ReservationState = slot.load().unwrap().unwrap();
        assert_eq!(saved, ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_empty_slot_falls_back_to_defaults() {
        let mut store =
            ReservationStore::with_persistence(pln(2200), JsonSlot::new(InMemorySessionStorage::new()));
        assert!(!store.hydrate());
        assert_eq!(store.state(), &ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_defaults() {
        let storage = InMemorySessionStorage::new();
        session_store::SessionStorage::set_item(&storage, "reservation", "{\"items\": 42").unwrap();

        let store = ReservationStore::open(pln(2200), JsonSlot::new(storage));
        assert_eq!(store.state(), &ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_oversized_amounts_fall_back_to_defaults() {
        let storage = InMemorySessionStorage::new();
        let raw = r#"{
            "basePrice": 1e300,
            "items": [
                {"id": "base", "name": "Cena podstawowa", "price": 1e300, "type": "base"},
                {"id": "diet", "name": "Dieta", "price": 1, "type": "diet"}
            ]
        }"#;
        session_store::SessionStorage::set_item(&storage, "reservation", raw).unwrap();

        let store = ReservationStore::open(pln(2200), JsonSlot::new(storage));
        assert_eq!(store.state(), &ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_overflowing_total_falls_back_to_defaults() {
        let storage = InMemorySessionStorage::new();
        let raw = r#"{
            "basePrice": 90000000000000000,
            "items": [
                {"id": "base", "name": "Cena podstawowa", "price": 90000000000000000, "type": "base"},
                {"id": "diet", "name": "Dieta", "price": 90000000000000000, "type": "diet"}
            ]
        }"#;
        session_store::SessionStorage::set_item(&storage, "reservation", raw).unwrap();

        let store = ReservationStore::open(pln(2200), JsonSlot::new(storage));
        assert_eq!(store.state(), &ReservationState::new(pln(2200)));
    }

    #[test]
    fn test_every_saved_state_reloads_unchanged() {
        let storage = InMemorySessionStorage::new();
        let slot = JsonSlot::new(storage.clone());
        let mut store = ReservationStore::open(pln(1999), JsonSlot::new(storage));

        let mut steps: Vec<Box<dyn Fn(&mut ReservationStore)>> = vec![
            Box::new(|s: &mut ReservationStore| s.update_camp(Some(sample_camp()))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Kajak", pln(100), ItemType::Addon), Some("diet"))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Dieta", Money::from_grosze(4999), ItemType::Diet), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Autokar", pln(150), ItemType::Transport), Some("addon-rower"))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Rower", pln(80), ItemType::Addon), None)),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Rower", pln(85), ItemType::Addon), Some("rower-2"))),
            Box::new(|s: &mut ReservationStore| {
                let rower = s.state().items_of_type(ItemType::Addon).find(|i| i.name == "Rower").unwrap().id.clone();
                s.update_item(&rower, ItemPatch::new().name("Kajak"))
            }),
            Box::new(|s: &mut ReservationStore| s.update_item("diet", ItemPatch::new().name("Kajak wieloosobowy"))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::promotion("Rodzeństwo", Money::from_grosze(12_345), pln(2200)), None)),
            Box::new(|s: &mut ReservationStore| {
                s.update_item(
                    "promotion",
                    ItemPatch::new().metadata(ItemMetadata {
                        original_price: Some(pln(2300)),
                        does_not_reduce_price: Some(true),
                    }),
                )
            }),
            Box::new(|s: &mut ReservationStore| s.update_item("promotion", ItemPatch::new().clear_metadata())),
            Box::new(|s: &mut ReservationStore| s.update_item(BASE_ITEM_ID, ItemPatch::new().price(Money::from_grosze(180_001)))),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Dieta wegańska", pln(60), ItemType::Diet), Some("ignored"))),
            Box::new(|s: &mut ReservationStore| s.remove_item("addon-rower")),
            Box::new(|s: &mut ReservationStore| s.add_item(NewItem::new("Autokar", pln(160), ItemType::Transport), None)),
            Box::new(|s: &mut ReservationStore| s.remove_items_by_type(ItemType::Addon)),
            Box::new(|s: &mut ReservationStore| s.update_camp(None)),
        ];

        for step in steps.drain(..) {
            step(&mut store);
            assert_invariants(store.state());
            let reloaded: ReservationState = slot.load().unwrap().unwrap();
            assert_eq!(&reloaded, store.state());
        }

        assert_eq!(store.base_price(), pln(1999));
        assert!(store.state().items_of_type(ItemType::Addon).next().is_none());
    }

    #[test]
    fn test_snapshot_written_by_another_client_is_accepted() {
        let storage = InMemorySessionStorage::new();
        let raw = r#"{
            "basePrice": 2200,
            "items": [
                {"id": "base", "name": "Cena podstawowa", "price": 2200, "type": "base"},
                {"id": "diet-1718000000000", "name": "Dieta wegańska", "price": 49.5, "type": "diet"},
                {"id": "promo", "name": "Rabat", "price": -100, "type": "promotion",
                 "metadata": {"originalPrice": 2249.5, "doesNotReducePrice": false}}
            ],
            "totalPrice": 2149.5,
            "camp": {"id": 3, "name": "Obóz językowy",
                     "properties": {"period": "lato", "city": "Zakopane",
                                    "start_date": "2025-07-05", "end_date": "2025-07-15"}}
        }"#;
        session_store::SessionStorage::set_item(&storage, "reservation", raw).unwrap();

        let store = ReservationStore::open(pln(2200), JsonSlot::new(storage));
        assert_eq!(store.total_price(), Money::from_grosze(214_950));
        assert_eq!(store.state().promotion_discount(), pln(100));
        assert_eq!(store.camp(), Some(&sample_camp()));
    }

    struct FailingSlot {
        saves: Arc<AtomicUsize>,
    }

    impl SnapshotStore<ReservationState> for FailingSlot {
        fn load(&self) -> StoreResult<Option<ReservationState>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &ReservationState) -> StoreResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(SessionStoreError::Io(std::io::Error::other("quota exceeded")))
        }

        fn discard(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_save_failures_do_not_affect_in_memory_state() {
        let saves = Arc::new(AtomicUsize::new(0));
        let mut store = ReservationStore::open(
            pln(2200),
            FailingSlot {
                saves: saves.clone(),
            },
        );

        store.add_item(NewItem::new("Dieta", pln(50), ItemType::Diet), None);
        store.add_item(NewItem::new("Tarcza", pln(30), ItemType::Protection), None);

        assert_eq!(saves.load(Ordering::SeqCst), 2);
        assert_eq!(store.total_price(), pln(2280));
    }
}
