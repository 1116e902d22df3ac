use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CampId;
use parking_lot::RwLock;
use reservation::ReservationState;

use super::{CampOffer, PaymentStatus, ReservationBackend, ReservationReceipt};
use crate::error::BackendError;

#[derive(Debug, Default)]
struct Inner {
    camps: HashMap<CampId, CampOffer>,
    reservations: HashMap<String, (ReservationState, PaymentStatus)>,
    next_reservation: u64,
}

/// In-memory backend for tests and offline runs.
///
/// Reservations are accepted at the draft's own total and start out
/// `pending`. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a bookable camp.
    pub fn with_camp(self, offer: CampOffer) -> Self {
        self.inner.write().camps.insert(offer.camp.id, offer);
        self
    }

    /// Sets the payment state of a reservation. Returns false if it doesn't exist.
    pub fn set_payment_status(&self, reservation_id: &str, status: PaymentStatus) -> bool {
        match self.inner.write().reservations.get_mut(reservation_id) {
            Some((_, current)) => {
                *current = status;
                true
            }
            None => false,
        }
    }

    /// Returns the draft a reservation was created from.
    pub fn reservation(&self, reservation_id: &str) -> Option<ReservationState> {
        self.inner
            .read()
            .reservations
            .get(reservation_id)
            .map(|(draft, _)| draft.clone())
    }

    /// Returns the number of submitted reservations.
    pub fn reservation_count(&self) -> usize {
        self.inner.read().reservations.len()
    }
}

#[async_trait]
impl ReservationBackend for InMemoryBackend {
    async fn fetch_camp(&self, camp_id: CampId) -> Result<CampOffer, BackendError> {
        self.inner
            .read()
            .camps
            .get(&camp_id)
            .cloned()
            .ok_or(BackendError::CampNotFound(camp_id))
    }

    async fn create_reservation(
        &self,
        draft: &ReservationState,
    ) -> Result<ReservationReceipt, BackendError> {
        let mut inner = self.inner.write();
        inner.next_reservation += 1;
        let reservation_id = format!("R-{:06}", inner.next_reservation);
        inner
            .reservations
            .insert(reservation_id.clone(), (draft.clone(), PaymentStatus::Pending));

        Ok(ReservationReceipt {
            reservation_id,
            total_price: draft.total_price(),
        })
    }

    async fn payment_status(&self, reservation_id: &str) -> Result<PaymentStatus, BackendError> {
        self.inner
            .read()
            .reservations
            .get(reservation_id)
            .map(|(_, status)| *status)
            .ok_or_else(|| BackendError::ReservationNotFound(reservation_id.to_string()))
    }
}
