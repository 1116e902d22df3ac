//! Booking flow driver.

use common::CampId;
use reservation::{ReservationState, ReservationStore};

use crate::backend::{PaymentStatus, ReservationBackend, ReservationReceipt};
use crate::error::BookingError;

/// Owns the reservation store for the lifetime of one booking and talks to the backend.
///
/// Wizard steps mutate the draft through [`store_mut`](Self::store_mut); the
/// flow handles the transitions that involve the backend.
pub struct BookingFlow<B: ReservationBackend> {
    backend: B,
    store: ReservationStore,
}

impl<B: ReservationBackend> BookingFlow<B> {
    /// Creates a flow around an already constructed (and usually hydrated) store.
    pub fn new(backend: B, store: ReservationStore) -> Self {
        Self { backend, store }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ReservationStore {
        &mut self.store
    }

    /// Starts (or resumes) booking a camp.
    ///
    /// A draft already made for the same camp at the same base price is kept;
    /// anything else is replaced by a fresh draft for the fetched offer.
    #[tracing::instrument(skip(self))]
    pub async fn start(&mut self, camp_id: CampId) -> Result<&ReservationState, BookingError> {
        let offer = self.backend.fetch_camp(camp_id).await?;

        let resumable = self.store.camp().is_some_and(|camp| camp.id == camp_id)
            && self.store.base_price() == offer.base_price;

        if resumable {
            tracing::info!(%camp_id, total = %self.store.total_price(), "resuming draft");
        } else {
            tracing::info!(%camp_id, base_price = %offer.base_price, "starting new draft");
            self.store.rebase(offer.base_price);
            self.store.update_camp(Some(offer.camp));
        }

        Ok(self.store.state())
    }

    /// Submits the current draft to the backend.
    #[tracing::instrument(skip(self), fields(total = %self.store.total_price()))]
    pub async fn submit(&self) -> Result<ReservationReceipt, BookingError> {
        if self.store.camp().is_none() {
            return Err(BookingError::NoCampSelected);
        }

        let receipt = self.backend.create_reservation(self.store.state()).await?;
        metrics::counter!("booking_reservations_submitted_total").increment(1);

        if receipt.total_price != self.store.total_price() {
            tracing::warn!(
                reservation_id = %receipt.reservation_id,
                draft_total = %self.store.total_price(),
                backend_total = %receipt.total_price,
                "backend priced the reservation differently from the draft"
            );
        } else {
            tracing::info!(reservation_id = %receipt.reservation_id, "reservation submitted");
        }

        Ok(receipt)
    }

    /// Checks the payment of a submitted reservation.
    ///
    /// Once the payment is confirmed the draft is discarded by resetting the store.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_payment(
        &mut self,
        reservation_id: &str,
    ) -> Result<PaymentStatus, BookingError> {
        let status = self.backend.payment_status(reservation_id).await?;

        match status {
            PaymentStatus::Paid => {
                tracing::info!(reservation_id, "payment confirmed, clearing draft");
                metrics::counter!("booking_payments_confirmed_total").increment(1);
                self.store.reset();
            }
            PaymentStatus::Pending => {
                tracing::debug!(reservation_id, "payment still pending");
            }
            PaymentStatus::Failed => {
                tracing::warn!(reservation_id, "payment failed, keeping draft");
            }
        }

        Ok(status)
    }
}
