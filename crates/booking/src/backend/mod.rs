//! The portal backend as seen by the booking flow.

mod http;
mod memory;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use async_trait::async_trait;
use common::{CampId, Money};
use reservation::{Camp, ReservationState};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// A bookable camp edition together with its current base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampOffer {
    pub camp: Camp,
    pub base_price: Money,
}

/// Confirmation that the backend recorded a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationReceipt {
    pub reservation_id: String,

    /// Total as priced by the backend. This, not the draft's total, is what gets charged.
    pub total_price: Money,
}

/// Payment state of a submitted reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote collaborator owning pricing, payments and persistence.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ReservationBackend: Send + Sync {
    /// Fetches a camp edition and its base price.
    async fn fetch_camp(&self, camp_id: CampId) -> Result<CampOffer, BackendError>;

    /// Submits the draft and returns the backend's receipt.
    async fn create_reservation(
        &self,
        draft: &ReservationState,
    ) -> Result<ReservationReceipt, BackendError>;

    /// Returns the payment state of a submitted reservation.
    async fn payment_status(&self, reservation_id: &str) -> Result<PaymentStatus, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_wire_names() {
        let status: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(PaymentStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_receipt_is_camel_case() {
        let receipt: ReservationReceipt =
            serde_json::from_str(r#"{"reservationId":"R-1","totalPrice":2280}"#).unwrap();
        assert_eq!(receipt.reservation_id, "R-1");
        assert_eq!(receipt.total_price, Money::from_pln(2280));
    }
}
