//! Booking flow for the camp reservation portal.
//!
//! Drives the reservation store through the wizard lifecycle (start,
//! submit, payment confirmation) against the portal's REST backend, with
//! structured logging (tracing) and env-based configuration.

pub mod backend;
pub mod config;
pub mod error;
pub mod flow;

pub use backend::{
    CampOffer, HttpBackend, InMemoryBackend, PaymentStatus, ReservationBackend, ReservationReceipt,
};
pub use config::Config;
pub use error::{BackendError, BookingError};
pub use flow::BookingFlow;
