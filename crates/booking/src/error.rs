//! Booking error types.

use common::CampId;
use session_store::SessionStoreError;
use thiserror::Error;

/// Errors returned by a [`ReservationBackend`](crate::ReservationBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The requested camp doesn't exist.
    #[error("Camp not found: {0}")]
    CampNotFound(CampId),

    /// The requested reservation doesn't exist.
    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    /// The response body didn't have the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur while driving the booking flow.
#[derive(Debug, Error)]
pub enum BookingError {
    /// A backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Submission was attempted before a camp was chosen.
    #[error("No camp selected")]
    NoCampSelected,

    /// The session slot could not be opened.
    #[error("Session storage error: {0}")]
    Storage(#[from] SessionStoreError),

    /// Output could not be rendered as JSON.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
