use std::time::Duration;

use async_trait::async_trait;
use common::CampId;
use reqwest::{Client, Response, StatusCode};
use reservation::ReservationState;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{CampOffer, PaymentStatus, ReservationBackend, ReservationReceipt};
use crate::config::Config;
use crate::error::BackendError;

/// Backend reached over HTTPS with JSON bodies.
///
/// Endpoints, relative to the base URL:
/// - `GET  camps/{id}`
/// - `POST reservations`
/// - `GET  reservations/{id}/payment`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PaymentStatusBody {
    status: PaymentStatus,
}

impl HttpBackend {
    /// Creates a backend client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Creates a backend client from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(config.api_url.clone(), config.http_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

fn not_found_as(error: BackendError, mapped: impl FnOnce() -> BackendError) -> BackendError {
    match error {
        BackendError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => mapped(),
        other => other,
    }
}

#[async_trait]
impl ReservationBackend for HttpBackend {
    #[tracing::instrument(skip(self))]
    async fn fetch_camp(&self, camp_id: CampId) -> Result<CampOffer, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("camps/{camp_id}")))
            .send()
            .await?;
        Self::decode(response)
            .await
            .map_err(|e| not_found_as(e, || BackendError::CampNotFound(camp_id)))
    }

    #[tracing::instrument(skip(self, draft), fields(total = %draft.total_price()))]
    async fn create_reservation(
        &self,
        draft: &ReservationState,
    ) -> Result<ReservationReceipt, BackendError> {
        let response = self
            .client
            .post(self.url("reservations"))
            .json(draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn payment_status(&self, reservation_id: &str) -> Result<PaymentStatus, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("reservations/{reservation_id}/payment")))
            .send()
            .await?;
        let body: PaymentStatusBody = Self::decode(response).await.map_err(|e| {
            not_found_as(e, || {
                BackendError::ReservationNotFound(reservation_id.to_string())
            })
        })?;
        Ok(body.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slashes() {
        let backend = HttpBackend::new("https://obozy.example/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.url("/camps/3"), "https://obozy.example/api/camps/3");
        assert_eq!(backend.url("reservations"), "https://obozy.example/api/reservations");
    }

    #[test]
    fn test_not_found_status_is_mapped() {
        let error = BackendError::Status {
            status: 404,
            message: "missing".to_string(),
        };
        let mapped = not_found_as(error, || BackendError::CampNotFound(CampId::new(3)));
        assert!(matches!(mapped, BackendError::CampNotFound(id) if id == CampId::new(3)));

        let error = BackendError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        let mapped = not_found_as(error, || BackendError::CampNotFound(CampId::new(3)));
        assert!(matches!(mapped, BackendError::Status { status: 500, .. }));
    }

    #[test]
    fn test_from_config_uses_api_url() {
        let config = Config {
            api_url: "http://127.0.0.1:9000".to_string(),
            ..Config::default()
        };
        let backend = HttpBackend::from_config(&config).unwrap();
        assert_eq!(backend.url("camps/1"), "http://127.0.0.1:9000/camps/1");
    }
}
