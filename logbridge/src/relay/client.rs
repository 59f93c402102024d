//! Relay client trait and reqwest implementation.
//!
//! The [`RelayClient`] trait abstracts the outbound HTTP call so the
//! dispatcher and listeners can be tested without a network.

use std::future::Future;
use std::time::Duration;

use crate::payload::FieldMap;

use super::error::RelayError;

/// Fixed timeout bounding every outbound POST.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts form fields to a remote endpoint.
pub trait RelayClient: Send + Sync + 'static {
    /// POST `fields` to `url` as `application/x-www-form-urlencoded`.
    ///
    /// Returns the HTTP status code of any response, successful or not.
    fn post_form(
        &self,
        url: &str,
        fields: &FieldMap,
    ) -> impl Future<Output = Result<u16, RelayError>> + Send;
}

/// Relay client using a reusable `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestRelayClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestRelayClient {
    /// Create a client with the fixed [`RELAY_TIMEOUT`].
    pub fn new() -> Result<Self, RelayError> {
        Self::with_timeout(RELAY_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::ClientBuild(e.to_string()))?;

        Ok(Self { http, timeout })
    }

    /// Timeout applied to every POST.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, e: reqwest::Error) -> RelayError {
        if e.is_timeout() {
            RelayError::Timeout(self.timeout)
        } else if e.is_connect() {
            RelayError::Connect(e.to_string())
        } else {
            RelayError::Http(e.to_string())
        }
    }
}

impl RelayClient for ReqwestRelayClient {
    async fn post_form(&self, url: &str, fields: &FieldMap) -> Result<u16, RelayError> {
        let response = self
            .http
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        Ok(response.status().as_u16())
    }
}
