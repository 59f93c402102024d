//! Fire-and-forget dispatch of relay payloads.
//!
//! Every payload gets its own tokio task, so a slow or unreachable endpoint
//! never holds up a listener's receive loop. Two semaphores bound the work:
//!
//! - `in_flight` limits how many POSTs run at the same time
//! - `pending` limits how many payloads may wait for or hold a POST slot;
//!   a payload arriving when it is exhausted is dropped
//!
//! Outcomes are logged and otherwise discarded. Nothing is retried.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RelaySettings;

use super::client::RelayClient;
use super::error::{DispatchError, RelayError};
use super::payload::RelayPayload;

/// Result of one dispatched POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The endpoint answered with a 2xx status.
    Delivered { status: u16 },
    /// The endpoint answered with a non-2xx status.
    Rejected { status: u16 },
    /// No usable response (timeout, connection failure, ...).
    Failed(RelayError),
}

impl DispatchOutcome {
    fn from_result(result: Result<u16, RelayError>) -> Self {
        match result {
            Ok(status) if (200..300).contains(&status) => DispatchOutcome::Delivered { status },
            Ok(status) => DispatchOutcome::Rejected { status },
            Err(e) => DispatchOutcome::Failed(e),
        }
    }

    /// Whether the payload reached the endpoint and was accepted.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Spawns one bounded background POST per payload.
pub struct RelayDispatcher<C> {
    client: Arc<C>,
    url: Arc<str>,
    in_flight: Arc<Semaphore>,
    pending: Arc<Semaphore>,
    max_pending: usize,
}

impl<C> Clone for RelayDispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            url: Arc::clone(&self.url),
            in_flight: Arc::clone(&self.in_flight),
            pending: Arc::clone(&self.pending),
            max_pending: self.max_pending,
        }
    }
}

impl<C: RelayClient> RelayDispatcher<C> {
    /// Create a dispatcher posting to `url`.
    pub fn new(client: C, url: impl Into<String>, settings: &RelaySettings) -> Self {
        let max_in_flight = settings.max_in_flight.max(1);
        let max_pending = settings.max_pending.max(max_in_flight);
        let url: String = url.into();

        Self {
            client: Arc::new(client),
            url: Arc::from(url),
            in_flight: Arc::new(Semaphore::new(max_in_flight)),
            pending: Arc::new(Semaphore::new(max_pending)),
            max_pending,
        }
    }

    /// Endpoint receiving the POSTs.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of payloads that can still be accepted right now.
    pub fn available_slots(&self) -> usize {
        self.pending.available_permits()
    }

    /// Hand `payload` to a background task and return immediately.
    ///
    /// The returned handle may be awaited for the outcome but callers on the
    /// receive path drop it. Fails only when the backlog is full.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(
        &self,
        payload: RelayPayload,
    ) -> Result<JoinHandle<DispatchOutcome>, DispatchError> {
        let pending_permit = Arc::clone(&self.pending)
            .try_acquire_owned()
            .map_err(|_| DispatchError::Saturated {
                max_pending: self.max_pending,
            })?;

        let client = Arc::clone(&self.client);
        let url = Arc::clone(&self.url);
        let in_flight = Arc::clone(&self.in_flight);

        Ok(tokio::spawn(async move {
            let _pending = pending_permit;
            // The semaphore is never closed, so acquisition only waits
            let _slot = in_flight.acquire_owned().await.ok();

            let outcome = DispatchOutcome::from_result(client.post_form(&url, payload.fields()).await);
            log_outcome(&url, &outcome);
            outcome
        }))
    }
}

fn log_outcome(url: &str, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Delivered { status } => info!("POST {} -> {}", url, status),
        DispatchOutcome::Rejected { status } => warn!("POST {} -> {}", url, status),
        DispatchOutcome::Failed(e) => warn!("POST error: {}", e),
    }
}
