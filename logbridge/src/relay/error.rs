//! Error types for the relay path.

use std::time::Duration;

use thiserror::Error;

/// Errors from a single outbound POST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// No response within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused, DNS failure and the like.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Http(String),
}

/// Errors handing a payload to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The backlog of pending POSTs is full.
    #[error("relay backlog full ({max_pending} pending), packet dropped")]
    Saturated { max_pending: usize },
}
