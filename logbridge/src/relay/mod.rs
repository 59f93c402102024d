//! Outbound relay to the remote HTTP endpoint.
//!
//! # Architecture
//!
//! ```text
//! RelayPayload ──► RelayDispatcher::dispatch ──► tokio task (bounded)
//!                                                    │
//!                                                    └── RelayClient::post_form
//!                                                           └── ReqwestRelayClient
//! ```

mod client;
mod dispatcher;
mod error;
mod payload;

pub use client::{RelayClient, ReqwestRelayClient, RELAY_TIMEOUT};
pub use dispatcher::{DispatchOutcome, RelayDispatcher};
pub use error::{DispatchError, RelayError};
pub use payload::{RelayPayload, DATA_RAW_FIELD, SOURCE_FIELD, TOKEN_FIELD};
