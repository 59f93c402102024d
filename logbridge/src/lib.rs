//! logbridge - UDP to HTTP relay for amateur-radio logging telemetry
//!
//! Listens for UDP broadcasts from a contest logger (N1MM Logger+) and a
//! digital-mode decoder (JTDX / WSJT-X), flattens each packet's XML or JSON
//! payload into form fields and POSTs them to a remote endpoint.
//!
//! ```text
//! UDP datagram ─► decode_payload ─► extract_fields ─► RelayPayload ─► POST
//! ```
//!
//! The [`bridge`] module wires everything together:
//!
//! ```ignore
//! use logbridge::bridge::Bridge;
//! use logbridge::config::ConfigFile;
//! use logbridge::relay::ReqwestRelayClient;
//!
//! let config = Arc::new(ConfigFile::load_from(Path::new("config.ini"))?);
//! let handle = Bridge::new(config, ReqwestRelayClient::new()?).start().await;
//! ```

pub mod bridge;
pub mod config;
pub mod listener;
pub mod logging;
pub mod payload;
pub mod relay;
pub mod source;

/// Version of the logbridge library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
