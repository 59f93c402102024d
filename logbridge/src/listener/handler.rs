//! Per-packet pipeline: decode, extract, build payload, dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::payload::{decode_payload, extract_fields, preview};
use crate::relay::{DispatchOutcome, RelayClient, RelayDispatcher, RelayPayload};
use crate::source::Source;

/// Turns received datagrams into dispatched relay payloads.
///
/// Shared by all listeners; holds no per-packet state.
pub struct PacketHandler<C> {
    config: Arc<ConfigFile>,
    dispatcher: RelayDispatcher<C>,
}

impl<C> Clone for PacketHandler<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: RelayClient> PacketHandler<C> {
    /// Create a handler from the shared config and a dispatcher.
    pub fn new(config: Arc<ConfigFile>, dispatcher: RelayDispatcher<C>) -> Self {
        Self { config, dispatcher }
    }

    /// Create a handler posting to the configured server with `client`.
    pub fn from_config(config: Arc<ConfigFile>, client: C) -> Self {
        let dispatcher = RelayDispatcher::new(client, config.server.url.clone(), &config.relay);
        Self::new(config, dispatcher)
    }

    /// The shared configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Process one datagram from `source`.
    ///
    /// Returns as soon as the POST is handed off; the handle is `None` when
    /// the packet was dropped because the relay backlog is full.
    pub fn handle(
        &self,
        source: Source,
        bytes: &[u8],
        from: SocketAddr,
    ) -> Option<JoinHandle<DispatchOutcome>> {
        let text = decode_payload(bytes);
        let label = &self.config.source(source).label;
        info!("{} from {} -> {}", label, from, preview(&text));

        let fields = extract_fields(source, &text);
        let payload = RelayPayload::build(label, text, &self.config.server.token, fields);

        match self.dispatcher.dispatch(payload) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("{} from {}: {}", label, from, e);
                None
            }
        }
    }
}
