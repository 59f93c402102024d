//! Bridge orchestration: one listener per enabled source.
//!
//! # Example
//!
//! ```ignore
//! let config = Arc::new(ConfigFile::load_from(Path::new("config.ini"))?);
//! let client = ReqwestRelayClient::new()?;
//! let handle = Bridge::new(config, client).start().await;
//!
//! tokio::signal::ctrl_c().await?;
//! handle.shutdown();
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ConfigFile;
use crate::listener::{Listener, PacketHandler};
use crate::relay::RelayClient;
use crate::source::Source;

/// Starts and owns the per-source listeners.
pub struct Bridge<C> {
    handler: PacketHandler<C>,
}

impl<C: RelayClient> Bridge<C> {
    /// Create a bridge relaying through `client` to the configured server.
    pub fn new(config: Arc<ConfigFile>, client: C) -> Self {
        Self {
            handler: PacketHandler::from_config(config, client),
        }
    }

    /// Bind and spawn a listener for every enabled source.
    ///
    /// Disabled sources and sources whose port cannot be bound are logged
    /// and skipped; they never prevent the other source from running.
    pub async fn start(self) -> BridgeHandle {
        let config = self.handler.config();
        info!(
            "Relaying to {} (max {} POSTs in flight)",
            config.server.url, config.relay.max_in_flight
        );

        let mut listeners = Vec::new();
        for source in Source::ALL {
            let settings = self.handler.config().source(source);
            if !settings.enabled {
                info!("{} listener disabled in config", settings.label);
                continue;
            }

            match Listener::bind(source, settings.port, self.handler.clone()).await {
                Ok(listener) => {
                    let local_addr = match listener.local_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            error!("{} socket has no local address: {}", settings.label, e);
                            continue;
                        }
                    };
                    listeners.push(ActiveListener {
                        source,
                        local_addr,
                        task: listener.start(),
                    });
                }
                Err(e) => error!("{}", e),
            }
        }

        if listeners.is_empty() {
            warn!("No listeners running; nothing will be relayed");
        }

        BridgeHandle { listeners }
    }
}

/// A listener that bound successfully and is receiving.
pub struct ActiveListener {
    source: Source,
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ActiveListener {
    /// Source this listener receives for.
    pub fn source(&self) -> Source {
        self.source
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Handle to the running listeners.
pub struct BridgeHandle {
    listeners: Vec<ActiveListener>,
}

impl BridgeHandle {
    /// Listeners that are running.
    pub fn listeners(&self) -> &[ActiveListener] {
        &self.listeners
    }

    /// Whether a listener is running for `source`.
    pub fn is_running(&self, source: Source) -> bool {
        self.listener(source)
            .is_some_and(|listener| !listener.task.is_finished())
    }

    /// Bound address of the listener for `source`, if it is running.
    pub fn local_addr(&self, source: Source) -> Option<SocketAddr> {
        self.listener(source).map(ActiveListener::local_addr)
    }

    /// Stop all listeners. In-flight POSTs are left to finish on their own.
    pub fn shutdown(self) {
        for listener in self.listeners {
            listener.task.abort();
        }
    }

    fn listener(&self, source: Source) -> Option<&ActiveListener> {
        self.listeners.iter().find(|l| l.source == source)
    }
}
