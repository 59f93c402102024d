//! UDP listeners for the two packet sources.
//!
//! Each listener owns one socket bound to `0.0.0.0:<port>` and loops forever:
//!
//! ```text
//! recv_from ──► PacketHandler::handle ──► (dispatch task, not awaited)
//!     │
//!     └── error ──► log, sleep 1s, continue
//! ```
//!
//! A listener that fails to bind never starts; other listeners are unaffected.

mod handler;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::relay::RelayClient;
use crate::source::Source;

pub use handler::PacketHandler;

/// Largest datagram accepted; longer datagrams are truncated by the socket.
pub const MAX_DATAGRAM_SIZE: usize = 8192;

/// Pause after a receive error before receiving again.
pub const RECV_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Error type for listeners.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind the UDP socket.
    #[error("Failed to bind {label} on port {port}: {source}")]
    Bind {
        label: String,
        port: u16,
        #[source]
        source: io::Error,
    },
}

/// Datagram receive side of a listener socket.
pub trait DatagramSocket: Send + Sync + 'static {
    /// Receive one datagram into `buf`, returning its length and sender.
    fn recv_datagram(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = io::Result<(usize, SocketAddr)>> + Send;

    /// Address the socket is bound to.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl DatagramSocket for UdpSocket {
    async fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.recv_from(buf).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        UdpSocket::local_addr(self)
    }
}

/// A bound UDP listener for one source.
pub struct Listener<C, S = UdpSocket> {
    source: Source,
    socket: S,
    handler: PacketHandler<C>,
}

impl<C: RelayClient> Listener<C, UdpSocket> {
    /// Bind a socket on `0.0.0.0:<port>` for `source`.
    ///
    /// Port 0 picks a free port; see [`Listener::local_addr`].
    pub async fn bind(
        source: Source,
        port: u16,
        handler: PacketHandler<C>,
    ) -> Result<Self, ListenerError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))
            .await
            .map_err(|e| ListenerError::Bind {
                label: handler.config().source(source).label.clone(),
                port,
                source: e,
            })?;

        Ok(Self::with_socket(source, socket, handler))
    }
}

impl<C: RelayClient, S: DatagramSocket> Listener<C, S> {
    /// Wrap an already bound socket.
    pub fn with_socket(source: Source, socket: S, handler: PacketHandler<C>) -> Self {
        Self {
            source,
            socket,
            handler,
        }
    }

    /// The source this listener receives for.
    pub fn source(&self) -> Source {
        self.source
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawn the receive loop as a tokio task.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Receive datagrams until the task is aborted or the process exits.
    pub async fn run(self) {
        let label = self.handler.config().source(self.source).label.clone();
        info!(
            "{} listener started on UDP port {}",
            label,
            self.local_addr().map(|a| a.port()).unwrap_or_default()
        );

        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];
        loop {
            match self.socket.recv_datagram(&mut buffer).await {
                Ok((len, from)) => {
                    debug!(source = %label, len, %from, "Datagram received");
                    // Dispatch runs on its own task; the handle is not awaited
                    let _ = self.handler.handle(self.source, &buffer[..len], from);
                }
                Err(e) => {
                    warn!("{} recv error: {}", label, e);
                    tokio::time::sleep(RECV_ERROR_BACKOFF).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::logging::capture::LogCapture;
    use crate::payload::FieldMap;
    use crate::relay::RelayError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    /// Forwards every posted payload to a channel.
    struct ChannelClient(mpsc::UnboundedSender<FieldMap>);

    impl RelayClient for ChannelClient {
        async fn post_form(&self, _url: &str, fields: &FieldMap) -> Result<u16, RelayError> {
            let _ = self.0.send(fields.clone());
            Ok(200)
        }
    }

    /// Never answers within the test.
    struct HangingClient(Arc<Mutex<usize>>);

    impl RelayClient for HangingClient {
        async fn post_form(&self, _url: &str, _fields: &FieldMap) -> Result<u16, RelayError> {
            *self.0.lock().unwrap() += 1;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(RelayError::Timeout(Duration::from_secs(10)))
        }
    }

    /// Replays a fixed sequence of receive results, then waits forever.
    struct ScriptedSocket {
        script: Mutex<VecDeque<io::Result<(Vec<u8>, SocketAddr)>>>,
    }

    impl ScriptedSocket {
        fn new(script: Vec<io::Result<(Vec<u8>, SocketAddr)>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    impl DatagramSocket for ScriptedSocket {
        async fn recv_datagram(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok((data, from))) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok((data.len(), from))
                }
                Some(Err(e)) => Err(e),
                None => std::future::pending().await,
            }
        }

        fn local_addr(&self) -> io::Result<SocketAddr> {
            Ok(SocketAddr::from(([127, 0, 0, 1], 12060)))
        }
    }

    async fn send_to(addr: SocketAddr, data: &[u8]) {
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .send_to(data, ("127.0.0.1", addr.port()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let handler = PacketHandler::from_config(Arc::new(ConfigFile::default()), ChannelClient(tx));

        let listener = Listener::bind(Source::ContestLogger, 0, handler).await.unwrap();

        assert_eq!(listener.source(), Source::ContestLogger);
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let taken = std::net::UdpSocket::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handler = PacketHandler::from_config(Arc::new(ConfigFile::default()), ChannelClient(tx));

        let err = Listener::bind(Source::ContestLogger, port, handler)
            .await
            .err()
            .unwrap();

        assert!(err
            .to_string()
            .starts_with(&format!("Failed to bind ContestLogger on port {}", port)));
    }

    #[tokio::test]
    async fn test_receives_and_relays() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = PacketHandler::from_config(Arc::new(ConfigFile::default()), ChannelClient(tx));
        let listener = Listener::bind(Source::DigitalModeDecoder, 0, handler).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = listener.start();

        send_to(addr, br#"{"freq": 14074000, "mode": "FT8"}"#).await;

        let fields = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fields["freq"], "14074000");
        assert_eq!(fields["mode"], "FT8");
        assert_eq!(fields["source"], "DigitalModeDecoder");

        task.abort();
    }

    #[tokio::test]
    async fn test_slow_relay_does_not_block_receive() {
        let started = Arc::new(Mutex::new(0usize));
        let handler = PacketHandler::from_config(
            Arc::new(ConfigFile::default()),
            HangingClient(Arc::clone(&started)),
        );
        let listener = Listener::bind(Source::ContestLogger, 0, handler).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = listener.start();

        for i in 0..5 {
            send_to(addr, format!("<r><n>{i}</n></r>").as_bytes()).await;
        }

        // Every packet reaches the client even though none of the POSTs finish
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while *started.lock().unwrap() < 5 {
            assert!(tokio::time::Instant::now() < deadline, "receive loop stalled");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_recv_error_backs_off_and_recovers() {
        let (logs, _guard) = LogCapture::install();
        let from = SocketAddr::from(([192, 0, 2, 7], 5000));
        let socket = ScriptedSocket::new(vec![
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
            Ok((br#"{"mode": "FT8"}"#.to_vec(), from)),
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = PacketHandler::from_config(Arc::new(ConfigFile::default()), ChannelClient(tx));
        let started = tokio::time::Instant::now();

        let task = Listener::with_socket(Source::DigitalModeDecoder, socket, handler).start();
        let fields = rx.recv().await.unwrap();

        assert_eq!(fields["mode"], "FT8");
        assert!(started.elapsed() >= RECV_ERROR_BACKOFF);
        assert!(!task.is_finished());

        let output = logs.contents();
        assert!(
            output.contains("] WARN DigitalModeDecoder recv error: reset by peer\n"),
            "got {:?}",
            output
        );
        assert!(output.contains("DigitalModeDecoder from 192.0.2.7:5000 -> {\"mode\": \"FT8\"}"));

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_recv_errors_keep_listening() {
        let from = SocketAddr::from(([192, 0, 2, 7], 5000));
        let mut script: Vec<io::Result<(Vec<u8>, SocketAddr)>> = (0..3)
            .map(|_| Err(io::Error::other("transient")))
            .collect();
        script.push(Ok((b"<r><call>K1ABC</call></r>".to_vec(), from)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = PacketHandler::from_config(Arc::new(ConfigFile::default()), ChannelClient(tx));
        let started = tokio::time::Instant::now();

        let task =
            Listener::with_socket(Source::ContestLogger, ScriptedSocket::new(script), handler).start();
        let fields = rx.recv().await.unwrap();

        assert_eq!(fields["call"], "K1ABC");
        assert!(started.elapsed() >= RECV_ERROR_BACKOFF * 3);

        task.abort();
    }
}
