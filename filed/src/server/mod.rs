//! Listener, acceptor & per-connection sessions
// (c) 2024 Ross Younger

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context as _;
use human_repr::HumanCount as _;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::OwnedSemaphorePermit;
use tracing::{Instrument as _, debug, error, info, info_span, warn};

use crate::config::Configuration;
use crate::util::ServerRoot;

mod connection_id;
pub use connection_id::{ConnectionId, ConnectionIdAllocator};
mod limit;
use limit::ConnectionLimit;
mod session;
use session::handle_session;

/// Length of the queue of pending connections we ask the OS for
pub const LISTEN_BACKLOG: u32 = 1024;

/// How long to pause after a failed accept before trying again
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A bound, listening file server.
///
/// Each accepted connection is handed to its own tokio task, which runs the request/reply
/// loop until the client goes away. The acceptor never waits on client I/O.
/// Sessions share nothing but the [`ServerRoot`] (read-only) and the [`ConnectionIdAllocator`].
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    root: ServerRoot,
    ids: ConnectionIdAllocator,
    limit: ConnectionLimit,
}

impl Server {
    /// Binds and listens on `address`.
    ///
    /// `max_connections` caps the number of concurrent sessions; 0 means unlimited.
    ///
    /// This must be called from within a tokio runtime.
    pub fn bind(
        address: SocketAddr,
        root: ServerRoot,
        max_connections: u32,
    ) -> anyhow::Result<Self> {
        let socket = match address {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .context("socket creation failed")?;
        #[cfg(unix)]
        socket.set_reuseaddr(true)?;
        socket
            .bind(address)
            .with_context(|| format!("bind to {address} failed"))?;
        let listener = socket
            .listen(LISTEN_BACKLOG)
            .with_context(|| format!("listen on {address} failed"))?;
        Ok(Self {
            listener,
            root,
            ids: ConnectionIdAllocator::new(),
            limit: ConnectionLimit::new(max_connections),
        })
    }

    /// Binds and listens as directed by a [`Configuration`]
    pub fn from_config(config: &Configuration) -> anyhow::Result<Self> {
        let root = ServerRoot::from_config(&config.root)?;
        Self::bind(
            SocketAddr::new(config.address, config.port),
            root,
            config.max_connections,
        )
    }

    /// The address we are actually listening on.
    /// (Useful when binding to port 0.)
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accessor
    #[must_use]
    pub fn root(&self) -> &ServerRoot {
        &self.root
    }

    /// Accepts connections forever
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Sessions already running are not waited for; they carry on until the runtime is shut down.
    ///
    /// A failure to accept one connection is logged, and does not stop the server.
    pub async fn run_until<F: Future<Output = ()>>(self, shutdown: F) {
        tokio::pin!(shutdown);
        loop {
            let permit = tokio::select! {
                () = &mut shutdown => break,
                p = self.limit.acquire() => p,
            };
            let accepted = tokio::select! {
                () = &mut shutdown => break,
                r = self.listener.accept() => r,
            };
            match accepted {
                Ok((stream, peer)) => {
                    let id = self.ids.allocate();
                    self.spawn_session(id, stream, peer, permit);
                }
                Err(e) => {
                    error!("accept failed: {e}");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
        info!("no longer accepting connections");
    }

    fn spawn_session(
        &self,
        id: ConnectionId,
        stream: TcpStream,
        peer: SocketAddr,
        permit: Option<OwnedSemaphorePermit>,
    ) {
        let root = self.root.clone();
        let span = info_span!("session", conn = %id, %peer);
        let _j = tokio::spawn(
            async move {
                info!("client connected");
                let (recv, send) = stream.into_split();
                match handle_session(recv, send, &root).await {
                    Ok(summary) => info!(
                        "client disconnected after {} request(s): {} file(s) sent ({}), {} not found",
                        summary.requests,
                        summary.files_sent,
                        summary.bytes_sent.human_count_bytes(),
                        summary.not_found,
                    ),
                    Err(e) => warn!("session ended: {e:#}"),
                }
                drop(permit);
                debug!("session closed");
            }
            .instrument(span),
        );
    }
}

/// Completes when the process is asked to stop (Ctrl-C)
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("unable to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("interrupted");
}

/// Server main loop: bind, then accept until interrupted
pub(crate) async fn server_main(config: &Configuration) -> anyhow::Result<()> {
    let server = Server::from_config(config)?;
    info!(
        "Server is ready and waiting for a client to connect on {} (serving files from {})",
        server.local_addr()?,
        server.root().path().display()
    );
    server.run_until(shutdown_signal()).await;
    Ok(())
}
