//! Connection acceptor.
//!
//! One listening socket, one accept loop, one thread per serviced connection.
//! The loop never waits for a session: it hands each connection a fresh tree,
//! registers the tree with the viewer, and goes back to accepting.

use crate::model::ServerError;
use crate::session::Session;
use crate::source::TcpSource;
use crate::tree::shared_tree;
use crate::view::Viewer;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Settings applied to every accepted connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Read timeout for session sockets; `None` blocks forever.
    pub read_timeout: Option<Duration>,
}

/// A bound listener plus the viewer that receives new trees.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: ServerConfig,
    viewer: Mutex<Option<Arc<dyn Viewer>>>,
    parked: Mutex<Vec<TcpStream>>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .field("config", &self.config)
            .field("has_viewer", &lock(&self.viewer).is_some())
            .field("parked", &lock(&self.parked).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Server {
    /// Bind with the default [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound, or
    /// [`ServerError::LocalAddr`] if the bound address cannot be read back.
    pub fn bind(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<Self, ServerError> {
        Self::with_config(addr, ServerConfig::default())
    }

    /// Bind `addr` and apply `config` to every accepted connection.
    ///
    /// # Errors
    ///
    /// Same as [`Server::bind`].
    pub fn with_config(
        addr: impl ToSocketAddrs + std::fmt::Display,
        config: ServerConfig,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&addr).map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        info!(%local_addr, "Listening");

        Ok(Self {
            listener,
            local_addr,
            config,
            viewer: Mutex::new(None),
            parked: Mutex::new(Vec::new()),
        })
    }

    /// The bound address, with the real port when bound to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Per-connection settings.
    pub fn config(&self) -> ServerConfig {
        self.config
    }

    /// Register new trees with `viewer` from now on.
    ///
    /// Connections parked earlier stay parked.
    pub fn set_viewer(&self, viewer: Arc<dyn Viewer>) {
        *lock(&self.viewer) = Some(viewer);
    }

    /// Drop the viewer; later connections are parked.
    pub fn clear_viewer(&self) {
        *lock(&self.viewer) = None;
    }

    /// True when a viewer is set.
    pub fn has_viewer(&self) -> bool {
        lock(&self.viewer).is_some()
    }

    /// Connections accepted while no viewer was set.
    ///
    /// They are held open and never read.
    pub fn parked_connections(&self) -> usize {
        lock(&self.parked).len()
    }

    /// Accept connections until accepting fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] on the first accept failure. Sessions
    /// already running are not affected.
    pub fn run(&self) -> Result<(), ServerError> {
        loop {
            let (stream, peer) = self.listener.accept().map_err(|source| {
                error!(addr = %self.local_addr, %source, "Accept failed");
                ServerError::Accept {
                    addr: self.local_addr,
                    source,
                }
            })?;
            self.handle_connection(stream, peer);
        }
    }

    fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) {
        info!(%peer, "Connection accepted");

        let Some(viewer) = lock(&self.viewer).clone() else {
            warn!(%peer, "No viewer registered, parking connection");
            lock(&self.parked).push(stream);
            return;
        };

        let source = TcpSource::new(stream, peer);
        if let Err(err) = source.set_read_timeout(self.config.read_timeout) {
            warn!(%peer, %err, "Could not set read timeout");
        }

        let (writer, handle) = shared_tree();
        viewer.register(&peer.to_string(), handle);

        let spawned = thread::Builder::new()
            .name(format!("session-{peer}"))
            .spawn(move || {
                let report = Session::new(source, writer).run();
                info!(
                    peer = %report.peer,
                    end = ?report.end,
                    lines = report.stats.lines_read,
                    "Session finished"
                );
            });

        if let Err(err) = spawned {
            error!(%peer, %err, "Could not start session thread");
        }
    }
}
