// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server.
//!
//! [`DevServer`] serves a project directory over HTTP, watches it for
//! changes, and pushes reload notifications to connected pages over a
//! WebSocket on the same port.
//!
//! # Components
//!
//! - `http`: request handling and reload-client injection
//! - `livereload`: WebSocket client set and broadcast
//! - `port`: free-port negotiation
//! - `browser`: opening the served URL

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use bliz::EntryDescriptor;
use console::style;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::watcher::FileWatcher;

/// Opening the served URL in a browser.
pub mod browser;
/// HTTP request handling.
pub mod http;
/// Live reload WebSocket server.
pub mod livereload;
/// Port selection.
pub mod port;

pub use http::{inject_reload_script, RequestHandler};
pub use livereload::{ReloadEvent, ReloadNotifier};
pub use port::{select_port, PortSelection, MAX_PORT_ATTEMPTS};

/// Host the development server binds to unless configured otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Errors that stop the development server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding failed for a reason other than the port being taken.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Every candidate port was in use.
    #[error("No free port between {first} and {last}")]
    PortsExhausted {
        /// First port tried.
        first: u16,
        /// Last port tried.
        last: u16,
    },

    /// I/O error while serving.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server task ended abnormally.
    #[error("Server task failed: {0}")]
    Task(String),
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// A development server that has not been started yet.
pub struct DevServer {
    root: PathBuf,
    entry: Option<EntryDescriptor>,
    host: String,
    port: u16,
    watch: bool,
    notifier: ReloadNotifier,
}

impl DevServer {
    /// Creates a server for `root`, serving `entry` at `/` if it is HTML.
    pub fn new(root: impl Into<PathBuf>, entry: Option<EntryDescriptor>) -> Self {
        Self {
            root: root.into(),
            entry,
            host: DEFAULT_HOST.to_string(),
            port: bliz::DEFAULT_PORT,
            watch: true,
            notifier: ReloadNotifier::new(),
        }
    }

    /// Sets the host to bind.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the preferred port. Port 0 lets the OS choose.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables or disables the file watcher.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Handle to this server's reload client set.
    pub fn notifier(&self) -> ReloadNotifier {
        self.notifier.clone()
    }

    /// Binds a port, starts watching, and begins serving in the background.
    ///
    /// # Errors
    ///
    /// Fails if no port can be bound. A watcher that cannot start is logged
    /// and the server runs without live reload.
    pub async fn start(self) -> ServerResult<RunningServer> {
        let selection = select_port(&self.host, self.port)?;
        let requested = selection.requested;
        selection.listener.set_nonblocking(true)?;
        let listener = tokio::net::TcpListener::from_std(selection.listener)?;
        let addr = listener.local_addr()?;

        let watcher = if self.watch {
            let notifier = self.notifier.clone();
            let watched = FileWatcher::new(&self.root, move |events| {
                for event in &events {
                    let clients = notifier.broadcast(event);
                    println!(
                        "{} {} {}",
                        style("Reload:").cyan(),
                        style(event.path()).bold(),
                        style(format!("({} client(s))", clients)).dim()
                    );
                }
            });
            match watched {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!("File watching disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let state = Arc::new(http::AppState {
            handler: RequestHandler::new(self.root, self.entry),
            notifier: self.notifier.clone(),
        });
        let app = http::router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::debug!("Serving on {}", addr);
        Ok(RunningServer {
            addr,
            requested,
            notifier: self.notifier,
            watcher,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a started development server.
pub struct RunningServer {
    addr: SocketAddr,
    requested: u16,
    notifier: ReloadNotifier,
    watcher: Option<FileWatcher>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bound port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Port that was asked for.
    pub fn requested_port(&self) -> u16 {
        self.requested
    }

    /// Whether the server had to fall back to another port.
    pub fn port_substituted(&self) -> bool {
        self.requested != 0 && self.port() != self.requested
    }

    /// URL to open in a browser.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port())
    }

    /// Handle to the reload client set.
    pub fn notifier(&self) -> ReloadNotifier {
        self.notifier.clone()
    }

    /// Whether file watching is active.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Waits until the server stops on its own.
    pub async fn wait(&mut self) -> ServerResult<()> {
        match (&mut self.task).await {
            Ok(result) => result.map_err(ServerError::from),
            Err(e) => Err(ServerError::Task(e.to_string())),
        }
    }

    /// Stops watching, disconnects clients, and stops serving.
    pub async fn shutdown(mut self) -> ServerResult<()> {
        self.watcher.take();
        self.notifier.close_all();
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.wait().await
    }
}
