// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Live reload notifications over WebSocket.
//!
//! The [`ReloadNotifier`] owns the set of connected clients for one server
//! instance. Each WebSocket connection registers itself on upgrade and
//! removes itself when the socket closes; broadcasts only ever read the set.
//!
//! # Protocol
//!
//! Server to client only, one JSON text frame per change:
//!
//! ```json
//! { "type": "reload", "path": "/src/app.js" }
//! ```

use axum::extract::ws::{Message, WebSocket};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifier of a connected reload client.
pub type ClientId = u64;

/// A change notification pushed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadEvent {
    /// A file changed; the page should reload.
    Reload {
        /// Project-relative path with a leading slash and `/` separators.
        path: String,
    },
}

impl ReloadEvent {
    /// Builds a reload event for a path relative to the watched root.
    ///
    /// Separators are normalised to `/` and a leading `/` is added.
    pub fn for_relative_path(relative: &Path) -> Self {
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        ReloadEvent::Reload {
            path: format!("/{}", segments.join("/")),
        }
    }

    /// The changed path carried by this event.
    pub fn path(&self) -> &str {
        match self {
            ReloadEvent::Reload { path } => path,
        }
    }
}

/// Connected live-reload clients of one server instance.
///
/// Cloning yields another handle to the same client set.
#[derive(Clone, Default)]
pub struct ReloadNotifier {
    inner: Arc<NotifierInner>,
}

#[derive(Default)]
struct NotifierInner {
    clients: Mutex<HashMap<ClientId, mpsc::UnboundedSender<String>>>,
    next_id: AtomicU64,
}

impl ReloadNotifier {
    /// Creates an empty client set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client and returns its id and message receiver.
    pub fn connect(&self) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.clients.lock().insert(id, tx);
        tracing::debug!("Reload client {} connected", id);
        (id, rx)
    }

    /// Removes a client. Called when its connection closes.
    pub fn disconnect(&self, id: ClientId) {
        if self.inner.clients.lock().remove(&id).is_some() {
            tracing::debug!("Reload client {} disconnected", id);
        }
    }

    /// Sends `event` to every client whose connection is still open.
    ///
    /// Delivery is best-effort and at most once. Clients that have gone away
    /// are skipped but left in the set; their connection handler removes them.
    /// Returns the number of clients the event was handed to.
    pub fn broadcast(&self, event: &ReloadEvent) -> usize {
        let message = match serde_json::to_string(event) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to serialize reload event: {}", e);
                return 0;
            }
        };

        let clients = self.inner.clients.lock();
        let delivered = clients
            .values()
            .filter(|tx| !tx.is_closed())
            .filter(|tx| tx.send(message.clone()).is_ok())
            .count();
        tracing::debug!("Broadcast {} to {} client(s)", event.path(), delivered);
        delivered
    }

    /// Number of registered clients.
    pub fn client_count(&self) -> usize {
        self.inner.clients.lock().len()
    }

    /// Drops every client. Their connections close on the next poll.
    pub fn close_all(&self) {
        self.inner.clients.lock().clear();
    }
}

/// Drives one live-reload WebSocket until either side closes it.
pub async fn handle_websocket(mut socket: WebSocket, notifier: ReloadNotifier) {
    let (id, mut rx) = notifier.connect();

    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                match outgoing {
                    Some(message) => {
                        if socket.send(Message::Text(message)).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        // Server is shutting down
                        let _ = socket.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    notifier.disconnect(id);
}
