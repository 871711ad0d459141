// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Port negotiation.
//!
//! Starting at the requested port, each candidate is bound in turn. The
//! first successful bind wins and its listener is kept, so the port cannot
//! be taken by someone else between probing and serving.

use super::{ServerError, ServerResult};
use std::io::ErrorKind;
use std::net::TcpListener;

/// Ports tried, starting with the requested one, before giving up.
pub const MAX_PORT_ATTEMPTS: u16 = 20;

/// A bound listener and the port it ended up on.
#[derive(Debug)]
pub struct PortSelection {
    /// Listener bound to the selected port.
    pub listener: TcpListener,
    /// Port the caller asked for.
    pub requested: u16,
    /// Port actually bound.
    pub port: u16,
}

impl PortSelection {
    /// Whether a different port than the requested one was selected.
    pub fn substituted(&self) -> bool {
        self.requested != 0 && self.port != self.requested
    }
}

/// Binds the first free port in `requested..requested + MAX_PORT_ATTEMPTS`.
///
/// A port that is already in use moves on to the next candidate. Any other
/// bind failure (permissions, bad host) is returned immediately.
/// Requesting port 0 lets the operating system choose.
pub fn select_port(host: &str, requested: u16) -> ServerResult<PortSelection> {
    let mut last_tried = requested;

    for offset in 0..MAX_PORT_ATTEMPTS {
        let Some(port) = requested.checked_add(offset) else {
            break;
        };
        last_tried = port;

        match TcpListener::bind((host, port)) {
            Ok(listener) => {
                let port = listener.local_addr()?.port();
                return Ok(PortSelection {
                    listener,
                    requested,
                    port,
                });
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                tracing::debug!("Port {} is in use, trying the next one", port);
            }
            Err(source) => {
                return Err(ServerError::Bind {
                    addr: format!("{}:{}", host, port),
                    source,
                });
            }
        }
    }

    Err(ServerError::PortsExhausted {
        first: requested,
        last: last_tried,
    })
}
