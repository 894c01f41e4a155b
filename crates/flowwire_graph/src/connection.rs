// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::socket::{SocketId, SocketKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection:{}", self.0)
    }
}

/// How many ends of a connection are bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Neither end bound
    Empty,
    /// Exactly one end bound; the other follows the pointer
    HalfBound,
    /// Both ends bound; values flow output -> input
    Bound,
}

/// A link between at most one output socket and at most one input socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    pub(crate) input_socket: Option<SocketId>,
    pub(crate) output_socket: Option<SocketId>,
}

impl Connection {
    /// Create an unbound connection
    pub fn new() -> Self {
        Self {
            id: ConnectionId::new(),
            input_socket: None,
            output_socket: None,
        }
    }

    /// Consuming end
    pub fn input_socket(&self) -> Option<SocketId> {
        self.input_socket
    }

    /// Producing end
    pub fn output_socket(&self) -> Option<SocketId> {
        self.output_socket
    }

    /// End of the given polarity
    pub fn end(&self, kind: SocketKind) -> Option<SocketId> {
        match kind {
            SocketKind::Input => self.input_socket,
            SocketKind::Output => self.output_socket,
        }
    }

    pub(crate) fn end_mut(&mut self, kind: SocketKind) -> &mut Option<SocketId> {
        match kind {
            SocketKind::Input => &mut self.input_socket,
            SocketKind::Output => &mut self.output_socket,
        }
    }

    /// Current binding state
    pub fn state(&self) -> ConnectionState {
        match (self.input_socket, self.output_socket) {
            (Some(_), Some(_)) => ConnectionState::Bound,
            (None, None) => ConnectionState::Empty,
            _ => ConnectionState::HalfBound,
        }
    }

    /// Whether both ends are bound
    pub fn is_complete(&self) -> bool {
        self.state() == ConnectionState::Bound
    }

    /// `(output, input)` when complete
    pub fn endpoints(&self) -> Option<(SocketId, SocketId)> {
        Some((self.output_socket?, self.input_socket?))
    }

    /// The only bound end of a half-bound connection
    pub fn bound_end(&self) -> Option<SocketId> {
        match (self.input_socket, self.output_socket) {
            (Some(s), None) | (None, Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Check if this connection involves a specific socket
    pub fn involves_socket(&self, socket_id: SocketId) -> bool {
        self.input_socket == Some(socket_id) || self.output_socket == Some(socket_id)
    }

    /// Bound ends, output first
    pub fn sockets(&self) -> impl Iterator<Item = SocketId> {
        self.output_socket.into_iter().chain(self.input_socket)
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}
