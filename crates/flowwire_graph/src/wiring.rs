// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wiring: building nodes and binding sockets to connections.
//!
//! These are the only mutation entry points that produce a valid graph.
//! Every operation checks all of its preconditions before touching the
//! registry, so an error never leaves a half-applied change behind.
//!
//! A connection's polarity is taken from the kind of the socket being bound,
//! never from call order: binding an input socket fills the connection's
//! input end, binding an output socket fills its output end, and either may
//! come first.

use crate::compute::Compute;
use crate::connection::{Connection, ConnectionId};
use crate::geometry::Point;
use crate::graph::{Graph, GraphError, Result};
use crate::node::{Node, NodeConfig, NodeId};
use crate::socket::{Socket, SocketConfig, SocketId, SocketKind, SocketValue};

impl Graph {
    /// Create an empty node and register it
    pub fn create_node(&mut self, config: NodeConfig) -> Result<NodeId> {
        let node = Node::new(config);
        let id = self.add_node(node)?;
        tracing::debug!(node = %id, "created node");
        Ok(id)
    }

    /// Create a socket from `config` and attach it to a node.
    ///
    /// The socket's index is the number of same-kind sockets the node
    /// already has. The node's height is recomputed.
    pub fn attach_socket(&mut self, node_id: NodeId, config: SocketConfig) -> Result<SocketId> {
        if config.kind == SocketKind::Input && config.compute.is_some() {
            return Err(GraphError::invalid(format!(
                "compute strategies belong on output sockets, {:?} is an input",
                config.name
            )));
        }
        let index = self.node(node_id)?.socket_ids(config.kind).len();
        let mut socket = Socket::new(config);
        socket.node_id = Some(node_id);
        socket.index = index;
        let kind = socket.kind;
        let id = self.insert_socket(socket)?;
        self.node_mut(node_id)?.push_socket(kind, id);
        tracing::debug!(node = %node_id, socket = %id, %kind, index, "attached socket");
        Ok(id)
    }

    /// Set the compute strategy of an output socket
    pub fn set_compute(&mut self, socket_id: SocketId, compute: Compute) -> Result<()> {
        let socket = self.socket_mut(socket_id)?;
        if socket.kind != SocketKind::Output {
            return Err(GraphError::invalid(format!(
                "compute strategies belong on output sockets, {socket_id} is an input"
            )));
        }
        socket.set_compute(compute);
        Ok(())
    }

    /// Overwrite a socket's value. Nothing is recomputed; see
    /// [`recompute_node`](Graph::recompute_node).
    pub fn set_value(&mut self, socket_id: SocketId, value: impl Into<SocketValue>) -> Result<()> {
        self.socket_mut(socket_id)?.value = value.into();
        Ok(())
    }

    /// Create and register an unbound connection
    pub fn create_connection(&mut self) -> Result<ConnectionId> {
        self.add_connection(Connection::new())
    }

    /// Bind one end of a connection to a socket.
    ///
    /// Binding an input socket that already holds another connection removes
    /// that connection first. If this call completes the connection, the
    /// producer's value is propagated into the consumer's node.
    pub fn bind_end(&mut self, connection_id: ConnectionId, socket_id: SocketId) -> Result<()> {
        let connection = self.connection(connection_id)?;
        let socket = self.socket(socket_id)?;
        let kind = socket.kind;

        if socket.node_id.is_none() {
            return Err(GraphError::invalid(format!("{socket_id} is not attached to a node")));
        }
        match connection.end(kind) {
            Some(bound) if bound == socket_id => return Ok(()),
            Some(bound) => {
                return Err(GraphError::invalid(format!(
                    "{connection_id} already has {kind} end {bound}; both ends would be {kind}s"
                )));
            }
            None => {}
        }

        let evicted: Vec<ConnectionId> = match kind {
            SocketKind::Input => socket
                .connection_ids()
                .iter()
                .copied()
                .filter(|c| *c != connection_id)
                .collect(),
            SocketKind::Output => Vec::new(),
        };
        for previous in evicted {
            self.remove_connection(previous)?;
            tracing::info!(connection = %previous, socket = %socket_id, "evicted connection from input");
        }

        *self.connection_mut(connection_id)?.end_mut(kind) = Some(socket_id);
        self.socket_mut(socket_id)?.attach_connection(connection_id);
        tracing::debug!(connection = %connection_id, socket = %socket_id, %kind, "bound connection end");

        if self.connection(connection_id)?.is_complete() {
            self.propagate(connection_id)?;
        }
        Ok(())
    }

    /// Clear the end of a connection bound to `socket_id`.
    ///
    /// A half-bound connection stays registered and the caller decides
    /// whether to rebind or remove it. Clearing the last bound end removes
    /// the connection.
    pub fn unbind_end(&mut self, connection_id: ConnectionId, socket_id: SocketId) -> Result<()> {
        let kind = self.socket(socket_id)?.kind;
        let connection = self.connection_mut(connection_id)?;
        let end = connection.end_mut(kind);
        if *end != Some(socket_id) {
            return Err(GraphError::invalid(format!(
                "{socket_id} is not bound to {connection_id}"
            )));
        }
        *end = None;
        let emptied = connection.bound_end().is_none();
        self.socket_mut(socket_id)?.detach_connection(connection_id);
        tracing::debug!(connection = %connection_id, socket = %socket_id, "unbound connection end");
        if emptied {
            self.remove_connection(connection_id)?;
        }
        Ok(())
    }

    /// Create a complete connection from `output` to `input`.
    ///
    /// Both sockets are checked before anything is created, so a polarity
    /// error leaves no stray connection behind.
    pub fn connect(&mut self, output: SocketId, input: SocketId) -> Result<ConnectionId> {
        for (socket_id, expected) in [(output, SocketKind::Output), (input, SocketKind::Input)] {
            let socket = self.socket(socket_id)?;
            if socket.kind != expected {
                return Err(GraphError::invalid(format!(
                    "expected {expected} socket, {socket_id} is an {}",
                    socket.kind
                )));
            }
            if socket.node_id.is_none() {
                return Err(GraphError::invalid(format!("{socket_id} is not attached to a node")));
            }
        }

        let connection_id = self.create_connection()?;
        self.bind_end(connection_id, output)?;
        self.bind_end(connection_id, input)?;
        Ok(connection_id)
    }

    /// Remove a connection; alias of [`remove_connection`](Graph::remove_connection)
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Result<Connection> {
        self.remove_connection(connection_id)
    }

    /// Move a node's top-left corner. Socket positions follow.
    pub fn move_node(&mut self, node_id: NodeId, x: f32, y: f32) -> Result<()> {
        self.node_mut(node_id)?.position = Point::new(x, y);
        Ok(())
    }

    /// Move a node by an offset
    pub fn translate_node(&mut self, node_id: NodeId, dx: f32, dy: f32) -> Result<()> {
        let node = self.node_mut(node_id)?;
        node.position = Point::new(node.position.x + dx, node.position.y + dy);
        Ok(())
    }
}
