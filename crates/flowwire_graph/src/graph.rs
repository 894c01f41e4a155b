// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph registry: the single store of nodes, sockets and connections.
//!
//! Lookups never hand back a sentinel: a missing id is a
//! [`GraphError::NotFound`]. Removals cascade so that no connection ever
//! points at a socket the registry no longer holds, and no socket points at
//! a missing node.

use crate::connection::{Connection, ConnectionId};
use crate::geometry::{distance_to_bezier, Point};
use crate::node::{Node, NodeId};
use crate::socket::{Socket, SocketId, SocketKind};
use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Any graph entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// A node
    Node(NodeId),
    /// A socket
    Socket(SocketId),
    /// A connection
    Connection(ConnectionId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{id}"),
            Self::Socket(id) => write!(f, "{id}"),
            Self::Connection(id) => write!(f, "{id}"),
        }
    }
}

impl From<NodeId> for ElementId {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<SocketId> for ElementId {
    fn from(id: SocketId) -> Self {
        Self::Socket(id)
    }
}

impl From<ConnectionId> for ElementId {
    fn from(id: ConnectionId) -> Self {
        Self::Connection(id)
    }
}

/// Errors reported by graph operations. A failed operation leaves the graph
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No entity with this id
    #[error("Not found: {0}")]
    NotFound(ElementId),

    /// An entity with this id is already registered
    #[error("Duplicate id: {0}")]
    DuplicateId(Uuid),

    /// Operation applied to the wrong kind of socket, or a binding that
    /// would not run output -> input
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Bound connections form a cycle
    #[error("Graph contains a cycle")]
    Cycle,
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTarget(reason.into())
    }
}

/// A dataflow graph
#[derive(Debug)]
pub struct Graph {
    /// Graph name
    pub name: String,
    nodes: IndexMap<NodeId, Node>,
    sockets: IndexMap<SocketId, Socket>,
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            sockets: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Whether any entity uses this raw id
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.nodes.contains_key(&NodeId(id))
            || self.sockets.contains_key(&SocketId(id))
            || self.connections.contains_key(&ConnectionId(id))
    }

    fn ensure_unique(&self, id: Uuid) -> Result<()> {
        if self.contains_id(id) {
            return Err(GraphError::DuplicateId(id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Register a node
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        self.ensure_unique(node.id.0)?;
        if node.all_socket_ids().next().is_some() {
            return Err(GraphError::invalid("node must be registered before its sockets"));
        }
        let id = node.id;
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Register a detached socket. Use
    /// [`attach_socket`](Graph::attach_socket) to give it an owner.
    pub fn add_socket(&mut self, socket: Socket) -> Result<SocketId> {
        self.ensure_unique(socket.id.0)?;
        Self::ensure_compute_on_output(&socket)?;
        if socket.node_id.is_some() {
            return Err(GraphError::invalid("socket already claims an owning node"));
        }
        if socket.is_connected() {
            return Err(GraphError::invalid("socket must be registered without connections"));
        }
        let id = socket.id;
        self.sockets.insert(id, socket);
        Ok(id)
    }

    pub(crate) fn insert_socket(&mut self, socket: Socket) -> Result<SocketId> {
        self.ensure_unique(socket.id.0)?;
        Self::ensure_compute_on_output(&socket)?;
        let id = socket.id;
        self.sockets.insert(id, socket);
        Ok(id)
    }

    fn ensure_compute_on_output(socket: &Socket) -> Result<()> {
        if socket.is_input() && socket.compute().is_some() {
            return Err(GraphError::invalid(format!(
                "compute strategies belong on output sockets, {} is an input",
                socket.id
            )));
        }
        Ok(())
    }

    /// Register an unbound connection. Ends are bound with
    /// [`bind_end`](Graph::bind_end).
    pub fn add_connection(&mut self, connection: Connection) -> Result<ConnectionId> {
        self.ensure_unique(connection.id.0)?;
        if connection.sockets().next().is_some() {
            return Err(GraphError::invalid("connection must be registered unbound"));
        }
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&node_id)
            .ok_or(GraphError::NotFound(node_id.into()))
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NotFound(node_id.into()))
    }

    /// Get a socket by ID
    pub fn socket(&self, socket_id: SocketId) -> Result<&Socket> {
        self.sockets
            .get(&socket_id)
            .ok_or(GraphError::NotFound(socket_id.into()))
    }

    pub(crate) fn socket_mut(&mut self, socket_id: SocketId) -> Result<&mut Socket> {
        self.sockets
            .get_mut(&socket_id)
            .ok_or(GraphError::NotFound(socket_id.into()))
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Result<&Connection> {
        self.connections
            .get(&connection_id)
            .ok_or(GraphError::NotFound(connection_id.into()))
    }

    pub(crate) fn connection_mut(&mut self, connection_id: ConnectionId) -> Result<&mut Connection> {
        self.connections
            .get_mut(&connection_id)
            .ok_or(GraphError::NotFound(connection_id.into()))
    }

    /// The node owning a socket
    pub fn socket_owner(&self, socket_id: SocketId) -> Result<&Node> {
        let socket = self.socket(socket_id)?;
        let node_id = socket
            .node_id
            .ok_or_else(|| GraphError::invalid(format!("{socket_id} is not attached to a node")))?;
        self.node(node_id)
    }

    /// Find a socket on a node by name
    pub fn socket_by_name(&self, node_id: NodeId, name: &str) -> Result<&Socket> {
        self.node(node_id)?
            .all_socket_ids()
            .filter_map(|id| self.sockets.get(&id))
            .find(|s| s.name == name)
            .ok_or_else(|| GraphError::invalid(format!("{node_id} has no socket named {name:?}")))
    }

    /// Sockets of one polarity on a node, in index order
    pub fn node_sockets(
        &self,
        node_id: NodeId,
        kind: SocketKind,
    ) -> Result<impl Iterator<Item = &Socket> + '_> {
        let node = self.node(node_id)?;
        Ok(node
            .socket_ids(kind)
            .iter()
            .filter_map(move |id| self.sockets.get(id)))
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get all sockets in insertion order
    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.sockets.values()
    }

    /// Get all connections in insertion order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections attached to a socket
    pub fn connections_for_socket(
        &self,
        socket_id: SocketId,
    ) -> impl Iterator<Item = &Connection> {
        self.connections
            .values()
            .filter(move |c| c.involves_socket(socket_id))
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of sockets
    pub fn socket_count(&self) -> usize {
        self.sockets.len()
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove a node together with its sockets and every connection touching
    /// them
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node> {
        let socket_ids: Vec<_> = self.node(node_id)?.all_socket_ids().collect();
        for socket_id in socket_ids {
            self.remove_socket(socket_id)?;
        }
        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(GraphError::NotFound(node_id.into()))?;
        tracing::info!(node = %node_id, name = %node.name, "removed node");
        Ok(node)
    }

    /// Remove a socket and every connection touching it, detaching it from
    /// its node
    pub fn remove_socket(&mut self, socket_id: SocketId) -> Result<Socket> {
        let socket = self.socket(socket_id)?;
        let connection_ids = socket.connection_ids().to_vec();
        let owner = socket.node_id;

        for connection_id in connection_ids {
            self.remove_connection(connection_id)?;
        }

        if let Some(node_id) = owner {
            let node = self.node_mut(node_id)?;
            if let Some((kind, _)) = node.remove_socket(socket_id) {
                let siblings = node.socket_ids(kind).to_vec();
                for (index, sibling) in siblings.into_iter().enumerate() {
                    if let Some(s) = self.sockets.get_mut(&sibling) {
                        s.index = index;
                    }
                }
            }
        }

        let socket = self
            .sockets
            .shift_remove(&socket_id)
            .ok_or(GraphError::NotFound(socket_id.into()))?;
        tracing::debug!(socket = %socket_id, name = %socket.name, "removed socket");
        Ok(socket)
    }

    /// Unbind both ends of a connection and delete it
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Result<Connection> {
        let connection = self
            .connections
            .shift_remove(&connection_id)
            .ok_or(GraphError::NotFound(connection_id.into()))?;
        for socket_id in connection.sockets() {
            if let Some(socket) = self.sockets.get_mut(&socket_id) {
                socket.detach_connection(connection_id);
            }
        }
        tracing::debug!(connection = %connection_id, "removed connection");
        Ok(connection)
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sockets.clear();
        self.connections.clear();
    }

    // ------------------------------------------------------------------
    // Layout queries
    // ------------------------------------------------------------------

    /// Current position of a socket, derived from its node
    pub fn socket_position(&self, socket_id: SocketId) -> Result<Point> {
        let socket = self.socket(socket_id)?;
        let node = self.socket_owner(socket_id)?;
        Ok(node.computed_position(socket))
    }

    /// Box hit test of radius `socket_radius` around the socket's position
    pub fn is_point_inside_socket(&self, socket_id: SocketId, x: f32, y: f32) -> Result<bool> {
        let socket = self.socket(socket_id)?;
        let node = self.socket_owner(socket_id)?;
        Ok(node.is_point_inside_socket(socket, x, y))
    }

    /// Hit test against a node's body including the socket margin
    pub fn is_point_inside_node(&self, node_id: NodeId, x: f32, y: f32) -> Result<bool> {
        Ok(self.node(node_id)?.is_point_inside(x, y))
    }

    /// Topmost (most recently added) node under the point
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        self.nodes
            .values()
            .rev()
            .find(|n| n.is_point_inside(x, y))
            .map(|n| n.id)
    }

    /// Socket under the point, searching the topmost nodes first
    pub fn socket_at(&self, x: f32, y: f32) -> Option<SocketId> {
        self.nodes.values().rev().find_map(|node| {
            node.all_socket_ids().find(|id| {
                self.sockets
                    .get(id)
                    .is_some_and(|s| node.is_point_inside_socket(s, x, y))
            })
        })
    }

    /// Complete connection whose curve passes within `tolerance` of the point
    pub fn connection_at(&self, x: f32, y: f32, tolerance: f32) -> Option<ConnectionId> {
        let p = Point::new(x, y);
        self.connections
            .values()
            .filter_map(|c| {
                let (output, input) = c.endpoints()?;
                let from = self.socket_position(output).ok()?;
                let to = self.socket_position(input).ok()?;
                Some((c.id, distance_to_bezier(from, to, p)))
            })
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Curve endpoints for drawing a connection, `(source, target)` running
    /// output -> input. A half-bound connection's free end is `pointer`.
    pub fn connection_endpoints(
        &self,
        connection_id: ConnectionId,
        pointer: Option<Point>,
    ) -> Result<(Point, Point)> {
        let connection = self.connection(connection_id)?;
        let resolve = |end: Option<SocketId>| -> Result<Point> {
            match end {
                Some(id) => self.socket_position(id),
                None => pointer.ok_or_else(|| {
                    GraphError::invalid(format!("{connection_id} has an unbound end and no pointer"))
                }),
            }
        };
        Ok((resolve(connection.output_socket)?, resolve(connection.input_socket)?))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
