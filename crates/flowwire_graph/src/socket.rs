// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use crate::compute::Compute;
use crate::connection::ConnectionId;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

impl SocketId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "socket:{}", self.0)
    }
}

/// Socket polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketKind {
    /// Consumes a value; holds at most one connection
    Input,
    /// Produces a value; holds any number of connections
    Output,
}

impl SocketKind {
    /// The opposite polarity
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

impl fmt::Display for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Value carried by a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Floating point number
    Float(f64),
    /// Integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Opaque text payload
    Text(String),
}

impl SocketValue {
    /// Numeric view of the value. Text is not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(_) => None,
        }
    }
}

impl Default for SocketValue {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl From<f64> for SocketValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for SocketValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for SocketValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for SocketValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl fmt::Display for SocketValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Declaration of a socket to attach to a node
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Socket name, unique among the node's sockets by convention
    pub name: String,
    /// Display label
    pub label: String,
    /// Polarity
    pub kind: SocketKind,
    /// Initial value
    pub value: SocketValue,
    /// Compute strategy (outputs only)
    pub compute: Option<Compute>,
}

impl SocketConfig {
    /// Declare an input socket
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, SocketKind::Input)
    }

    /// Declare an output socket
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, SocketKind::Output)
    }

    fn new(name: impl Into<String>, kind: SocketKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            value: SocketValue::default(),
            compute: None,
        }
    }

    /// Set the initial value
    pub fn with_value(mut self, value: impl Into<SocketValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the compute strategy
    pub fn with_compute(mut self, compute: Compute) -> Self {
        self.compute = Some(compute);
        self
    }
}

/// A socket on a node
#[derive(Debug, Clone)]
pub struct Socket {
    /// Unique socket ID
    pub id: SocketId,
    pub(crate) node_id: Option<NodeId>,
    /// Socket name
    pub name: String,
    /// Display label
    pub label: String,
    /// Polarity
    pub kind: SocketKind,
    pub(crate) index: usize,
    /// Current value
    pub value: SocketValue,
    compute: Option<Compute>,
    connection_ids: Vec<ConnectionId>,
}

impl Socket {
    /// Create a detached socket from a declaration.
    ///
    /// The compute strategy is dropped for input sockets; use
    /// [`Graph::set_compute`](crate::Graph::set_compute) to get an error
    /// instead.
    pub fn new(config: SocketConfig) -> Self {
        Self {
            id: SocketId::new(),
            node_id: None,
            name: config.name,
            label: config.label,
            kind: config.kind,
            index: 0,
            value: config.value,
            compute: config.compute,
            connection_ids: Vec::new(),
        }
    }

    /// Owning node. Set only by [`Graph::attach_socket`](crate::Graph::attach_socket).
    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    /// Position among same-kind siblings
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this is an input socket
    pub fn is_input(&self) -> bool {
        self.kind == SocketKind::Input
    }

    /// Whether this is an output socket
    pub fn is_output(&self) -> bool {
        self.kind == SocketKind::Output
    }

    /// Connections attached to this socket, in creation order
    pub fn connection_ids(&self) -> &[ConnectionId] {
        &self.connection_ids
    }

    /// Whether any connection is attached
    pub fn is_connected(&self) -> bool {
        !self.connection_ids.is_empty()
    }

    /// Compute strategy, if any
    pub fn compute(&self) -> Option<&Compute> {
        self.compute.as_ref()
    }

    pub(crate) fn set_compute(&mut self, compute: Compute) {
        self.compute = Some(compute);
    }

    /// Record a connection on this socket. Inputs keep a single slot.
    pub(crate) fn attach_connection(&mut self, id: ConnectionId) {
        match self.kind {
            SocketKind::Input => {
                self.connection_ids.clear();
                self.connection_ids.push(id);
            }
            SocketKind::Output => {
                if !self.connection_ids.contains(&id) {
                    self.connection_ids.push(id);
                }
            }
        }
    }

    pub(crate) fn detach_connection(&mut self, id: ConnectionId) {
        self.connection_ids.retain(|c| *c != id);
    }
}
