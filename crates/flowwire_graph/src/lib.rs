// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataflow graph engine for the flowwire node editor.
//!
//! Nodes own input and output sockets; connections run from an output socket
//! to an input socket and carry the output's value across. The crate keeps
//! that model consistent while it is edited:
//! - an input socket holds at most one connection, and wiring a new one
//!   evicts the old
//! - an output socket fans out to any number of connections
//! - connections may exist half-bound while being dragged
//! - completing a connection propagates its value one hop downstream
//!
//! ## Architecture
//!
//! [`Graph`] is the single registry of nodes, sockets and connections and is
//! passed explicitly to everything that reads or edits it. Wiring and
//! propagation are methods on it; [`Interaction`] turns pointer events into
//! wiring calls; [`geometry`] holds the pure hit-testing and curve helpers
//! the rendering side needs.

pub mod compute;
pub mod connection;
pub mod evaluation;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod shared;
pub mod socket;
pub mod templates;
pub mod wiring;

pub use compute::{Compute, ComputeStrategy};
pub use connection::{Connection, ConnectionId, ConnectionState};
pub use geometry::{bezier_control_points, Point, Rect};
pub use graph::{ElementId, Graph, GraphError, Result};
pub use interaction::{Interaction, InteractionEvent, InteractionMode};
pub use layout::NodeLayout;
pub use node::{Node, NodeConfig, NodeId};
pub use shared::SharedGraph;
pub use socket::{Socket, SocketConfig, SocketId, SocketKind, SocketValue};
pub use templates::{create_math_registry, NodeRegistry, NodeTemplate};
