// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless pointer interaction for the graph editor.
//!
//! Translates pointer down/move/up events (already in graph space) into
//! wiring operations:
//! - pressing on a socket starts a half-bound connection whose free end
//!   follows the pointer
//! - pressing on an input socket that already holds a connection picks that
//!   connection up by its input end, keeping the output end bound
//! - releasing over a socket of the opposite kind binds it; releasing
//!   anywhere else drops the dangling connection
//! - pressing on a node body drags the node

use crate::connection::ConnectionId;
use crate::geometry::{bezier_control_points, Point};
use crate::graph::{Graph, Result};
use crate::node::NodeId;
use crate::socket::SocketId;

/// Connection being dragged from a socket
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDrag {
    /// The half-bound connection
    pub connection: ConnectionId,
    /// Its bound end
    pub anchor: SocketId,
    /// Free end, following the pointer
    pub pointer: Point,
}

/// Current pointer interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    /// Nothing grabbed
    #[default]
    Idle,
    /// Dragging a node by its body
    DraggingNode {
        /// Node being dragged
        node: NodeId,
        /// Pointer offset from the node's top-left corner
        grab_offset: Point,
    },
    /// Dragging a connection's free end
    DraggingConnection(ConnectionDrag),
}

/// What a pointer event did to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    /// Nothing changed
    None,
    /// A node was grabbed
    NodeGrabbed(NodeId),
    /// A grabbed node moved
    NodeMoved(NodeId),
    /// A grabbed node was released
    NodeReleased(NodeId),
    /// A half-bound connection was started or picked up
    ConnectionStarted(ConnectionId),
    /// A dragged connection's free end moved
    ConnectionDragged(ConnectionId),
    /// A dragged connection was completed; its value has propagated
    Connected(ConnectionId),
    /// A dragged connection was dropped and removed
    ConnectionDiscarded(ConnectionId),
}

/// Pointer state machine driving a [`Graph`]
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    mode: InteractionMode,
}

impl Interaction {
    /// Create an idle interaction
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Whether nothing is grabbed
    pub fn is_idle(&self) -> bool {
        self.mode == InteractionMode::Idle
    }

    /// Handle a pointer press
    pub fn pointer_down(&mut self, graph: &mut Graph, x: f32, y: f32) -> Result<InteractionEvent> {
        if !self.is_idle() {
            return Ok(InteractionEvent::None);
        }
        let pointer = Point::new(x, y);

        if let Some(socket_id) = graph.socket_at(x, y) {
            let socket = graph.socket(socket_id)?;
            let held = if socket.is_input() {
                socket.connection_ids().first().copied()
            } else {
                None
            };

            let (connection, anchor) = match held {
                Some(connection) => {
                    // Unbinding the only bound end removes the connection
                    graph.unbind_end(connection, socket_id)?;
                    match graph.connection(connection).ok().and_then(|c| c.bound_end()) {
                        Some(anchor) => (connection, anchor),
                        None => Self::start_connection(graph, socket_id)?,
                    }
                }
                None => Self::start_connection(graph, socket_id)?,
            };

            tracing::debug!(connection = %connection, anchor = %anchor, "started connection drag");
            self.mode = InteractionMode::DraggingConnection(ConnectionDrag {
                connection,
                anchor,
                pointer,
            });
            return Ok(InteractionEvent::ConnectionStarted(connection));
        }

        if let Some(node_id) = graph.node_at(x, y) {
            let origin = graph.node(node_id)?.position;
            self.mode = InteractionMode::DraggingNode {
                node: node_id,
                grab_offset: Point::new(x - origin.x, y - origin.y),
            };
            return Ok(InteractionEvent::NodeGrabbed(node_id));
        }

        Ok(InteractionEvent::None)
    }

    fn start_connection(graph: &mut Graph, socket_id: SocketId) -> Result<(ConnectionId, SocketId)> {
        let connection = graph.create_connection()?;
        graph.bind_end(connection, socket_id)?;
        Ok((connection, socket_id))
    }

    /// Handle pointer movement
    pub fn pointer_move(&mut self, graph: &mut Graph, x: f32, y: f32) -> Result<InteractionEvent> {
        match &mut self.mode {
            InteractionMode::Idle => Ok(InteractionEvent::None),
            InteractionMode::DraggingNode { node, grab_offset } => {
                graph.move_node(*node, x - grab_offset.x, y - grab_offset.y)?;
                Ok(InteractionEvent::NodeMoved(*node))
            }
            InteractionMode::DraggingConnection(drag) => {
                drag.pointer = Point::new(x, y);
                Ok(InteractionEvent::ConnectionDragged(drag.connection))
            }
        }
    }

    /// Handle a pointer release
    pub fn pointer_up(&mut self, graph: &mut Graph, x: f32, y: f32) -> Result<InteractionEvent> {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Idle => Ok(InteractionEvent::None),
            InteractionMode::DraggingNode { node, grab_offset } => {
                graph.move_node(node, x - grab_offset.x, y - grab_offset.y)?;
                Ok(InteractionEvent::NodeReleased(node))
            }
            InteractionMode::DraggingConnection(drag) => {
                let anchor_kind = graph.socket(drag.anchor)?.kind;
                let target = graph
                    .socket_at(x, y)
                    .filter(|id| {
                        graph
                            .socket(*id)
                            .is_ok_and(|s| s.kind == anchor_kind.opposite())
                    });

                match target {
                    Some(target) => {
                        if let Err(e) = graph.bind_end(drag.connection, target) {
                            if graph.remove_connection(drag.connection).is_ok() {
                                tracing::debug!(
                                    connection = %drag.connection,
                                    "discarded connection after failed bind"
                                );
                            }
                            return Err(e);
                        }
                        tracing::debug!(connection = %drag.connection, "completed connection drag");
                        Ok(InteractionEvent::Connected(drag.connection))
                    }
                    None => {
                        graph.remove_connection(drag.connection)?;
                        tracing::debug!(connection = %drag.connection, "discarded connection drag");
                        Ok(InteractionEvent::ConnectionDiscarded(drag.connection))
                    }
                }
            }
        }
    }

    /// Abort the current interaction. A dragged connection is removed.
    pub fn cancel(&mut self, graph: &mut Graph) -> Result<()> {
        if let InteractionMode::DraggingConnection(drag) = std::mem::take(&mut self.mode) {
            graph.remove_connection(drag.connection)?;
        }
        Ok(())
    }

    /// Curve of the connection being dragged, as
    /// `(source, control1, control2, target)` running output -> input
    pub fn pending_curve(&self, graph: &Graph) -> Option<[Point; 4]> {
        let InteractionMode::DraggingConnection(drag) = &self.mode else {
            return None;
        };
        let (source, target) = graph
            .connection_endpoints(drag.connection, Some(drag.pointer))
            .ok()?;
        let (c1, c2) = bezier_control_points(source.x, source.y, target.x, target.y);
        Some([source, c1, c2, target])
    }
}
