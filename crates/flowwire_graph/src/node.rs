// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph.

use crate::geometry::{point_in_box, Point, Rect};
use crate::layout::NodeLayout;
use crate::socket::{Socket, SocketId, SocketKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// Parameters for creating a node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Display name
    pub name: String,
    /// Node kind identifier, if created from a template
    pub node_type: Option<String>,
    /// Top-left corner in graph space
    pub position: Point,
    /// Layout constants
    pub layout: NodeLayout,
}

impl NodeConfig {
    /// Create a config with the given name and default layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Set the layout constants
    pub fn with_layout(mut self, layout: NodeLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "Node".to_string(),
            node_type: None,
            position: Point::default(),
            layout: NodeLayout::default(),
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind identifier, if created from a template
    pub node_type: Option<String>,
    /// Display name
    pub name: String,
    /// Top-left corner in graph space
    pub position: Point,
    /// Layout constants
    pub layout: NodeLayout,
    height: f32,
    input_socket_ids: Vec<SocketId>,
    output_socket_ids: Vec<SocketId>,
}

impl Node {
    /// Create an empty node
    pub fn new(config: NodeConfig) -> Self {
        let height = config.layout.height_for(0, 0);
        Self {
            id: NodeId::new(),
            node_type: config.node_type,
            name: config.name,
            position: config.position,
            layout: config.layout,
            height,
            input_socket_ids: Vec::new(),
            output_socket_ids: Vec::new(),
        }
    }

    /// Node width
    pub fn width(&self) -> f32 {
        self.layout.width
    }

    /// Node height, derived from the socket counts
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Input sockets in index order
    pub fn input_socket_ids(&self) -> &[SocketId] {
        &self.input_socket_ids
    }

    /// Output sockets in index order
    pub fn output_socket_ids(&self) -> &[SocketId] {
        &self.output_socket_ids
    }

    /// Sockets of one polarity in index order
    pub fn socket_ids(&self, kind: SocketKind) -> &[SocketId] {
        match kind {
            SocketKind::Input => &self.input_socket_ids,
            SocketKind::Output => &self.output_socket_ids,
        }
    }

    /// All sockets, inputs first
    pub fn all_socket_ids(&self) -> impl Iterator<Item = SocketId> + '_ {
        self.input_socket_ids
            .iter()
            .chain(self.output_socket_ids.iter())
            .copied()
    }

    /// Body rectangle, without the socket margin
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.width(), self.height)
    }

    /// Hit test with the socket radius as margin, so sockets sticking out of
    /// the edges still count as part of the node. Bounds are inclusive.
    pub fn is_point_inside(&self, x: f32, y: f32) -> bool {
        self.rect()
            .expand(self.layout.socket_radius)
            .contains(Point::new(x, y))
    }

    /// Screen position of one of this node's sockets
    pub fn socket_position(&self, kind: SocketKind, index: usize) -> Point {
        let x = match kind {
            SocketKind::Input => self.position.x,
            SocketKind::Output => self.position.x + self.width(),
        };
        let y = self.position.y
            + (index as f32 + 1.0) * self.layout.socket_spacing
            + self.layout.header_height;
        Point::new(x, y)
    }

    /// Screen position of `socket`, which must belong to this node
    pub fn computed_position(&self, socket: &Socket) -> Point {
        self.socket_position(socket.kind, socket.index)
    }

    /// Box hit test of radius `socket_radius` around one of this node's
    /// sockets
    pub fn is_point_inside_socket(&self, socket: &Socket, x: f32, y: f32) -> bool {
        point_in_box(
            Point::new(x, y),
            self.computed_position(socket),
            self.layout.socket_radius,
        )
    }

    /// Append a socket id to the matching sibling list and return its index
    pub(crate) fn push_socket(&mut self, kind: SocketKind, id: SocketId) -> usize {
        let list = match kind {
            SocketKind::Input => &mut self.input_socket_ids,
            SocketKind::Output => &mut self.output_socket_ids,
        };
        list.push(id);
        let index = list.len() - 1;
        self.recompute_height();
        index
    }

    /// Remove a socket id. Returns the polarity and index it had.
    pub(crate) fn remove_socket(&mut self, id: SocketId) -> Option<(SocketKind, usize)> {
        let found = [SocketKind::Input, SocketKind::Output]
            .into_iter()
            .find_map(|kind| {
                self.socket_ids(kind)
                    .iter()
                    .position(|s| *s == id)
                    .map(|index| (kind, index))
            })?;
        match found.0 {
            SocketKind::Input => self.input_socket_ids.remove(found.1),
            SocketKind::Output => self.output_socket_ids.remove(found.1),
        };
        self.recompute_height();
        Some(found)
    }

    fn recompute_height(&mut self) {
        self.height = self
            .layout
            .height_for(self.input_socket_ids.len(), self.output_socket_ids.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32) -> Node {
        Node::new(NodeConfig::new("Sum").with_position(x, y))
    }

    #[test]
    fn test_new_node_is_empty() {
        let node = node_at(0.0, 0.0);
        assert!(node.input_socket_ids().is_empty());
        assert!(node.output_socket_ids().is_empty());
        assert_eq!(node.height(), 90.0);
        assert_eq!(node.width(), 200.0);
    }

    #[test]
    fn test_height_tracks_sockets() {
        let mut node = node_at(0.0, 0.0);
        let a = SocketId::new();
        assert_eq!(node.push_socket(SocketKind::Input, a), 0);
        assert_eq!(node.push_socket(SocketKind::Input, SocketId::new()), 1);
        assert_eq!(node.push_socket(SocketKind::Output, SocketId::new()), 0);
        assert_eq!(node.height(), 50.0 * 3.0 + 40.0);

        assert_eq!(node.remove_socket(a), Some((SocketKind::Input, 0)));
        assert_eq!(node.height(), 50.0 * 2.0 + 40.0);
        assert_eq!(node.remove_socket(a), None);
    }

    #[test]
    fn test_hit_test_boundary() {
        let node = node_at(100.0, 100.0);
        let r = node.layout.socket_radius;
        assert!(node.is_point_inside(100.0 - r, 150.0));
        assert!(!node.is_point_inside(100.0 - r - 1.0, 150.0));
        assert!(node.is_point_inside(100.0 + node.width() + r, 100.0 - r));
        assert!(!node.is_point_inside(150.0, 100.0 + node.height() + r + 1.0));
    }

    #[test]
    fn test_socket_hit_test_boundary() {
        let node = node_at(100.0, 100.0);
        let r = node.layout.socket_radius;
        let input = Socket::new(crate::socket::SocketConfig::input("x"));
        let mut output = Socket::new(crate::socket::SocketConfig::output("sum"));
        output.index = 1;

        // Input 0 sits at (100, 190)
        assert!(node.is_point_inside_socket(&input, 100.0 - r, 190.0));
        assert!(node.is_point_inside_socket(&input, 100.0 + r, 190.0 + r));
        assert!(!node.is_point_inside_socket(&input, 100.0 - r - 1.0, 190.0));
        assert!(!node.is_point_inside_socket(&input, 100.0, 190.0 + r + 1.0));

        // Output 1 sits at (300, 240)
        assert!(node.is_point_inside_socket(&output, 300.0 + r, 240.0 - r));
        assert!(!node.is_point_inside_socket(&output, 300.0 + r + 1.0, 240.0));
        assert!(!node.is_point_inside_socket(&output, 300.0, 190.0));
    }

    #[test]
    fn test_socket_position() {
        let node = node_at(150.0, 185.0);
        assert_eq!(node.socket_position(SocketKind::Input, 0), Point::new(150.0, 275.0));
        assert_eq!(node.socket_position(SocketKind::Input, 1), Point::new(150.0, 325.0));
        assert_eq!(node.socket_position(SocketKind::Output, 0), Point::new(350.0, 275.0));
    }
}
