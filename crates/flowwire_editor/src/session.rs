// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless editing session: a graph, its node kinds and the pointer state
//! machine, driven by scripted pointer gestures.

use crate::config::{ConfigError, EditorConfig};
use crate::scene::{build_demo_scene, DemoScene};
use flowwire_graph::{
    bezier_control_points, create_math_registry, ConnectionId, Graph, GraphError, Interaction,
    InteractionEvent, NodeRegistry, Point,
};
use thiserror::Error;

/// Editor errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Graph operation failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Config could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A single editing session
pub struct EditorSession {
    graph: Graph,
    interaction: Interaction,
    registry: NodeRegistry,
    config: EditorConfig,
}

impl EditorSession {
    /// Create an empty session
    pub fn new(config: EditorConfig) -> Self {
        let registry = create_math_registry().with_layout(config.layout);
        Self {
            graph: Graph::default(),
            interaction: Interaction::new(),
            registry,
            config,
        }
    }

    /// The edited graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Replace the graph with the demo scene
    pub fn load_demo(&mut self) -> Result<DemoScene, EditorError> {
        self.interaction.cancel(&mut self.graph)?;
        self.graph = Graph::new("Demo");
        let scene = build_demo_scene(&mut self.graph, &self.registry)?;
        if self.config.evaluate_on_start {
            self.graph.evaluate()?;
        }
        Ok(scene)
    }

    /// Press at `from`, move to `to` and release there.
    ///
    /// Returns the event produced by the release, or [`InteractionEvent::None`]
    /// if the press grabbed nothing.
    pub fn drag(&mut self, from: Point, to: Point) -> Result<InteractionEvent, EditorError> {
        let pressed = self
            .interaction
            .pointer_down(&mut self.graph, from.x, from.y)?;
        if pressed == InteractionEvent::None {
            return Ok(InteractionEvent::None);
        }

        let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        self.interaction
            .pointer_move(&mut self.graph, mid.x, mid.y)?;
        if let Some([source, _, _, target]) = self.interaction.pending_curve(&self.graph) {
            tracing::trace!(?source, ?target, "drag preview");
        }
        self.interaction.pointer_move(&mut self.graph, to.x, to.y)?;

        let released = self.interaction.pointer_up(&mut self.graph, to.x, to.y)?;
        tracing::debug!(?pressed, ?released, "drag finished");
        Ok(released)
    }

    /// Connection under the pointer, within the configured tolerance
    pub fn hovered_connection(&self, pointer: Point) -> Option<ConnectionId> {
        self.graph
            .connection_at(pointer.x, pointer.y, self.config.link_tolerance)
    }

    /// Log every node, socket value and connection curve
    pub fn report(&self) -> Result<(), EditorError> {
        for node in self.graph.nodes() {
            tracing::info!(
                node = %node.id,
                name = %node.name,
                x = node.position.x,
                y = node.position.y,
                height = node.height(),
                "node"
            );
            for socket_id in node.all_socket_ids() {
                let socket = self.graph.socket(socket_id)?;
                tracing::info!(
                    "  {} {} = {} ({} connection(s))",
                    socket.kind,
                    socket.name,
                    socket.value,
                    socket.connection_ids().len()
                );
            }
        }

        for connection in self.graph.connections() {
            let (source, target) = self.graph.connection_endpoints(connection.id, None)?;
            let (c1, c2) = bezier_control_points(source.x, source.y, target.x, target.y);
            tracing::info!(
                connection = %connection.id,
                "curve ({}, {}) -> ({}, {}) via ({}, {}) ({}, {})",
                source.x,
                source.y,
                target.x,
                target.y,
                c1.x,
                c1.y,
                c2.x,
                c2.y
            );
        }
        Ok(())
    }

    /// Load the demo scene and wire `divide.divide -> math.y` by dragging
    pub fn run_demo(&mut self) -> Result<DemoScene, EditorError> {
        let scene = self.load_demo()?;

        let from = self
            .graph
            .socket_position(self.graph.socket_by_name(scene.divide, "divide")?.id)?;
        let to = self
            .graph
            .socket_position(self.graph.socket_by_name(scene.math, "y")?.id)?;
        match self.drag(from, to)? {
            InteractionEvent::Connected(connection) => {
                tracing::info!(connection = %connection, "wired divide -> math");
            }
            other => tracing::warn!(?other, "demo drag did not connect"),
        }

        // Halfway along sum -> math.x lies on its curve
        let source = self
            .graph
            .socket_position(self.graph.socket_by_name(scene.sum, "sum")?.id)?;
        let target = self
            .graph
            .socket_position(self.graph.socket_by_name(scene.math, "x")?.id)?;
        let mid = Point::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);
        tracing::debug!(hovered = ?self.hovered_connection(mid), "hover check");

        self.report()?;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowwire_graph::{ConnectionState, SocketValue};

    fn value(session: &EditorSession, node: flowwire_graph::NodeId, name: &str) -> SocketValue {
        session
            .graph()
            .socket_by_name(node, name)
            .unwrap()
            .value
            .clone()
    }

    #[test]
    fn test_run_demo() {
        let mut session = EditorSession::new(EditorConfig::default());
        let scene = session.run_demo().unwrap();

        assert_eq!(session.graph().connection_count(), 2);
        assert_eq!(value(&session, scene.math, "y"), SocketValue::Float(6.0));
        assert_eq!(value(&session, scene.math, "sum"), SocketValue::Float(16.0));
        assert_eq!(
            value(&session, scene.math, "multiply"),
            SocketValue::Float(216.0)
        );
        assert!(session
            .graph()
            .connections()
            .all(|c| c.state() == ConnectionState::Bound));
    }

    #[test]
    fn test_drag_to_empty_space_discards() {
        let mut session = EditorSession::new(EditorConfig::default());
        let scene = session.load_demo().unwrap();
        let from = session
            .graph()
            .socket_position(session.graph().socket_by_name(scene.divide, "divide").unwrap().id)
            .unwrap();

        let event = session.drag(from, Point::new(600.0, 900.0)).unwrap();
        assert!(matches!(event, InteractionEvent::ConnectionDiscarded(_)));
        assert_eq!(session.graph().connection_count(), 1);
    }

    #[test]
    fn test_drag_from_nothing() {
        let mut session = EditorSession::new(EditorConfig::default());
        session.load_demo().unwrap();
        let event = session
            .drag(Point::new(-500.0, -500.0), Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(event, InteractionEvent::None);
    }

    #[test]
    fn test_drag_node_body() {
        let mut session = EditorSession::new(EditorConfig::default());
        let scene = session.load_demo().unwrap();

        let event = session
            .drag(Point::new(250.0, 600.0), Point::new(300.0, 650.0))
            .unwrap();
        assert_eq!(event, InteractionEvent::NodeReleased(scene.divide));
        assert_eq!(
            session.graph().node(scene.divide).unwrap().position,
            Point::new(200.0, 635.0)
        );
    }

    #[test]
    fn test_hovered_connection() {
        let mut session = EditorSession::new(EditorConfig::default());
        let scene = session.load_demo().unwrap();
        let graph = session.graph();
        let source = graph
            .socket_position(graph.socket_by_name(scene.sum, "sum").unwrap().id)
            .unwrap();
        let target = graph
            .socket_position(graph.socket_by_name(scene.math, "x").unwrap().id)
            .unwrap();
        let mid = Point::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);

        assert!(session.hovered_connection(mid).is_some());
        assert!(session.hovered_connection(Point::new(600.0, 900.0)).is_none());
    }

    #[test]
    fn test_evaluate_on_start() {
        let config = EditorConfig {
            evaluate_on_start: true,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::new(config);
        let scene = session.load_demo().unwrap();
        assert_eq!(value(&session, scene.math, "sum"), SocketValue::Float(12.0));
    }
}
