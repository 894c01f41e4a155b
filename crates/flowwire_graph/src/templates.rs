// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node kinds: reusable declarations of a node's sockets and compute
//! strategies.

use crate::compute::builtin;
use crate::graph::{Graph, GraphError, Result};
use crate::layout::NodeLayout;
use crate::node::{NodeConfig, NodeId};
use crate::socket::SocketConfig;
use indexmap::IndexMap;

/// Node kind category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Value sources
    Input,
    /// Arithmetic
    Math,
    /// Everything else
    Utility,
}

/// Declaration of a node kind
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    /// Unique kind identifier
    pub id: String,
    /// Display name given to new nodes
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Input sockets with their initial values
    pub inputs: Vec<SocketConfig>,
    /// Output sockets with their compute strategies
    pub outputs: Vec<SocketConfig>,
}

/// Registry of available node kinds
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    types: IndexMap<String, NodeTemplate>,
    layout: NodeLayout,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout given to nodes created from this registry
    pub fn with_layout(mut self, layout: NodeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Register a node kind, replacing any kind with the same id
    pub fn register(&mut self, template: NodeTemplate) {
        self.types.insert(template.id.clone(), template);
    }

    /// Get a node kind by ID
    pub fn get(&self, id: &str) -> Option<&NodeTemplate> {
        self.types.get(id)
    }

    /// Get all registered kinds
    pub fn templates(&self) -> impl Iterator<Item = &NodeTemplate> {
        self.types.values()
    }

    /// Get kinds by category
    pub fn templates_in_category(
        &self,
        category: NodeCategory,
    ) -> impl Iterator<Item = &NodeTemplate> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node of kind `type_id` at `(x, y)`, attach its sockets and
    /// compute its outputs from the declared input values
    pub fn instantiate(&self, graph: &mut Graph, type_id: &str, x: f32, y: f32) -> Result<NodeId> {
        let template = self
            .get(type_id)
            .ok_or_else(|| GraphError::invalid(format!("unknown node type {type_id:?}")))?;

        let config = NodeConfig {
            name: template.name.clone(),
            node_type: Some(template.id.clone()),
            ..NodeConfig::default()
        }
        .with_position(x, y)
        .with_layout(self.layout);

        let node = graph.create_node(config)?;
        for socket in template.inputs.iter().chain(template.outputs.iter()) {
            graph.attach_socket(node, socket.clone())?;
        }
        graph.recompute_node(node)?;
        tracing::debug!(node = %node, kind = type_id, "instantiated node");
        Ok(node)
    }
}

/// Create the registry of arithmetic node kinds
pub fn create_math_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    registry.register(NodeTemplate {
        id: "constant".to_string(),
        name: "Constant".to_string(),
        category: NodeCategory::Input,
        description: "A value set by the user".to_string(),
        inputs: vec![],
        outputs: vec![SocketConfig::output("value")],
    });

    registry.register(NodeTemplate {
        id: "sum".to_string(),
        name: "Sum".to_string(),
        category: NodeCategory::Math,
        description: "x + y".to_string(),
        inputs: vec![
            SocketConfig::input("x").with_value(1.0),
            SocketConfig::input("y").with_value(2.0),
        ],
        outputs: vec![SocketConfig::output("sum").with_compute(builtin::sum())],
    });

    registry.register(NodeTemplate {
        id: "math".to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Math,
        description: "Sum and product of four values".to_string(),
        inputs: vec![
            SocketConfig::input("x").with_value(1.0),
            SocketConfig::input("y").with_value(2.0),
            SocketConfig::input("z").with_value(3.0),
            SocketConfig::input("w").with_value(4.0),
        ],
        outputs: vec![
            SocketConfig::output("sum").with_compute(builtin::sum()),
            SocketConfig::output("multiply").with_compute(builtin::product()),
        ],
    });

    registry.register(NodeTemplate {
        id: "add".to_string(),
        name: "Add".to_string(),
        category: NodeCategory::Math,
        description: "x + y".to_string(),
        inputs: vec![
            SocketConfig::input("x").with_value(1.0),
            SocketConfig::input("y").with_value(2.0),
        ],
        outputs: vec![SocketConfig::output("add").with_compute(builtin::sum())],
    });

    registry.register(NodeTemplate {
        id: "subtract".to_string(),
        name: "Subtract".to_string(),
        category: NodeCategory::Math,
        description: "x - y".to_string(),
        inputs: vec![
            SocketConfig::input("x").with_value(0.0),
            SocketConfig::input("y").with_value(0.0),
        ],
        outputs: vec![SocketConfig::output("subtract").with_compute(builtin::difference())],
    });

    registry.register(NodeTemplate {
        id: "divide".to_string(),
        name: "Divide".to_string(),
        category: NodeCategory::Math,
        description: "x / y".to_string(),
        inputs: vec![
            SocketConfig::input("x").with_value(12.0),
            SocketConfig::input("y").with_value(2.0),
        ],
        outputs: vec![SocketConfig::output("divide").with_compute(builtin::quotient())],
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::SocketValue;

    fn value(graph: &Graph, node: NodeId, name: &str) -> SocketValue {
        graph.socket_by_name(node, name).unwrap().value.clone()
    }

    #[test]
    fn test_registry_contents() {
        let registry = create_math_registry();
        assert!(registry.get("sum").is_some());
        assert!(registry.get("divide").is_some());
        assert!(registry.get("nope").is_none());
        assert_eq!(registry.templates_in_category(NodeCategory::Input).count(), 1);
        assert_eq!(registry.templates().count(), 6);
    }

    #[test]
    fn test_instantiate_computes_outputs() {
        let registry = create_math_registry();
        let mut graph = Graph::default();

        let math = registry.instantiate(&mut graph, "math", 910.0, 340.0).unwrap();
        assert_eq!(value(&graph, math, "sum"), SocketValue::Float(10.0));
        assert_eq!(value(&graph, math, "multiply"), SocketValue::Float(24.0));

        let node = graph.node(math).unwrap();
        assert_eq!(node.node_type.as_deref(), Some("math"));
        assert_eq!(node.input_socket_ids().len(), 4);
        assert_eq!(node.height(), 50.0 * 5.0 + 40.0);

        let divide = registry.instantiate(&mut graph, "divide", 0.0, 0.0).unwrap();
        assert_eq!(value(&graph, divide, "divide"), SocketValue::Float(6.0));
    }

    #[test]
    fn test_instances_do_not_share_sockets() {
        let registry = create_math_registry();
        let mut graph = Graph::default();
        let a = registry.instantiate(&mut graph, "sum", 0.0, 0.0).unwrap();
        let b = registry.instantiate(&mut graph, "sum", 300.0, 0.0).unwrap();
        let a_sum = graph.socket_by_name(a, "sum").unwrap().id;
        let b_x = graph.socket_by_name(b, "x").unwrap().id;
        assert_ne!(a_sum, graph.socket_by_name(b, "sum").unwrap().id);

        graph.connect(a_sum, b_x).unwrap();
        assert_eq!(value(&graph, b, "x"), SocketValue::Float(3.0));
        assert_eq!(value(&graph, b, "sum"), SocketValue::Float(5.0));
    }

    #[test]
    fn test_unknown_type() {
        let registry = create_math_registry();
        let mut graph = Graph::default();
        assert!(matches!(
            registry.instantiate(&mut graph, "teleport", 0.0, 0.0),
            Err(GraphError::InvalidTarget(_))
        ));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_registry_layout() {
        let layout = NodeLayout {
            width: 120.0,
            ..NodeLayout::default()
        };
        let registry = create_math_registry().with_layout(layout);
        let mut graph = Graph::default();
        let node = registry.instantiate(&mut graph, "add", 0.0, 0.0).unwrap();
        let out = graph.socket_by_name(node, "add").unwrap().id;
        assert_eq!(graph.socket_position(out).unwrap().x, 120.0);
    }
}
