// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo scene loaded at startup.

use flowwire_graph::{Graph, NodeId, NodeRegistry, Result};

/// Nodes of the demo scene
#[derive(Debug, Clone, Copy)]
pub struct DemoScene {
    /// `sum` node feeding `math`
    pub sum: NodeId,
    /// Four-input `math` node
    pub math: NodeId,
    /// Unconnected `divide` node
    pub divide: NodeId,
}

/// Populate `graph` with three nodes and wire `sum.sum -> math.x`
pub fn build_demo_scene(graph: &mut Graph, registry: &NodeRegistry) -> Result<DemoScene> {
    let sum = registry.instantiate(graph, "sum", 150.0, 185.0)?;
    let math = registry.instantiate(graph, "math", 910.0, 340.0)?;
    let divide = registry.instantiate(graph, "divide", 150.0, 585.0)?;
    graph.recompute_all()?;

    let output = graph.socket_by_name(sum, "sum")?.id;
    let input = graph.socket_by_name(math, "x")?.id;
    graph.connect(output, input)?;

    tracing::info!(
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        "loaded demo scene"
    );
    Ok(DemoScene { sum, math, divide })
}
