// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value propagation and graph evaluation.
//!
//! Binding the last end of a connection runs [`Graph::propagate`] once: the
//! producer's value is copied into the consumer and the consumer's node
//! recomputes its outputs. This is single-hop; nodes further downstream keep
//! their values until [`Graph::evaluate`] walks the whole graph.

use crate::connection::ConnectionId;
use crate::graph::{Graph, GraphError, Result};
use crate::node::NodeId;
use crate::socket::{SocketId, SocketKind, SocketValue};
use std::collections::HashSet;

impl Graph {
    /// Copy a complete connection's producer value into its consumer, then
    /// recompute the consumer node's outputs
    pub fn propagate(&mut self, connection_id: ConnectionId) -> Result<()> {
        let (output, input) = self.connection(connection_id)?.endpoints().ok_or_else(|| {
            GraphError::invalid(format!("{connection_id} is not bound at both ends"))
        })?;
        let value = self.socket(output)?.value.clone();
        let consumer = self.socket_mut(input)?;
        consumer.value = value;
        let node_id = consumer
            .node_id
            .ok_or_else(|| GraphError::invalid(format!("{input} is not attached to a node")))?;
        tracing::debug!(connection = %connection_id, from = %output, to = %input, "propagating value");
        self.recompute_node(node_id)
    }

    /// Current input values of a node, in index order
    pub fn input_values(&self, node_id: NodeId) -> Result<Vec<SocketValue>> {
        self.node(node_id)?
            .input_socket_ids()
            .iter()
            .map(|id| self.socket(*id).map(|s| s.value.clone()))
            .collect()
    }

    /// Run every compute strategy on a node's outputs against its current
    /// inputs
    pub fn recompute_node(&mut self, node_id: NodeId) -> Result<()> {
        let inputs = self.input_values(node_id)?;
        let mut updates: Vec<(SocketId, SocketValue)> = Vec::new();
        for id in self.node(node_id)?.output_socket_ids() {
            let socket = self.socket(*id)?;
            if let Some(compute) = socket.compute() {
                updates.push((*id, compute.compute(&inputs)));
            }
        }
        for (id, value) in updates {
            tracing::trace!(socket = %id, %value, "recomputed output");
            self.socket_mut(id)?.value = value;
        }
        Ok(())
    }

    /// Recompute every node once, in insertion order, without moving values
    /// along connections
    pub fn recompute_all(&mut self) -> Result<()> {
        let node_ids: Vec<_> = self.node_ids().collect();
        for node_id in node_ids {
            self.recompute_node(node_id)?;
        }
        Ok(())
    }

    /// Nodes ordered so every producer precedes its consumers, following
    /// complete connections only
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();
        let mut order = Vec::new();

        for node_id in self.node_ids() {
            if !visited.contains(&node_id) {
                self.visit(node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        temp_mark: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<()> {
        if temp_mark.contains(&node_id) {
            return Err(GraphError::Cycle);
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Visit every node feeding one of this node's inputs
        for producer in self.producers_of(node_id)? {
            self.visit(producer, visited, temp_mark, order)?;
        }

        temp_mark.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }

    fn producers_of(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut producers = Vec::new();
        for input in self.node(node_id)?.socket_ids(SocketKind::Input) {
            for connection_id in self.socket(*input)?.connection_ids() {
                let connection = self.connection(*connection_id)?;
                if let Some(output) = connection.output_socket() {
                    producers.push(self.socket_owner(output)?.id);
                }
            }
        }
        Ok(producers)
    }

    /// Recompute the whole graph in dependency order.
    ///
    /// Each node first pulls its connected inputs from their producers, then
    /// recomputes its outputs, so changes reach every node downstream. Fails
    /// with [`GraphError::Cycle`] before changing anything if complete
    /// connections form a loop.
    pub fn evaluate(&mut self) -> Result<()> {
        let order = self.topological_order()?;
        tracing::debug!(nodes = order.len(), "evaluating graph");
        for node_id in order {
            let mut pulls = Vec::new();
            for input in self.node(node_id)?.socket_ids(SocketKind::Input) {
                let socket = self.socket(*input)?;
                let Some(connection_id) = socket.connection_ids().first() else {
                    continue;
                };
                if let Some(output) = self.connection(*connection_id)?.output_socket() {
                    pulls.push((*input, self.socket(output)?.value.clone()));
                }
            }
            for (input, value) in pulls {
                self.socket_mut(input)?.value = value;
            }
            self.recompute_node(node_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::builtin;
    use crate::node::NodeConfig;
    use crate::socket::SocketConfig;

    fn float(graph: &Graph, id: SocketId) -> f64 {
        graph.socket(id).unwrap().value.as_f64().unwrap()
    }

    /// Two inputs and a sum output
    fn adder(graph: &mut Graph, x: f64, y: f64) -> (NodeId, [SocketId; 3]) {
        let node = graph.create_node(NodeConfig::new("Add")).unwrap();
        let x = graph.attach_socket(node, SocketConfig::input("x").with_value(x)).unwrap();
        let y = graph.attach_socket(node, SocketConfig::input("y").with_value(y)).unwrap();
        let sum = graph
            .attach_socket(node, SocketConfig::output("sum").with_compute(builtin::sum()))
            .unwrap();
        (node, [x, y, sum])
    }

    #[test]
    fn test_propagation_correctness() {
        let mut graph = Graph::default();
        let (a, [_, _, a_sum]) = adder(&mut graph, 1.0, 2.0);
        graph.recompute_node(a).unwrap();
        assert_eq!(float(&graph, a_sum), 3.0);

        let b = graph.create_node(NodeConfig::new("Math")).unwrap();
        let inputs: Vec<_> = [0.0, 2.0, 3.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, v)| {
                graph
                    .attach_socket(b, SocketConfig::input(format!("in{i}")).with_value(*v))
                    .unwrap()
            })
            .collect();
        let b_sum = graph
            .attach_socket(b, SocketConfig::output("sum").with_compute(builtin::sum()))
            .unwrap();
        let b_product = graph
            .attach_socket(b, SocketConfig::output("product").with_compute(builtin::product()))
            .unwrap();
        let b_plain = graph.attach_socket(b, SocketConfig::output("plain").with_value(7.0)).unwrap();

        graph.connect(a_sum, inputs[0]).unwrap();

        assert_eq!(float(&graph, inputs[0]), 3.0);
        assert_eq!(float(&graph, b_sum), 12.0);
        assert_eq!(float(&graph, b_product), 72.0);
        assert_eq!(float(&graph, b_plain), 7.0);
    }

    #[test]
    fn test_propagation_copies_without_coercion() {
        let mut graph = Graph::default();
        let source = graph.create_node(NodeConfig::new("Text")).unwrap();
        let out = graph
            .attach_socket(source, SocketConfig::output("text").with_value("hello"))
            .unwrap();
        let (_, [x, _, _]) = adder(&mut graph, 0.0, 0.0);
        graph.connect(out, x).unwrap();
        assert_eq!(graph.socket(x).unwrap().value, SocketValue::from("hello"));
    }

    #[test]
    fn test_propagation_is_single_hop() {
        let mut graph = Graph::default();
        let (a, [a_x, _, a_sum]) = adder(&mut graph, 1.0, 2.0);
        let (_, [b_x, _, b_sum]) = adder(&mut graph, 0.0, 10.0);
        let (_, [c_x, _, c_sum]) = adder(&mut graph, 0.0, 100.0);
        graph.recompute_all().unwrap();

        graph.connect(b_sum, c_x).unwrap();
        assert_eq!(float(&graph, c_sum), 110.0);
        graph.connect(a_sum, b_x).unwrap();
        assert_eq!(float(&graph, b_sum), 13.0);
        // Two hops away: untouched until a full evaluation
        assert_eq!(float(&graph, c_sum), 110.0);

        graph.evaluate().unwrap();
        assert_eq!(float(&graph, c_sum), 113.0);

        graph.set_value(a_x, 5.0).unwrap();
        graph.recompute_node(a).unwrap();
        assert_eq!(float(&graph, a_sum), 7.0);
        graph.evaluate().unwrap();
        assert_eq!(float(&graph, c_sum), 117.0);
    }

    #[test]
    fn test_topological_order() {
        let mut graph = Graph::default();
        let (c, [c_x, _, _]) = adder(&mut graph, 0.0, 0.0);
        let (b, [b_x, _, b_sum]) = adder(&mut graph, 0.0, 0.0);
        let (a, [_, _, a_sum]) = adder(&mut graph, 0.0, 0.0);
        graph.connect(a_sum, b_x).unwrap();
        graph.connect(b_sum, c_x).unwrap();

        let order = graph.topological_order().unwrap();
        let pos = |id| order.iter().position(|n| *n == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(c));
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = Graph::default();
        let (_, [a_x, _, a_sum]) = adder(&mut graph, 1.0, 1.0);
        let (_, [b_x, _, b_sum]) = adder(&mut graph, 1.0, 1.0);
        graph.connect(a_sum, b_x).unwrap();
        graph.connect(b_sum, a_x).unwrap();

        let before = float(&graph, b_sum);
        assert_eq!(graph.evaluate(), Err(GraphError::Cycle));
        assert_eq!(float(&graph, b_sum), before);
    }

    #[test]
    fn test_half_bound_is_ignored() {
        let mut graph = Graph::default();
        let (_, [_, _, a_sum]) = adder(&mut graph, 1.0, 1.0);
        let (_, [b_x, _, _]) = adder(&mut graph, 4.0, 1.0);
        let c = graph.create_connection().unwrap();
        graph.bind_end(c, a_sum).unwrap();
        assert!(matches!(graph.propagate(c), Err(GraphError::InvalidTarget(_))));

        let d = graph.create_connection().unwrap();
        graph.bind_end(d, b_x).unwrap();
        graph.evaluate().unwrap();
        assert_eq!(float(&graph, b_x), 4.0);
    }
}
