// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and edges.

use crate::edge::Edge;
use crate::id::NodeId;
use crate::node::Node;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A shader graph: node set plus edge set.
///
/// Each stage's nodes form a DAG rooted at that stage's single output sink.
/// Nodes unreachable backward from a sink are dead; [`Graph::collect_upstream`]
/// never visits them, so they cannot affect resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Add an edge to the graph.
    ///
    /// Both endpoints must already be present, and the destination input
    /// must not already have an incoming edge (at most one edge per input).
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&edge.from) {
            return Err(GraphError::NodeNotFound(edge.from));
        }
        if !self.nodes.contains_key(&edge.to) {
            return Err(GraphError::NodeNotFound(edge.to));
        }
        if self.edge_into(edge.to, &edge.input).is_some() {
            return Err(GraphError::InputOccupied {
                node: edge.to,
                input: edge.input.clone(),
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Get a node by id
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// The edge feeding a specific (node, input) pair, if any
    pub fn edge_into(&self, node_id: NodeId, input: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.to == node_id && e.input == input)
    }

    /// All edges feeding a node
    pub fn edges_into(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to == node_id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Collect every node reachable backward from `start` via edges,
    /// including `start` itself.
    ///
    /// Uses an explicit work stack, so arbitrarily deep graphs cannot
    /// overflow the call stack. A back-edge is harmless here; the walk
    /// visits each node once.
    pub fn collect_upstream(&self, start: NodeId) -> IndexMap<NodeId, &Node> {
        let mut reached = IndexMap::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if reached.contains_key(&id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            reached.insert(id, node);
            for edge in self.edges_into(id) {
                stack.push(edge.from);
            }
        }
        reached
    }
}

/// Error constructing a graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Edge endpoint references a node not in the graph
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The destination input already has an incoming edge
    #[error("input {input:?} on node {node} already has an incoming edge")]
    InputOccupied {
        /// Destination node
        node: NodeId,
        /// Destination input name
        input: String,
    },

    /// Edge source declares no outputs
    #[error("node {0} has no outputs to connect from")]
    NoOutputs(NodeId),
}
