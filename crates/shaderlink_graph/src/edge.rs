// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge (directed connection) definitions for the shader graph.

use crate::graph::GraphError;
use crate::id::{EdgeId, IdAllocator, NodeId};
use crate::node::{Node, Stage};
use serde::{Deserialize, Serialize};

/// A directed connection from one node's output to another node's input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge id
    pub id: EdgeId,
    /// Source node id
    pub from: NodeId,
    /// Source output name
    pub output: String,
    /// Destination node id
    pub to: NodeId,
    /// Destination input name
    pub input: String,
    /// Stage this edge belongs to
    pub stage: Stage,
}

/// Build an edge from a node's first declared output into a named input on
/// another node.
///
/// The edge id comes from the session allocator. Fails with
/// [`GraphError::NoOutputs`] if the source node declares no outputs.
pub fn make_edge(
    ids: &mut IdAllocator,
    from_node: &Node,
    to: NodeId,
    input: impl Into<String>,
    stage: Stage,
) -> Result<Edge, GraphError> {
    let output = from_node
        .first_output()
        .ok_or(GraphError::NoOutputs(from_node.id))?;
    Ok(Edge {
        id: ids.next_edge(),
        from: from_node.id,
        output: output.name.clone(),
        to,
        input: input.into(),
        stage,
    })
}
