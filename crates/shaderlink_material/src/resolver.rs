// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data-input resolution: which reachable node inputs are runtime-settable.

use crate::engine::Engine;
use indexmap::IndexMap;
use shaderlink_graph::{Graph, InputSocket, NodeId};

/// Mapping from node id to the node's live data inputs
pub type DataInputMap = IndexMap<NodeId, Vec<InputSocket>>;

/// Resolve the data inputs reachable backward from the given program sinks.
///
/// One independent backward walk per sink; results are merged by node id,
/// with a node reachable from both stages contributing each socket once.
/// Classification of "is this a data input" is the engine's predicate; this
/// function owns only the reachability walk, so inputs on dead
/// (unreachable) nodes are never reported.
pub fn resolve_data_inputs(graph: &Graph, sinks: &[NodeId], engine: &dyn Engine) -> DataInputMap {
    let mut map = DataInputMap::new();
    for &sink in sinks {
        for (id, node) in graph.collect_upstream(sink) {
            let data_inputs: Vec<&InputSocket> = node
                .inputs
                .iter()
                .filter(|input| engine.is_data_input(input))
                .collect();
            if data_inputs.is_empty() {
                continue;
            }
            let entry = map.entry(id).or_default();
            for input in data_inputs {
                if !entry.iter().any(|existing| existing.name == input.name) {
                    entry.push(input.clone());
                }
            }
        }
    }
    map
}
