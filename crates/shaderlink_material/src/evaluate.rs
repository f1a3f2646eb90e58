// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node evaluation: compute a concrete value for a data-producing node.
//!
//! Evaluation walks the dataflow graph backward from a node, memoizes per
//! node within one resolution pass, and detects back-edges instead of
//! recursing unboundedly.

use indexmap::IndexMap;
use shaderlink_graph::{Graph, Node, NodeId, NodeKind, TextureId, Value};
use std::collections::{HashMap, HashSet};

/// Host-supplied mapping from a texture node's stored lookup key to a
/// renderer texture handle
#[derive(Debug, Default)]
pub struct TextureRegistry {
    map: HashMap<String, TextureId>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture handle under a lookup key
    pub fn insert(&mut self, key: impl Into<String>, texture: TextureId) {
        self.map.insert(key.into(), texture);
    }

    /// Look up a handle by key
    pub fn get(&self, key: &str) -> Option<TextureId> {
        self.map.get(key).copied()
    }
}

/// Error during node evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The evaluator revisited a node still being evaluated
    #[error("cycle detected while evaluating node {0}")]
    Cycle(NodeId),

    /// The node's kind has no registered evaluation function (a pure
    /// wiring/source node treated as data)
    #[error("attempted to evaluate non-data node {node} of kind {kind:?}")]
    NonDataNode {
        /// Offending node
        node: NodeId,
        /// Its kind key
        kind: String,
    },

    /// An edge referenced a node missing from the graph
    #[error("node not found: {0}")]
    MissingNode(NodeId),

    /// A texture node's lookup key has no registered handle
    #[error("no texture registered for key {0:?}")]
    UnknownTexture(String),

    /// A texture node's stored value is not a string lookup key
    #[error("texture node {node} stores a {found} value, expected a string key")]
    BadTextureKey {
        /// Offending node
        node: NodeId,
        /// Kind of the value actually stored
        found: &'static str,
    },
}

/// Evaluation function for one composite node kind: combines the node's
/// resolved data-input values into the node's own value
pub type EvalFn = Box<dyn Fn(&Node, &IndexMap<String, Value>) -> Result<Value, EvalError> + Send + Sync>;

/// Extensible table of per-kind evaluation functions.
///
/// Literal and texture kinds are handled by the evaluator core; everything
/// else must be registered here or evaluation fails with
/// [`EvalError::NonDataNode`].
#[derive(Default)]
pub struct Evaluators {
    fns: HashMap<String, EvalFn>,
}

impl Evaluators {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an evaluation function for a node kind
    pub fn register<F>(&mut self, kind: &NodeKind, f: F)
    where
        F: Fn(&Node, &IndexMap<String, Value>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.fns.insert(kind.key().to_string(), Box::new(f));
    }

    fn get(&self, kind: &NodeKind) -> Option<&EvalFn> {
        self.fns.get(kind.key())
    }
}

/// One resolution pass's evaluation state: the per-node memo cache and the
/// in-progress set for cycle detection.
///
/// Exclusively owned by one pass; never reuse a session across unrelated
/// resolutions.
#[derive(Debug, Default)]
pub struct EvalSession {
    cache: HashMap<NodeId, Value>,
    visiting: HashSet<NodeId>,
}

impl EvalSession {
    /// Start a fresh pass
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value for a node, if it was evaluated this pass
    pub fn cached(&self, node_id: NodeId) -> Option<&Value> {
        self.cache.get(&node_id)
    }
}

/// Evaluate a data-producing node to a concrete value.
///
/// - Cache hits return the memoized value: a node referenced by multiple
///   downstream consumers evaluates at most once per pass.
/// - Revisiting a node already on the in-progress path fails with
///   [`EvalError::Cycle`].
/// - Literal kinds return their stored literal; texture kinds map their
///   stored key through the registry and return the handle, not the key.
/// - Other kinds dispatch through the [`Evaluators`] table over the node's
///   own resolved data inputs. An input with no incoming edge falls back to
///   its configured default; one with neither, or one fed by a wiring-only
///   node, is simply absent.
pub fn evaluate(
    graph: &Graph,
    node: &Node,
    session: &mut EvalSession,
    textures: &TextureRegistry,
    evaluators: &Evaluators,
) -> Result<Value, EvalError> {
    if let Some(value) = session.cache.get(&node.id) {
        return Ok(value.clone());
    }
    if session.visiting.contains(&node.id) {
        return Err(EvalError::Cycle(node.id));
    }

    session.visiting.insert(node.id);
    let result = evaluate_uncached(graph, node, session, textures, evaluators);
    session.visiting.remove(&node.id);

    let value = result?;
    session.cache.insert(node.id, value.clone());
    Ok(value)
}

fn evaluate_uncached(
    graph: &Graph,
    node: &Node,
    session: &mut EvalSession,
    textures: &TextureRegistry,
    evaluators: &Evaluators,
) -> Result<Value, EvalError> {
    if node.kind.is_literal() {
        return node.value.clone().ok_or_else(|| non_data(node));
    }

    if node.kind.is_texture() {
        let value = node.value.as_ref().ok_or_else(|| non_data(node))?;
        let key = value.as_str().ok_or_else(|| EvalError::BadTextureKey {
            node: node.id,
            found: value.kind_name(),
        })?;
        let handle = textures
            .get(key)
            .ok_or_else(|| EvalError::UnknownTexture(key.to_string()))?;
        return Ok(Value::Texture(handle));
    }

    let Some(eval_fn) = evaluators.get(&node.kind) else {
        return Err(non_data(node));
    };

    // Resolve the node's own data inputs: incoming edge wins, then the
    // configured default; inputs with neither are absent from the map. An
    // edge from a wiring-only upstream (no evaluation function) carries no
    // data, so that input is absent too rather than failing the node.
    let mut inputs = IndexMap::new();
    for input in &node.inputs {
        let value = match graph.edge_into(node.id, &input.name) {
            Some(edge) => {
                let upstream = graph.node(edge.from).ok_or(EvalError::MissingNode(edge.from))?;
                match evaluate(graph, upstream, session, textures, evaluators) {
                    Ok(value) => Some(value),
                    Err(EvalError::NonDataNode { .. }) => None,
                    Err(err) => return Err(err),
                }
            }
            None => input.default.clone(),
        };
        if let Some(value) = value {
            inputs.insert(input.name.clone(), value);
        }
    }

    eval_fn(node, &inputs)
}

fn non_data(node: &Node) -> EvalError {
    EvalError::NonDataNode {
        node: node.id,
        kind: node.kind.key().to_string(),
    }
}
