// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contract for the external graph-compiler collaborator.
//!
//! shaderlink consumes a compiler, it never reimplements one. The
//! collaborator parses each node's GLSL, wires program sections together,
//! and emits one vertex and one fragment program whose parameter
//! declarations use the same mangling scheme as [`crate::mangle`].

use shaderlink_graph::{Graph, NodeId};

/// Compiler output for one graph version.
///
/// Superseded wholesale by the next compile; nothing in here is patched
/// incrementally.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Generated vertex program text
    pub vertex: String,
    /// Generated fragment program text
    pub fragment: String,
    /// The vertex-stage sink node that survived compilation
    pub vertex_sink: NodeId,
    /// The fragment-stage sink node that survived compilation
    pub fragment_sink: NodeId,
}

/// Failure reported by the compiler collaborator.
///
/// Propagated to the caller uncaught; a failed compile must leave any
/// previously assigned material untouched.
#[derive(Debug, thiserror::Error)]
#[error("graph compile failed: {0}")]
pub struct CompileError(pub String);

/// The external graph compiler.
///
/// Compilation is two calls: an async context computation (which may
/// suspend, e.g. to introspect the renderer) followed by a synchronous
/// compile of the graph against that context.
pub trait GraphCompiler {
    /// Engine/runtime context threaded into the compile
    type Context;

    /// Compute the compile context for a graph
    fn compute_context(
        &self,
        graph: &Graph,
    ) -> impl std::future::Future<Output = Result<Self::Context, CompileError>> + Send;

    /// Compile the graph to program texts and surviving sinks
    fn compile(&self, context: &Self::Context, graph: &Graph)
        -> Result<CompileOutput, CompileError>;
}
