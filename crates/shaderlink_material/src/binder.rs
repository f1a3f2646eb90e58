// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compile supersession: at most one compile result is current per graph
//! version.
//!
//! Compilation is asynchronous and may suspend. If a new rebind is
//! requested while a prior compile is in flight, the newer request
//! supersedes it: the stale result, when it eventually resolves, is
//! detected through a generation counter and discarded instead of being
//! applied out of order.

use crate::assembler::{assemble, Assembled, AssembleOptions};
use crate::compiler::{CompileError, GraphCompiler};
use crate::engine::Engine;
use crate::evaluate::{Evaluators, TextureRegistry};
use crate::resolver::resolve_data_inputs;
use parking_lot::RwLock;
use shaderlink_graph::Graph;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Error from a rebind
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The external compiler rejected the graph; nothing was applied
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Running statistics for a binder
#[derive(Debug, Clone, Default)]
pub struct BindStats {
    /// Compiles that produced a material
    pub compiles: u64,
    /// Stale compile results discarded
    pub superseded: u64,
    /// Bindings skipped across all passes because evaluation failed
    pub bindings_skipped: u64,
}

/// Drives compile-then-assemble passes and enforces the supersede rule.
///
/// The binder never holds the material itself; ownership of the assembled
/// material passes to the host on every successful rebind. Because a stale
/// pass can never return a material, resolution is never live twice for
/// the same graph and the evaluation session needs no locking.
#[derive(Debug, Default)]
pub struct MaterialBinder {
    generation: AtomicU64,
    stats: Arc<RwLock<BindStats>>,
}

impl MaterialBinder {
    /// Create a new binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the graph and assemble a material from it.
    ///
    /// Returns `Ok(None)` if another rebind started while this one's
    /// compile was in flight; the stale result is discarded and the host
    /// keeps its current material. Compile failures propagate without
    /// touching any state.
    pub async fn rebind<C: GraphCompiler>(
        &self,
        compiler: &C,
        graph: &Graph,
        engine: &dyn Engine,
        textures: &TextureRegistry,
        evaluators: &Evaluators,
        options: AssembleOptions,
    ) -> Result<Option<Assembled>, BindError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let context = compiler.compute_context(graph).await?;
        let compiled = compiler.compile(&context, graph)?;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded compile result");
            self.stats.write().superseded += 1;
            return Ok(None);
        }

        let data_inputs = resolve_data_inputs(
            graph,
            &[compiled.fragment_sink, compiled.vertex_sink],
            engine,
        );
        let assembled = assemble(
            graph,
            &compiled,
            &data_inputs,
            engine,
            textures,
            evaluators,
            options,
        );

        let mut stats = self.stats.write();
        stats.compiles += 1;
        stats.bindings_skipped += assembled.skipped as u64;
        drop(stats);

        Ok(Some(assembled))
    }

    /// Snapshot of the binder statistics
    pub fn stats(&self) -> BindStats {
        self.stats.read().clone()
    }
}
