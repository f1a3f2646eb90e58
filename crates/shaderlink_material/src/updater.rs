// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame mutation of time-varying uniforms.
//!
//! The updater owns a slice of the assembled material's parameter set for
//! the render loop's lifetime. Each tick it rewrites the `value` field of
//! pre-registered entries in place; the uniform map container itself is
//! never replaced, so renderer-side caches referencing it stay valid.

use crate::material::UniformMap;
use shaderlink_graph::Value;

/// Pure function of elapsed time producing a uniform value
pub type UniformAnimator = Box<dyn Fn(f32) -> Value + Send>;

/// Ticks registered time-varying uniforms on the host's animation callback.
///
/// Runs in O(registered entries) per tick and allocates nothing
/// proportional to graph size; it never traverses the graph or re-invokes
/// the evaluator.
#[derive(Default)]
pub struct FrameUpdater {
    entries: Vec<(String, UniformAnimator)>,
}

impl FrameUpdater {
    /// Create an updater with no registered entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animator for a mangled uniform name
    pub fn register(&mut self, name: impl Into<String>, animator: UniformAnimator) {
        self.entries.push((name.into(), animator));
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update registered entries' values in place.
    ///
    /// Names without a matching uniform are left alone; the updater never
    /// inserts or removes map entries.
    pub fn tick(&self, uniforms: &mut UniformMap, time_secs: f32) {
        for (name, animator) in &self.entries {
            if let Some(uniform) = uniforms.get_mut(name) {
                uniform.value = animator(time_secs);
            }
        }
    }
}
