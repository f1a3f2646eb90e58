// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph-to-material binding layer for shaderlink.
//!
//! Given a compiled shader graph, this crate determines which graph nodes
//! feed runtime-settable parameters, evaluates their values, mangles their
//! names to match the compiler's emitted declarations, and assembles a
//! renderer material with a documented merge precedence.
//!
//! ## Architecture
//!
//! - [`engine`] — the renderer abstraction: reserved identifiers, the
//!   data-input predicate, default uniform blocks
//! - [`compiler`] — the external graph-compiler collaborator contract
//! - [`resolver`] — backward reachability from the program sinks to the
//!   runtime-settable inputs
//! - [`evaluate`] — memoized, cycle-guarded node evaluation
//! - [`mangle`] — collision-free runtime parameter naming
//! - [`material`] — uniform/property maps, ordered merge, the material object
//! - [`assembler`] — the full binding pass producing a material
//! - [`binder`] — compile supersession via a generation counter
//! - [`updater`] — per-frame in-place mutation of time-varying uniforms

pub mod assembler;
pub mod binder;
pub mod compiler;
pub mod engine;
pub mod evaluate;
pub mod mangle;
pub mod material;
pub mod resolver;
pub mod updater;

pub use assembler::{assemble, Assembled, AssembleOptions};
pub use binder::{BindError, BindStats, MaterialBinder};
pub use compiler::{CompileError, CompileOutput, GraphCompiler};
pub use engine::{Engine, WebGlEngine};
pub use evaluate::{evaluate, EvalError, EvalFn, EvalSession, Evaluators, TextureRegistry};
pub use mangle::mangle_name;
pub use material::{merge_uniforms, Material, MaterialSpec, PropertyMap, Uniform, UniformMap};
pub use resolver::{resolve_data_inputs, DataInputMap};
pub use updater::FrameUpdater;
