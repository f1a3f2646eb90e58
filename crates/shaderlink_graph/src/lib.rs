// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph model for shaderlink.
//!
//! This crate provides the node-and-edge graph that the binding layer
//! (`shaderlink_material`) resolves against:
//! - Nodes with typed kinds, stage tags and named input/output sockets
//! - Edges wiring one node's output into another node's named input
//! - Literal values and opaque texture handles
//! - Session-scoped id allocation
//!
//! ## Architecture
//!
//! A [`Graph`] holds one vertex-stage and one fragment-stage DAG, each
//! rooted at a single output sink. The model is renderer-agnostic: nothing
//! here knows about uniforms, materials, or GLSL. Graphs serialize with
//! serde so they can round-trip through authoring tools.

pub mod edge;
pub mod graph;
pub mod id;
pub mod node;
pub mod value;

pub use edge::{make_edge, Edge};
pub use graph::{Graph, GraphError};
pub use id::{EdgeId, IdAllocator, NodeId};
pub use node::{InputSocket, Node, NodeKind, OutputSocket, Stage};
pub use value::{TextureId, Value};
