// SPDX-License-Identifier: MIT OR Apache-2.0
//! Target-engine abstraction.
//!
//! The binding layer is engine-agnostic: everything renderer-specific —
//! which identifiers are built in, which node inputs are runtime-settable,
//! which uniform blocks a lit material starts from — comes through this
//! trait.

use crate::material::{Uniform, UniformMap};
use shaderlink_graph::{InputSocket, Value};

/// A target renderer engine.
///
/// Engines are shared read-only across async rebinds, hence the
/// `Send + Sync` bound.
pub trait Engine: Send + Sync {
    /// Engine name, for diagnostics
    fn name(&self) -> &str;

    /// Whether `name` is an engine built-in (matrices, attributes) that
    /// must pass through the mangler unchanged
    fn is_reserved(&self, name: &str) -> bool;

    /// Whether an input accepts a runtime value rather than pure shader
    /// wiring
    fn is_data_input(&self, input: &InputSocket) -> bool;

    /// Built-in uniform blocks merged below graph-resolved values, in order
    fn default_uniform_blocks(&self) -> Vec<UniformMap>;

    /// Version pragma to strip from shader texts when the runtime supplies
    /// its own directive
    fn version_pragma(&self) -> Option<&str> {
        None
    }
}

/// Identifiers the WebGL runtime declares itself; mangling them would break
/// the 1:1 line-up with the compiled program text.
const RESERVED: [&str; 10] = [
    "modelMatrix",
    "modelViewMatrix",
    "projectionMatrix",
    "viewMatrix",
    "normalMatrix",
    "cameraPosition",
    "position",
    "normal",
    "uv",
    "time",
];

/// WebGL2-style target engine.
///
/// Classifies property-flagged inputs and `uniform_`-prefixed sockets as
/// data inputs, and supplies the lighting uniform block a lit physical
/// material starts from.
#[derive(Debug, Default)]
pub struct WebGlEngine;

impl WebGlEngine {
    /// Create the engine
    pub fn new() -> Self {
        Self
    }
}

impl Engine for WebGlEngine {
    fn name(&self) -> &str {
        "webgl"
    }

    fn is_reserved(&self, name: &str) -> bool {
        RESERVED.contains(&name)
    }

    fn is_data_input(&self, input: &InputSocket) -> bool {
        input.property || input.name.starts_with("uniform_")
    }

    fn default_uniform_blocks(&self) -> Vec<UniformMap> {
        let mut common = UniformMap::new();
        common.insert("diffuse".into(), Uniform::new(Value::Color([1.0, 1.0, 1.0])));
        common.insert("opacity".into(), Uniform::new(Value::Float(1.0)));

        let mut lights = UniformMap::new();
        lights.insert(
            "ambientLightColor".into(),
            Uniform::new(Value::Color([0.0, 0.0, 0.0])),
        );
        lights.insert(
            "lightProbe".into(),
            Uniform::new(Value::Vector3([0.0, 0.0, 0.0])),
        );

        let mut physical = UniformMap::new();
        physical.insert(
            "emissive".into(),
            Uniform::new(Value::Color([0.0, 0.0, 0.0])),
        );
        physical.insert("roughness".into(), Uniform::new(Value::Float(1.0)));
        physical.insert("metalness".into(), Uniform::new(Value::Float(0.0)));
        physical.insert("ior".into(), Uniform::new(Value::Float(1.5)));

        vec![common, lights, physical]
    }

    fn version_pragma(&self) -> Option<&str> {
        Some("#version 300 es")
    }
}
