// SPDX-License-Identifier: MIT OR Apache-2.0
//! The renderer material object and its uniform/property maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shaderlink_graph::Value;

/// A single runtime-settable shader parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uniform {
    /// Current value; the per-frame updater mutates this in place
    pub value: Value,
}

impl Uniform {
    /// Wrap a value as a uniform entry
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

/// Ordered uniform map: mangled name → uniform.
///
/// Insertion order is preserved so merge precedence and declaration order
/// stay deterministic.
pub type UniformMap = IndexMap<String, Uniform>;

/// Ordered property map: material field name → value
pub type PropertyMap = IndexMap<String, Value>;

/// Merge uniform layers in precedence order; a later layer wins on name
/// collision.
///
/// Callers pass layers as `engine defaults < graph-resolved < overrides`.
pub fn merge_uniforms(layers: &[&UniformMap]) -> UniformMap {
    let mut merged = UniformMap::new();
    for layer in layers {
        for (name, uniform) in layer.iter() {
            merged.insert(name.clone(), uniform.clone());
        }
    }
    merged
}

/// Remove a leading version-pragma line from shader source.
///
/// Only a pragma on the very first line is removed; the target runtime
/// supplies its own directive and a duplicate would be rejected.
pub fn strip_version_pragma(source: &str, pragma: &str) -> String {
    let trimmed = source.trim_start_matches(['\n', '\r']);
    if let Some(rest) = trimmed.strip_prefix(pragma) {
        rest.trim_start_matches(['\n', '\r']).to_string()
    } else {
        source.to_string()
    }
}

/// The vetted "initial" property set a material is constructed with
#[derive(Debug, Clone)]
pub struct MaterialSpec {
    /// Material display name
    pub name: String,
    /// Whether the material participates in scene lighting
    pub lights: bool,
    /// Merged uniform map
    pub uniforms: UniformMap,
    /// Transparency flag
    pub transparent: bool,
    /// Opacity
    pub opacity: f32,
    /// Vertex program text
    pub vertex_shader: String,
    /// Fragment program text
    pub fragment_shader: String,
}

/// Property names that may never be assigned as material extras.
///
/// `uuid` and `type` are identity the renderer owns, `precision` injects a
/// precision pragma, and `defines` alters preprocessor state behind the
/// shader text's back.
const EXTRA_DENYLIST: [&str; 4] = ["uuid", "type", "precision", "defines"];

/// Keys covered by the initial construction step
const INITIAL_KEYS: [&str; 7] = [
    "name",
    "lights",
    "uniforms",
    "transparent",
    "opacity",
    "vertex_shader",
    "fragment_shader",
];

/// The final renderer material.
///
/// Built in two phases: construction from a [`MaterialSpec`], then
/// individual assignment of engine-specific extras through
/// [`Material::set_extra`], which filters a denylist so renderer-internal
/// fields can never be clobbered.
#[derive(Debug, Clone)]
pub struct Material {
    /// Material display name
    pub name: String,
    /// Whether the material participates in scene lighting
    pub lights: bool,
    /// Uniform map; shared identity with the map handed to the updater
    pub uniforms: UniformMap,
    /// Transparency flag
    pub transparent: bool,
    /// Opacity
    pub opacity: f32,
    /// Vertex program text
    pub vertex_shader: String,
    /// Fragment program text
    pub fragment_shader: String,
    extra: PropertyMap,
}

impl Material {
    /// Construct from the initial property set
    pub fn new(spec: MaterialSpec) -> Self {
        Self {
            name: spec.name,
            lights: spec.lights,
            uniforms: spec.uniforms,
            transparent: spec.transparent,
            opacity: spec.opacity,
            vertex_shader: spec.vertex_shader,
            fragment_shader: spec.fragment_shader,
            extra: PropertyMap::new(),
        }
    }

    /// Assign an engine-specific extra property.
    ///
    /// Returns `false` (and leaves the material untouched) for denylisted
    /// names: private-prefixed, renderer identity fields, the precision
    /// marker, the defines collection, and any key the initial set covers.
    pub fn set_extra(&mut self, key: &str, value: Value) -> bool {
        if key.starts_with('_')
            || EXTRA_DENYLIST.contains(&key)
            || INITIAL_KEYS.contains(&key)
        {
            tracing::debug!(key, "rejected denylisted material property");
            return false;
        }
        self.extra.insert(key.to_string(), value);
        true
    }

    /// The accepted extra properties
    pub fn extra(&self) -> &PropertyMap {
        &self.extra
    }

    /// Look up a uniform by mangled name
    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    /// Look up a uniform mutably by mangled name
    pub fn uniform_mut(&mut self, name: &str) -> Option<&mut Uniform> {
        self.uniforms.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MaterialSpec {
        MaterialSpec {
            name: "test".to_string(),
            lights: true,
            uniforms: UniformMap::new(),
            transparent: true,
            opacity: 1.0,
            vertex_shader: String::new(),
            fragment_shader: String::new(),
        }
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let mut defaults = UniformMap::new();
        defaults.insert("opacity".to_string(), Uniform::new(Value::Float(1.0)));
        defaults.insert("time".to_string(), Uniform::new(Value::Float(0.0)));
        let mut resolved = UniformMap::new();
        resolved.insert("opacity".to_string(), Uniform::new(Value::Float(0.5)));
        let mut overrides = UniformMap::new();
        overrides.insert("time".to_string(), Uniform::new(Value::Float(9.0)));

        let merged = merge_uniforms(&[&defaults, &resolved, &overrides]);
        assert_eq!(merged["opacity"].value, Value::Float(0.5));
        assert_eq!(merged["time"].value, Value::Float(9.0));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_strip_version_pragma_leading_only() {
        let stripped = strip_version_pragma("#version 300 es\nvoid main() {}", "#version 300 es");
        assert_eq!(stripped, "void main() {}");
        // A pragma not at the top is someone else's problem.
        let kept = strip_version_pragma("void main() {}\n#version 300 es", "#version 300 es");
        assert!(kept.contains("#version 300 es"));
    }

    #[test]
    fn test_extra_denylist() {
        let mut material = Material::new(spec());
        assert!(!material.set_extra("_private", Value::Bool(true)));
        assert!(!material.set_extra("uuid", Value::String("x".to_string())));
        assert!(!material.set_extra("type", Value::String("x".to_string())));
        assert!(!material.set_extra("precision", Value::String("highp".to_string())));
        assert!(!material.set_extra("defines", Value::Bool(true)));
        assert!(!material.set_extra("uniforms", Value::Bool(true)));
        assert!(material.extra().is_empty());

        assert!(material.set_extra("roughness", Value::Float(0.0)));
        assert_eq!(material.extra()["roughness"], Value::Float(0.0));
    }
}
