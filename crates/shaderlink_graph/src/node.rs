// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::id::NodeId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Shader pipeline stage a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Vertex program
    Vertex,
    /// Fragment program
    Fragment,
}

/// Node kind tag.
///
/// Dispatch on kind is by variant, not by string comparison; pluggable
/// kinds use [`NodeKind::Custom`] and register an evaluation function with
/// the binding layer's evaluator table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Program sink for one stage
    Output,
    /// GLSL source node (pure code wiring, no runtime value)
    Source,
    /// Engine physical-material node
    PhysicalMaterial,
    /// Scalar literal
    Number,
    /// 2D vector literal
    Vector2,
    /// 3D vector literal
    Vector3,
    /// 4D vector literal
    Vector4,
    /// Color literal
    Color,
    /// 2D texture lookup key
    Texture,
    /// Cube-map texture lookup key
    SamplerCube,
    /// Pluggable kind, evaluated through a registered function
    Custom(String),
}

impl NodeKind {
    /// Whether this kind carries its value as a stored literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Number | Self::Vector2 | Self::Vector3 | Self::Vector4 | Self::Color
        )
    }

    /// Whether this kind stores a texture-registry lookup key
    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture | Self::SamplerCube)
    }

    /// Stable key for evaluator-table registration
    pub fn key(&self) -> &str {
        match self {
            Self::Output => "output",
            Self::Source => "source",
            Self::PhysicalMaterial => "physical",
            Self::Number => "number",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::Color => "color",
            Self::Texture => "texture",
            Self::SamplerCube => "samplerCube",
            Self::Custom(key) => key,
        }
    }
}

/// A named input on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSocket {
    /// Wire name, unique within the node (what edges reference)
    pub name: String,
    /// Display name, used for runtime parameter naming
    pub display_name: String,
    /// Route the bound value to the material property map instead of the
    /// uniform map
    pub property: bool,
    /// Fallback literal when no edge feeds this input
    pub default: Option<Value>,
}

impl InputSocket {
    /// Create a new input socket; the display name defaults to the wire name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            property: false,
            default: None,
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Mark as a material property rather than a uniform
    pub fn property(mut self) -> Self {
        self.property = true;
        self
    }

    /// Set the default literal
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A named output on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSocket {
    /// Output name, unique within the node
    pub name: String,
}

impl OutputSocket {
    /// Create a new output socket
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// Pipeline stage
    pub stage: Stage,
    /// Input sockets
    pub inputs: Vec<InputSocket>,
    /// Output sockets
    pub outputs: Vec<OutputSocket>,
    /// Stored literal or texture lookup key, for data-producing kinds
    pub value: Option<Value>,
    /// GLSL text, for source-bearing kinds; opaque to this crate
    pub source: Option<String>,
    /// Tag linking the two stage-halves of one logical node. Informational
    /// only; traversal never follows it
    pub group: Option<u64>,
    /// The node's counterpart in the other stage, if any
    pub linked: Option<NodeId>,
}

impl Node {
    fn bare(id: NodeId, name: impl Into<String>, kind: NodeKind, stage: Stage) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            stage,
            inputs: Vec::new(),
            outputs: Vec::new(),
            value: None,
            source: None,
            group: None,
            linked: None,
        }
    }

    /// Create the program sink for a stage
    pub fn output(id: NodeId, name: impl Into<String>, stage: Stage) -> Self {
        let input = match stage {
            Stage::Fragment => InputSocket::new("frag_out"),
            Stage::Vertex => InputSocket::new("gl_position"),
        };
        Self::bare(id, name, NodeKind::Output, stage).with_inputs(vec![input])
    }

    /// Create a GLSL source node
    pub fn source(
        id: NodeId,
        name: impl Into<String>,
        stage: Stage,
        source: impl Into<String>,
    ) -> Self {
        let mut node = Self::bare(id, name, NodeKind::Source, stage);
        node.source = Some(source.into());
        node.outputs.push(OutputSocket::new("out"));
        node
    }

    /// Create an engine physical-material node
    pub fn physical(id: NodeId, name: impl Into<String>, group: u64, stage: Stage) -> Self {
        let mut node = Self::bare(id, name, NodeKind::PhysicalMaterial, stage);
        node.group = Some(group);
        node.outputs.push(OutputSocket::new("out"));
        node
    }

    /// Create a literal-bearing data node
    pub fn literal(id: NodeId, name: impl Into<String>, stage: Stage, value: Value) -> Self {
        let kind = match value {
            Value::Vector2(_) => NodeKind::Vector2,
            Value::Vector3(_) => NodeKind::Vector3,
            Value::Vector4(_) => NodeKind::Vector4,
            Value::Color(_) => NodeKind::Color,
            _ => NodeKind::Number,
        };
        let mut node = Self::bare(id, name, kind, stage);
        node.value = Some(value);
        node.outputs.push(OutputSocket::new("out"));
        node
    }

    /// Create a texture node storing a registry lookup key
    pub fn texture(id: NodeId, name: impl Into<String>, stage: Stage, key: impl Into<String>) -> Self {
        let mut node = Self::bare(id, name, NodeKind::Texture, stage);
        node.value = Some(Value::String(key.into()));
        node.outputs.push(OutputSocket::new("out"));
        node
    }

    /// Set the input sockets
    pub fn with_inputs(mut self, inputs: Vec<InputSocket>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the output sockets
    pub fn with_outputs(mut self, outputs: Vec<OutputSocket>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Set the node kind, for pluggable kinds
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Link to the node's counterpart in the other stage
    pub fn with_linked(mut self, linked: NodeId) -> Self {
        self.linked = Some(linked);
        self
    }

    /// The first declared output, if any
    pub fn first_output(&self) -> Option<&OutputSocket> {
        self.outputs.first()
    }

    /// Find an input socket by wire name
    pub fn input(&self, name: &str) -> Option<&InputSocket> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(NodeKind::Vector2.is_literal());
        assert!(!NodeKind::Texture.is_literal());
        assert!(NodeKind::SamplerCube.is_texture());
        assert!(!NodeKind::Source.is_texture());
    }

    #[test]
    fn test_custom_kind_key() {
        let kind = NodeKind::Custom("noise".to_string());
        assert_eq!(kind.key(), "noise");
    }

    #[test]
    fn test_literal_constructor_picks_kind() {
        let node = Node::literal(NodeId(0), "start", Stage::Fragment, Value::Vector2([0.0, 1.0]));
        assert_eq!(node.kind, NodeKind::Vector2);
        assert!(node.first_output().is_some());
    }

    #[test]
    fn test_input_lookup_is_by_wire_name() {
        let node = Node::output(NodeId(1), "Output", Stage::Fragment).with_inputs(vec![
            InputSocket::new("property_normalMap").with_display_name("normalMap"),
        ]);
        assert!(node.input("property_normalMap").is_some());
        assert!(node.input("normalMap").is_none());
    }
}
