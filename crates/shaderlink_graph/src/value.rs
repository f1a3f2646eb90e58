// SPDX-License-Identifier: MIT OR Apache-2.0
//! Literal values and texture handles flowing through the graph.

use serde::{Deserialize, Serialize};

/// Opaque handle to a renderer-owned texture.
///
/// The graph never stores renderer textures directly; texture nodes store a
/// string lookup key and the binding layer maps it to one of these through
/// a host-supplied registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// Value produced by evaluating a data node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Color (RGB)
    Color([f32; 3]),
    /// Renderer texture handle
    Texture(TextureId),
    /// String, used by texture nodes as the registry lookup key
    String(String),
}

impl Value {
    /// Short name of the variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Vector2(_) => "vector2",
            Self::Vector3(_) => "vector3",
            Self::Vector4(_) => "vector4",
            Self::Color(_) => "color",
            Self::Texture(_) => "texture",
            Self::String(_) => "string",
        }
    }

    /// The texture lookup key, if this value is a string key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Float(1.0).kind_name(), "float");
        assert_eq!(Value::Texture(TextureId(3)).kind_name(), "texture");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::Vector2([-0.2307, 0.6923]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
