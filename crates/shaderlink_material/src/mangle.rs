// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runtime parameter name mangling.
//!
//! Two node instances of the same kind declare same-named parameters; the
//! compiler disambiguates by suffixing the owning node's id, and the
//! binding layer must produce byte-identical names so resolved values line
//! up with declared parameters 1:1.

use crate::engine::Engine;
use shaderlink_graph::Node;

/// Mangle a display name into the runtime parameter name the compiler
/// emitted for the owning node.
///
/// Engine built-ins (matrices, attributes) pass through unmangled; every
/// other name gets the owning node's id appended, for every node kind
/// uniformly.
pub fn mangle_name(display_name: &str, engine: &dyn Engine, owner: &Node) -> String {
    if engine.is_reserved(display_name) {
        display_name.to_string()
    } else {
        format!("{}_{}", display_name, owner.id)
    }
}
