// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session-scoped id allocation for nodes and edges.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates fresh node and edge ids for one authoring/compilation session.
///
/// Ids are sequential and unique within the allocator, not across
/// allocators. Graph construction threads one of these through every
/// `make_*` call instead of relying on a global counter, so two sessions
/// never contend or collide.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a new allocator starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh node id
    pub fn next_node(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    /// Allocate a fresh edge id
    pub fn next_edge(&mut self) -> EdgeId {
        EdgeId(self.bump())
    }

    /// Allocate a fresh raw id, for group tags and the like
    pub fn next_raw(&mut self) -> u64 {
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
