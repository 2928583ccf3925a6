//! Groove DOM - Document Object Model
//!
//! Single-threaded, arena-backed DOM that the accessibility engine runs
//! against. Provides only what focus management and live regions consume:
//! - Element tree with attributes and document order
//! - Focused element tracking
//! - Event listeners with handles, bubbling dispatch and `preventDefault`
//! - Host-driven timer queue on a virtual clock
//! - Text mutation records for live-region observation

mod node;
mod tree;
mod document;
pub mod events;
pub mod geometry;
pub mod observer;
pub mod timers;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::DomTree;
pub use document::{Document, DocumentStats};
pub use events::{Event, EventKind, Key, KeyModifiers, Listener, ListenerId};
pub use geometry::DomRect;
pub use observer::TextMutation;
pub use timers::{TimerId, TimerQueue};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node {0}")]
    InvalidNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
