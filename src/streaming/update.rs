use serde::{Deserialize, Serialize};
use crate::graph::{canonical_edge, Edge, NodeId};

/// One mutation of the true edge stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeUpdate {
    pub node_u: NodeId,
    pub node_v: NodeId,
    pub is_add: bool,
    pub timestamp: Option<u64>,
}

impl EdgeUpdate {
    pub fn add(node_u: NodeId, node_v: NodeId) -> Self {
        Self {
            node_u,
            node_v,
            is_add: true,
            timestamp: None,
        }
    }

    pub fn remove(node_u: NodeId, node_v: NodeId) -> Self {
        Self {
            node_u,
            node_v,
            is_add: false,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The updated edge in `(min, max)` order.
    pub fn edge(&self) -> Edge {
        canonical_edge(self.node_u, self.node_v)
    }

    pub fn is_self_loop(&self) -> bool {
        self.node_u == self.node_v
    }
}
