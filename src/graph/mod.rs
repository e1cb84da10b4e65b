pub mod dynamic_graph;
pub mod tests;

pub use dynamic_graph::DynamicGraph;

/// Identifier of a vertex in the edge stream.
pub type NodeId = u64;

/// Undirected edge in canonical `(min, max)` order.
pub type Edge = (NodeId, NodeId);

/// Canonical representation of the undirected pair `{u, v}`.
#[inline]
pub fn canonical_edge(u: NodeId, v: NodeId) -> Edge {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}
