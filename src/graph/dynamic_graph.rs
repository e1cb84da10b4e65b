use hashbrown::HashMap;
use crate::error::{SamplingError, Result};
use super::NodeId;

/// Undirected graph backed by unordered adjacency vectors.
///
/// Insertion, removal and lookup of an edge cost O(deg) of the source endpoint;
/// removal swaps the last neighbor into the vacated slot, so neighbor order is
/// not stable across mutations. A node exists only while its degree is positive.
#[derive(Debug, Clone, Default)]
pub struct DynamicGraph {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    num_edges: usize,
}

impl DynamicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the undirected edge `u - v`.
    ///
    /// Returns `Ok(false)` when the edge is already present.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        if u == v {
            return Err(SamplingError::SelfLoop(u));
        }
        if self.has_edge(u, v) {
            return Ok(false);
        }

        self.adjacency.entry(u).or_default().push(v);
        self.adjacency.entry(v).or_default().push(u);
        self.num_edges += 1;
        Ok(true)
    }

    /// Remove the undirected edge `u - v`, returning whether it was present.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        if !self.has_edge(u, v) {
            return false;
        }

        self.detach(u, v);
        self.detach(v, u);
        self.num_edges -= 1;
        true
    }

    fn detach(&mut self, source: NodeId, target: NodeId) {
        let emptied = match self.adjacency.get_mut(&source) {
            Some(neighbors) => {
                if let Some(pos) = neighbors.iter().position(|&n| n == target) {
                    neighbors.swap_remove(pos);
                }
                neighbors.is_empty()
            }
            None => false,
        };
        if emptied {
            self.adjacency.remove(&source);
        }
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency
            .get(&u)
            .map(|neighbors| neighbors.contains(&v))
            .unwrap_or(false)
    }

    pub fn degree(&self, u: NodeId) -> usize {
        self.adjacency.get(&u).map(Vec::len).unwrap_or(0)
    }

    /// Borrowed view of the neighbors of `u`; empty when `u` is absent.
    pub fn neighbor_slice(&self, u: NodeId) -> &[NodeId] {
        self.adjacency.get(&u).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Snapshot of the neighbors of `u`.
    pub fn neighbors(&self, u: NodeId) -> Vec<NodeId> {
        self.neighbor_slice(u).to_vec()
    }

    /// Snapshot of all nodes with positive degree.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.adjacency.keys().copied().collect()
    }

    /// Every undirected edge, reported once per direction.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.adjacency
            .iter()
            .flat_map(|(&src, neighbors)| neighbors.iter().map(move |&dst| (src, dst)))
            .collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn is_empty(&self) -> bool {
        self.num_edges == 0
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.num_edges = 0;
    }
}
