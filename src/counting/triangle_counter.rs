use hashbrown::HashMap;
use crate::error::{SamplingError, Result};
use crate::graph::{DynamicGraph, NodeId};
use crate::streaming::EdgeUpdate;
use super::edge_index::EdgeIdIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delta {
    Add,
    Remove,
}

/// Exact triangle count of a sample graph, maintained by deltas.
///
/// Protocol per stream update:
/// 1. [`new_update`](Self::new_update) exactly once, whatever the sampling outcome;
/// 2. [`add_edge_sample`](Self::add_edge_sample) / [`remove_edge_sample`](Self::remove_edge_sample)
///    when the edge enters or leaves the sample;
/// 3. [`add_triangles`](Self::add_triangles) / [`remove_triangles`](Self::remove_triangles)
///    to account for the triangles closed by that edge.
///
/// Steps 2 and 3 are independent: the triangle deltas never touch the sample graph.
#[derive(Debug, Clone)]
pub struct TriangleCounter {
    local: bool,
    graph: DynamicGraph,
    edge_ids: EdgeIdIndex,
    triangles: u64,
    triangles_weight: f64,
    triangles_local: HashMap<NodeId, u64>,
    triangles_weight_local: HashMap<NodeId, f64>,
    // Size of the true graph, not of the sample
    edges_present_original: u64,
    edge_weights: HashMap<u64, f64>,
}

impl TriangleCounter {
    pub fn new(local: bool) -> Self {
        Self {
            local,
            graph: DynamicGraph::new(),
            edge_ids: EdgeIdIndex::default(),
            triangles: 0,
            triangles_weight: 0.0,
            triangles_local: HashMap::new(),
            triangles_weight_local: HashMap::new(),
            edges_present_original: 0,
            edge_weights: HashMap::new(),
        }
    }

    /// Counter whose node ids must stay below `max_node_id`.
    pub fn with_max_node_id(local: bool, max_node_id: u64) -> Result<Self> {
        let mut counter = Self::new(local);
        counter.edge_ids = EdgeIdIndex::new(max_node_id)?;
        Ok(counter)
    }

    /// Reset to the state of a freshly constructed counter.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.edge_ids.clear();
        self.triangles = 0;
        self.triangles_weight = 0.0;
        self.triangles_local.clear();
        self.triangles_weight_local.clear();
        self.edges_present_original = 0;
        self.edge_weights.clear();
    }

    /// Register a true-stream event.
    pub fn new_update(&mut self, update: &EdgeUpdate) -> Result<()> {
        if update.is_add {
            self.edges_present_original += 1;
        } else {
            self.edges_present_original = self
                .edges_present_original
                .checked_sub(1)
                .ok_or(SamplingError::EmptyStreamRemoval(update.node_u, update.node_v))?;
        }
        Ok(())
    }

    pub fn add_edge_sample(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        // Validate against the key space before touching the graph
        self.edge_ids.edge_id(u, v)?;
        let inserted = self.graph.add_edge(u, v)?;
        if inserted {
            self.edge_ids.insert(u, v)?;
        }
        Ok(inserted)
    }

    pub fn remove_edge_sample(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        self.edge_ids.edge_id(u, v)?;
        let removed = self.graph.remove_edge(u, v);
        if removed {
            self.edge_ids.remove(u, v)?;
        }
        Ok(removed)
    }

    /// Credit every sample triangle through `u - v` with `weight`.
    ///
    /// When edge weights are registered the passed weight is ignored and each
    /// triangle contributes the product of its three edge weights.
    pub fn add_triangles(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        self.apply_triangles(u, v, weight, Delta::Add)
    }

    pub fn remove_triangles(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        self.apply_triangles(u, v, weight, Delta::Remove)
    }

    fn apply_triangles(&mut self, u: NodeId, v: NodeId, weight: f64, delta: Delta) -> Result<()> {
        if u == v {
            return Err(SamplingError::SelfLoop(u));
        }
        let (min_node, max_node) = if self.graph.degree(u) <= self.graph.degree(v) {
            (u, v)
        } else {
            (v, u)
        };
        let weighted = !self.edge_weights.is_empty();

        for &n in self.graph.neighbor_slice(min_node) {
            if n == max_node || !self.edge_ids.contains(n, max_node) {
                continue;
            }
            let weight_to_use = if weighted {
                self.triangle_weight(u, v, n)?
            } else {
                weight
            };

            match delta {
                Delta::Add => {
                    self.triangles += 1;
                    self.triangles_weight += weight_to_use;
                }
                Delta::Remove => {
                    self.triangles = self.triangles.checked_sub(1).ok_or_else(|| {
                        SamplingError::invariant("triangle count dropped below zero")
                    })?;
                    self.triangles_weight -= weight_to_use;
                }
            }

            if self.local {
                for node in [u, v, n] {
                    let count = self.triangles_local.entry(node).or_insert(0);
                    let weight_sum = self.triangles_weight_local.entry(node).or_insert(0.0);
                    match delta {
                        Delta::Add => {
                            *count += 1;
                            *weight_sum += weight_to_use;
                        }
                        Delta::Remove => {
                            *count = count.checked_sub(1).ok_or_else(|| {
                                SamplingError::invariant(format!(
                                    "local triangle count of {} dropped below zero",
                                    node
                                ))
                            })?;
                            // Absorbs floating point drift
                            *weight_sum = (*weight_sum - weight_to_use).max(0.0);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn triangle_weight(&self, u: NodeId, v: NodeId, n: NodeId) -> Result<f64> {
        let mut product = 1.0;
        for (a, b) in [(u, v), (u, n), (v, n)] {
            let id = self.edge_ids.edge_id(a, b)?;
            let w = self
                .edge_weights
                .get(&id)
                .copied()
                .ok_or(SamplingError::MissingEdgeWeight(a, b))?;
            product *= w;
        }
        Ok(product)
    }

    /// Register the weight of `u - v`; any registered weight switches the
    /// counter to weighted triangles.
    pub fn add_edge_weight(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(SamplingError::invalid_parameter(format!(
                "edge weight must be positive and finite, got {}",
                weight
            )));
        }
        let id = self.edge_ids.edge_id(u, v)?;
        self.edge_weights.insert(id, weight);
        Ok(())
    }

    pub fn remove_edge_weight(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        let id = self.edge_ids.edge_id(u, v)?;
        self.edge_weights.remove(&id);
        Ok(())
    }

    /// Number of common neighbors of `u` and `v` in the sample.
    pub fn common_neighbors(&self, u: NodeId, v: NodeId) -> usize {
        let (min_node, max_node) = if self.graph.degree(u) <= self.graph.degree(v) {
            (u, v)
        } else {
            (v, u)
        };
        self.graph
            .neighbor_slice(min_node)
            .iter()
            .filter(|&&n| n != max_node && self.edge_ids.contains(n, max_node))
            .count()
    }

    #[inline]
    pub fn triangles(&self) -> u64 {
        self.triangles
    }

    #[inline]
    pub fn triangles_weight(&self) -> f64 {
        self.triangles_weight
    }

    pub fn triangles_local(&self, node: NodeId) -> u64 {
        self.triangles_local.get(&node).copied().unwrap_or(0)
    }

    pub fn triangles_weight_local(&self, node: NodeId) -> f64 {
        self.triangles_weight_local.get(&node).copied().unwrap_or(0.0)
    }

    pub fn edges_present_original(&self) -> u64 {
        self.edges_present_original
    }

    pub fn size_sample(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_ids.contains(u, v)
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.graph.nodes()
    }

    pub fn graph(&self) -> &DynamicGraph {
        &self.graph
    }

    pub fn max_node_id(&self) -> u64 {
        self.edge_ids.max_node_id()
    }
}

impl Default for TriangleCounter {
    fn default() -> Self {
        Self::new(false)
    }
}
