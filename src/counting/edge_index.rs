use hashbrown::HashSet;
use crate::error::{SamplingError, Result};
use crate::graph::NodeId;

/// Default bound on node ids used to pack an undirected pair into one key.
pub const DEFAULT_MAX_NODE_ID: u64 = 50_000_000;

/// Largest bound for which `max * max` still fits in a `u64` key.
const PACKING_LIMIT: u64 = 1 << 32;

/// Set of undirected edges keyed by `max_node_id * min(u, v) + max(u, v)`.
#[derive(Debug, Clone)]
pub struct EdgeIdIndex {
    max_node_id: u64,
    ids: HashSet<u64>,
}

impl EdgeIdIndex {
    pub fn new(max_node_id: u64) -> Result<Self> {
        if max_node_id < 2 || max_node_id > PACKING_LIMIT {
            return Err(SamplingError::invalid_parameter(format!(
                "max_node_id must lie in [2, {}], got {}",
                PACKING_LIMIT, max_node_id
            )));
        }
        Ok(Self {
            max_node_id,
            ids: HashSet::new(),
        })
    }

    pub fn max_node_id(&self) -> u64 {
        self.max_node_id
    }

    /// Packed key of `{u, v}`; rejects self-loops and out-of-range ids.
    pub fn edge_id(&self, u: NodeId, v: NodeId) -> Result<u64> {
        if u == v {
            return Err(SamplingError::SelfLoop(u));
        }
        for node in [u, v] {
            if node >= self.max_node_id {
                return Err(SamplingError::NodeIdOutOfRange {
                    node,
                    max: self.max_node_id,
                });
            }
        }
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        Ok(self.max_node_id * lo + hi)
    }

    pub fn insert(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        let id = self.edge_id(u, v)?;
        Ok(self.ids.insert(id))
    }

    pub fn remove(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        let id = self.edge_id(u, v)?;
        Ok(self.ids.remove(&id))
    }

    /// An invalid pair can never have been inserted, so it is reported absent.
    #[inline]
    pub fn contains(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_id(u, v)
            .map(|id| self.ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl Default for EdgeIdIndex {
    fn default() -> Self {
        Self {
            max_node_id: DEFAULT_MAX_NODE_ID,
            ids: HashSet::new(),
        }
    }
}
