use rand::Rng;
use rand_pcg::Pcg64;
use crate::error::{SamplingError, Result};
use crate::graph::{DynamicGraph, Edge, NodeId};
use crate::streaming::EdgeUpdate;
use super::{seeded_rng, TriangleSampler};

/// Two edges `center - ends.0` and `center - ends.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wedge {
    pub center: NodeId,
    pub ends: (NodeId, NodeId),
}

impl Wedge {
    /// Whether `edge` is the third edge of this wedge.
    pub fn is_closed_by(&self, edge: Edge) -> bool {
        self.ends == edge || self.ends == (edge.1, edge.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WedgeSlot {
    pub wedge: Option<Wedge>,
    pub closed: bool,
}

/// Wedge-reservoir transitivity sampler (Jha, Seshadhri, Pinar).
///
/// Keeps `k` independently refreshed edge slots and a wedge reservoir drawn
/// from the wedges of the edge-slot subgraph. The closed fraction of the
/// wedge reservoir scales the wedge count into a triangle estimate.
#[derive(Debug)]
pub struct PinarSampler {
    t: u64,
    tot_wedges: u64,
    fraction_closed: f64,
    edge_reservoir: Vec<Option<Edge>>,
    wedge_reservoir: Vec<WedgeSlot>,
    rng: Pcg64,
}

impl PinarSampler {
    pub fn new(edge_res_size: usize, wedge_res_size: usize, seed: Option<u64>) -> Result<Self> {
        if edge_res_size == 0 || wedge_res_size == 0 {
            return Err(SamplingError::invalid_parameter(
                "edge and wedge reservoir sizes must be positive",
            ));
        }
        if edge_res_size < 2 {
            log::warn!("PinarSampler with a single edge slot always estimates 0");
        }
        log::debug!("PinarSampler edges={} wedges={}", edge_res_size, wedge_res_size);

        Ok(Self {
            t: 0,
            tot_wedges: 0,
            fraction_closed: 0.0,
            edge_reservoir: vec![None; edge_res_size],
            wedge_reservoir: vec![WedgeSlot::default(); wedge_res_size],
            rng: seeded_rng(seed),
        })
    }

    pub fn wedge_slots(&self) -> &[WedgeSlot] {
        &self.wedge_reservoir
    }

    pub fn edge_slots(&self) -> &[Option<Edge>] {
        &self.edge_reservoir
    }

    pub fn total_wedges(&self) -> u64 {
        self.tot_wedges
    }

    pub fn fraction_closed(&self) -> f64 {
        self.fraction_closed
    }

    /// Mark wedges closed by `edge`; returns the number of closed slots.
    fn close_wedges(&mut self, edge: Edge) -> usize {
        let mut closed = 0;
        for slot in &mut self.wedge_reservoir {
            if slot.wedge.map(|w| w.is_closed_by(edge)).unwrap_or(false) {
                slot.closed = true;
            }
            if slot.closed {
                closed += 1;
            }
        }
        closed
    }

    fn refresh_edges(&mut self, edge: Edge) -> bool {
        let keep = 1.0 / self.t as f64;
        let mut updated = false;
        for slot in &mut self.edge_reservoir {
            let u_rand: f64 = self.rng.gen();
            if u_rand <= keep {
                *slot = Some(edge);
                updated = true;
            }
        }
        updated
    }

    /// Wedges of the edge-slot subgraph that contain `edge`.
    fn new_wedges(subgraph: &DynamicGraph, (min_n, max_n): Edge) -> Vec<Wedge> {
        let around_min = subgraph
            .neighbor_slice(min_n)
            .iter()
            .filter(|&&n| n != max_n)
            .map(|&n| Wedge { center: min_n, ends: (n, max_n) });
        let around_max = subgraph
            .neighbor_slice(max_n)
            .iter()
            .filter(|&&n| n != min_n)
            .map(|&n| Wedge { center: max_n, ends: (n, min_n) });
        around_min.chain(around_max).collect()
    }

    /// Replace each wedge slot with probability `|new| / tot_wedges`.
    ///
    /// A resampled slot always starts open, even when it held a closed wedge.
    fn resample_wedges(&mut self, new_wedges: &[Wedge], mut closed: usize) -> usize {
        let replace = if self.tot_wedges == 0 {
            0.0
        } else {
            new_wedges.len() as f64 / self.tot_wedges as f64
        };
        for slot in &mut self.wedge_reservoir {
            let u_rand: f64 = self.rng.gen();
            if u_rand <= replace && !new_wedges.is_empty() {
                let pick = self.rng.gen_range(0..new_wedges.len());
                slot.wedge = Some(new_wedges[pick]);
                if slot.closed {
                    closed -= 1;
                }
                slot.closed = false;
            }
        }
        closed
    }
}

impl TriangleSampler for PinarSampler {
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()> {
        if !update.is_add {
            return Err(SamplingError::DeletionUnsupported("PinarSampler"));
        }
        if update.is_self_loop() {
            return Err(SamplingError::SelfLoop(update.node_u));
        }
        let edge = update.edge();
        self.t += 1;

        let closed = self.close_wedges(edge);

        if self.refresh_edges(edge) {
            let mut subgraph = DynamicGraph::new();
            for &(u, v) in self.edge_reservoir.iter().flatten() {
                subgraph.add_edge(u, v)?;
            }

            self.tot_wedges = subgraph
                .nodes()
                .into_iter()
                .map(|n| {
                    let deg = subgraph.degree(n) as u64;
                    deg * deg.saturating_sub(1) / 2
                })
                .sum();

            let new_wedges = Self::new_wedges(&subgraph, edge);
            let closed = self.resample_wedges(&new_wedges, closed);
            self.fraction_closed = closed as f64 / self.wedge_reservoir.len() as f64;
        }
        Ok(())
    }

    fn triangle_estimate(&self) -> f64 {
        let k = self.edge_reservoir.len() as f64;
        if k < 2.0 {
            return 0.0;
        }
        let t = self.t as f64;
        self.fraction_closed * t * t / (k * (k - 1.0)) * self.tot_wedges as f64
    }

    /// Not supported by this estimator.
    fn local_triangle_estimate(&self, _node: NodeId) -> Result<f64> {
        Ok(0.0)
    }

    fn name(&self) -> &'static str {
        "pinar"
    }

    fn sample_size(&self) -> usize {
        self.edge_reservoir.iter().filter(|slot| slot.is_some()).count()
    }
}
