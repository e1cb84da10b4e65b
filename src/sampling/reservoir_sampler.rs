use rand::Rng;
use rand_pcg::Pcg64;
use crate::counting::TriangleCounter;
use crate::error::{SamplingError, Result};
use crate::graph::{Edge, NodeId};
use crate::streaming::EdgeUpdate;
use super::reservoir::EdgeReservoir;
use super::{seeded_rng, TriangleSampler};

/// Probability that `m` fixed edges out of `t` are all in a uniform `k`-subset.
pub(crate) fn co_presence_probability(k: f64, t: f64, m: u32) -> f64 {
    (0..m)
        .map(|i| {
            let i = f64::from(i);
            (k - i) / (t - i)
        })
        .product::<f64>()
        .min(1.0)
}

/// Classical k-of-n reservoir sampling over an insertion-only stream.
#[derive(Debug)]
pub struct ReservoirSampler {
    sample_and_hold: bool,
    reservoir: EdgeReservoir,
    counter: TriangleCounter,
    rng: Pcg64,
}

impl ReservoirSampler {
    pub fn new(
        capacity: usize,
        sample_and_hold: bool,
        mut counter: TriangleCounter,
        seed: Option<u64>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(SamplingError::invalid_parameter("reservoir capacity must be positive"));
        }
        if capacity < 3 {
            log::warn!("reservoir of capacity {} can never hold a triangle", capacity);
        }
        counter.clear();
        log::debug!("ReservoirSampler capacity={} sample_and_hold={}", capacity, sample_and_hold);

        Ok(Self {
            sample_and_hold,
            reservoir: EdgeReservoir::new(capacity),
            counter,
            rng: seeded_rng(seed),
        })
    }

    pub fn reservoir(&self) -> &EdgeReservoir {
        &self.reservoir
    }

    fn capacity(&self) -> f64 {
        self.reservoir.capacity() as f64
    }

    fn add_reservoir(&mut self, edge: Edge) -> Result<()> {
        self.reservoir.insert(edge)?;
        if !self.counter.add_edge_sample(edge.0, edge.1)? {
            return Err(SamplingError::invariant(format!(
                "reservoir edge {:?} already in the sample",
                edge
            )));
        }
        if !self.sample_and_hold {
            self.counter.add_triangles(edge.0, edge.1, 1.0)?;
        }
        Ok(())
    }

    fn delete_reservoir(&mut self, edge: Edge) -> Result<()> {
        if !self.reservoir.remove(&edge) {
            return Ok(());
        }
        if !self.counter.remove_edge_sample(edge.0, edge.1)? {
            return Err(SamplingError::invariant(format!(
                "reservoir edge {:?} missing from the sample",
                edge
            )));
        }
        if !self.sample_and_hold {
            self.counter.remove_triangles(edge.0, edge.1, 1.0)?;
        }
        Ok(())
    }

    /// Inverse-probability weight for a triangle closed at arrival.
    fn hold_weight(&self) -> f64 {
        let t = self.counter.edges_present_original();
        if t < 2 {
            return 0.0;
        }
        let p = co_presence_probability(self.capacity(), t as f64, 2);
        if p > 0.0 {
            1.0 / p
        } else {
            0.0
        }
    }

    /// Probability that a fixed triangle of the stream is fully resident.
    fn triangle_probability(&self) -> f64 {
        let t = self.counter.edges_present_original();
        if t < 3 {
            return 0.0;
        }
        co_presence_probability(self.capacity(), t as f64, 3)
    }

    fn scaled(&self, raw: u64) -> f64 {
        let p = self.triangle_probability();
        if p > 0.0 {
            raw as f64 / p
        } else {
            0.0
        }
    }
}

impl TriangleSampler for ReservoirSampler {
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()> {
        if !update.is_add {
            return Err(SamplingError::DeletionUnsupported("ReservoirSampler"));
        }
        if update.is_self_loop() {
            return Err(SamplingError::SelfLoop(update.node_u));
        }
        let edge = update.edge();
        if self.reservoir.contains(&edge) {
            return Err(SamplingError::DuplicateEdge(edge.0, edge.1));
        }

        self.counter.new_update(update)?;

        if self.sample_and_hold {
            let weight = self.hold_weight();
            self.counter.add_triangles(edge.0, edge.1, weight)?;
        }

        if !self.reservoir.is_full() {
            self.add_reservoir(edge)?;
        } else {
            let u_rand: f64 = self.rng.gen();
            let thres = self.capacity() / self.counter.edges_present_original() as f64;
            if u_rand < thres {
                let rand_pos = self.rng.gen_range(0..self.reservoir.capacity());
                let victim = self
                    .reservoir
                    .get(rand_pos)
                    .ok_or_else(|| SamplingError::invariant("full reservoir has an empty slot"))?;
                self.delete_reservoir(victim)?;
                self.add_reservoir(edge)?;
            }
        }
        Ok(())
    }

    fn triangle_estimate(&self) -> f64 {
        if self.sample_and_hold {
            self.counter.triangles_weight()
        } else {
            self.scaled(self.counter.triangles())
        }
    }

    fn local_triangle_estimate(&self, node: NodeId) -> Result<f64> {
        if !self.counter.is_local() {
            return Err(SamplingError::LocalCountingDisabled);
        }
        Ok(if self.sample_and_hold {
            self.counter.triangles_weight_local(node)
        } else {
            self.scaled(self.counter.triangles_local(node))
        })
    }

    fn counter(&self) -> Option<&TriangleCounter> {
        Some(&self.counter)
    }

    fn name(&self) -> &'static str {
        if self.sample_and_hold {
            "reservoir-sample-and-hold"
        } else {
            "reservoir"
        }
    }
}
