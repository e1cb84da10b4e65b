use rand::Rng;
use rand_pcg::Pcg64;
use crate::counting::TriangleCounter;
use crate::error::{SamplingError, Result};
use crate::graph::NodeId;
use crate::streaming::EdgeUpdate;
use super::{seeded_rng, TriangleSampler};

/// Independent Bernoulli(p) edge sampling.
///
/// In count-then-filter mode only sampled edges contribute triangles and the
/// raw count is scaled by `1/p^3`. In sample-and-hold mode every arriving edge
/// counts the triangles it closes in the current sample (both other edges were
/// kept with probability `p^2`), so the raw count is scaled by `1/p^2`.
#[derive(Debug)]
pub struct FixedPSampler {
    p: f64,
    sample_and_hold: bool,
    counter: TriangleCounter,
    rng: Pcg64,
}

impl FixedPSampler {
    pub fn new(
        p: f64,
        sample_and_hold: bool,
        mut counter: TriangleCounter,
        seed: Option<u64>,
    ) -> Result<Self> {
        if !(p.is_finite() && p > 0.0 && p <= 1.0) {
            return Err(SamplingError::invalid_parameter(format!(
                "sampling probability must lie in (0, 1], got {}",
                p
            )));
        }
        counter.clear();
        log::debug!("FixedPSampler p={} sample_and_hold={}", p, sample_and_hold);

        Ok(Self {
            p,
            sample_and_hold,
            counter,
            rng: seeded_rng(seed),
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn sample_and_hold(&self) -> bool {
        self.sample_and_hold
    }

    fn scale(&self) -> f64 {
        let inv = 1.0 / self.p;
        if self.sample_and_hold {
            inv.powi(2)
        } else {
            inv.powi(3)
        }
    }
}

impl TriangleSampler for FixedPSampler {
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()> {
        let (u, v) = (update.node_u, update.node_v);
        if update.is_self_loop() {
            return Err(SamplingError::SelfLoop(u));
        }
        if !update.is_add && self.sample_and_hold {
            return Err(SamplingError::DeletionUnsupported("FixedPSampler with sample-and-hold"));
        }
        if update.is_add && self.counter.contains_edge(u, v) {
            return Err(SamplingError::DuplicateEdge(u, v));
        }

        self.counter.new_update(update)?;

        if update.is_add {
            let u_rand: f64 = self.rng.gen();

            if self.sample_and_hold {
                self.counter.add_triangles(u, v, self.scale())?;
            }

            if u_rand < self.p {
                if !self.sample_and_hold {
                    self.counter.add_triangles(u, v, 1.0)?;
                }
                self.counter.add_edge_sample(u, v)?;
            }
        } else if self.counter.remove_edge_sample(u, v)? {
            self.counter.remove_triangles(u, v, 1.0)?;
        }
        Ok(())
    }

    fn triangle_estimate(&self) -> f64 {
        self.counter.triangles() as f64 * self.scale()
    }

    fn local_triangle_estimate(&self, node: NodeId) -> Result<f64> {
        if !self.counter.is_local() {
            return Err(SamplingError::LocalCountingDisabled);
        }
        Ok(self.counter.triangles_local(node) as f64 * self.scale())
    }

    fn counter(&self) -> Option<&TriangleCounter> {
        Some(&self.counter)
    }

    fn name(&self) -> &'static str {
        if self.sample_and_hold {
            "fixed-p-sample-and-hold"
        } else {
            "fixed-p"
        }
    }
}
