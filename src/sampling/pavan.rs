use rand::Rng;
use rand_pcg::Pcg64;
use crate::error::{SamplingError, Result};
use crate::graph::{Edge, NodeId};
use crate::streaming::EdgeUpdate;
use super::{seeded_rng, TriangleSampler};

fn touches(edge: Edge, node: NodeId) -> bool {
    edge.0 == node || edge.1 == node
}

/// One neighborhood-sampling triangle detector (Pavan et al.).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PavanEstimator {
    pub e1: Option<Edge>,
    pub e2: Option<Edge>,
    /// Edges adjacent to `e1` seen since `e1` was chosen.
    pub c: u64,
    pub is_triangle: bool,
    pub t: u64,
}

impl PavanEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge<R: Rng>(&mut self, (u, v): Edge, rng: &mut R) {
        self.t += 1;
        let u_rand: f64 = rng.gen();
        if u_rand <= 1.0 / self.t as f64 {
            self.e1 = Some((u, v));
            self.e2 = None;
            self.c = 0;
            self.is_triangle = false;
            return;
        }

        let Some(e1) = self.e1 else {
            return;
        };
        if !(touches(e1, u) || touches(e1, v)) {
            return;
        }

        self.c += 1;
        let u_rand2: f64 = rng.gen();
        if u_rand2 <= 1.0 / self.c as f64 {
            self.e2 = Some((u, v));
            self.is_triangle = false;
        } else if let Some(e2) = self.e2 {
            if (touches(e1, u) && touches(e2, v)) || (touches(e1, v) && touches(e2, u)) {
                self.is_triangle = true;
            }
        }
    }
}

/// Ensemble of independent [`PavanEstimator`]s over an insertion-only stream.
#[derive(Debug)]
pub struct PavanSampler {
    t: u64,
    estimators: Vec<PavanEstimator>,
    rng: Pcg64,
}

impl PavanSampler {
    pub fn new(est_number: usize, seed: Option<u64>) -> Result<Self> {
        if est_number == 0 {
            return Err(SamplingError::invalid_parameter("ensemble size must be positive"));
        }
        log::debug!("PavanSampler estimators={}", est_number);

        Ok(Self {
            t: 0,
            estimators: vec![PavanEstimator::new(); est_number],
            rng: seeded_rng(seed),
        })
    }

    pub fn estimators(&self) -> &[PavanEstimator] {
        &self.estimators
    }
}

impl TriangleSampler for PavanSampler {
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()> {
        if !update.is_add {
            return Err(SamplingError::DeletionUnsupported("PavanSampler"));
        }
        if update.is_self_loop() {
            return Err(SamplingError::SelfLoop(update.node_u));
        }
        let edge = update.edge();
        self.t += 1;
        for est in &mut self.estimators {
            est.add_edge(edge, &mut self.rng);
        }
        Ok(())
    }

    fn triangle_estimate(&self) -> f64 {
        let sum: f64 = self
            .estimators
            .iter()
            .filter(|est| est.is_triangle)
            .map(|est| est.c as f64 * self.t as f64)
            .sum();
        sum / self.estimators.len() as f64
    }

    /// Not supported by this estimator.
    fn local_triangle_estimate(&self, _node: NodeId) -> Result<f64> {
        Ok(0.0)
    }

    fn name(&self) -> &'static str {
        "pavan"
    }

    fn sample_size(&self) -> usize {
        self.estimators
            .iter()
            .map(|est| usize::from(est.e1.is_some()) + usize::from(est.e2.is_some()))
            .sum()
    }
}
