use rand::Rng;
use rand_pcg::Pcg64;
use crate::counting::TriangleCounter;
use crate::error::{SamplingError, Result};
use crate::graph::{Edge, NodeId};
use crate::streaming::EdgeUpdate;
use super::reservoir::EdgeReservoir;
use super::reservoir_sampler::co_presence_probability;
use super::{seeded_rng, TriangleSampler};

// Below this many factors the product form is exact enough and cheap.
const DIRECT_CHOOSE_TERMS: u64 = 32;

/// `ln n!` from the Stirling series; accurate for `n >= DIRECT_CHOOSE_TERMS`.
fn ln_factorial_stirling(n: u64) -> f64 {
    let n = n as f64;
    let inv = 1.0 / n;
    let inv2 = inv * inv;
    n * n.ln() - n + 0.5 * (2.0 * std::f64::consts::PI * n).ln()
        + inv * (1.0 / 12.0 - inv2 * (1.0 / 360.0 - inv2 * (1.0 / 1260.0 - inv2 / 1680.0)))
}

/// `ln C(n, k)`, or negative infinity when `k > n`. Constant time in `n` and `k`.
fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    if k <= DIRECT_CHOOSE_TERMS {
        return (0..k)
            .map(|i| ((n - i) as f64).ln() - ((i + 1) as f64).ln())
            .sum();
    }
    // Both k and n - k exceed the threshold here
    ln_factorial_stirling(n) - ln_factorial_stirling(k) - ln_factorial_stirling(n - k)
}

/// Hypergeometric probability of exactly `k` successes when drawing `draws`
/// items without replacement from `population` items of which `successes`
/// are successes.
pub(crate) fn hypergeometric_pmf(population: u64, successes: u64, draws: u64, k: u64) -> f64 {
    if successes > population || draws > population {
        return 0.0;
    }
    let failures = population - successes;
    if k > successes || k > draws || draws - k > failures {
        return 0.0;
    }
    (ln_choose(successes, k) + ln_choose(failures, draws - k) - ln_choose(population, draws)).exp()
}

/// Mass of the outcomes `0..=max_k` that lie inside the support
/// `[max(0, draws - failures), min(draws, successes)]`.
pub(crate) fn hypergeometric_low_mass(
    population: u64,
    successes: u64,
    draws: u64,
    max_k: u64,
) -> f64 {
    let failures = population.saturating_sub(successes);
    let lower = (i128::from(draws) - i128::from(failures)).max(0);
    let upper = i128::from(draws.min(successes));

    (0..=max_k)
        .filter(|&k| {
            let k = i128::from(k);
            k >= lower && k <= upper
        })
        .map(|k| hypergeometric_pmf(population, successes, draws, k))
        .sum()
}

/// Reservoir sampling under insertions and deletions ("random pairing").
///
/// Deletions are not compensated immediately: `d_i` counts vacated reservoir
/// slots and `d_o` deletions that missed the reservoir. Later insertions pair
/// off against this backlog before regular reservoir sampling resumes.
#[derive(Debug)]
pub struct ReservoirAddRemSampler {
    d_i: u64,
    d_o: u64,
    reservoir: EdgeReservoir,
    counter: TriangleCounter,
    rng: Pcg64,
}

impl ReservoirAddRemSampler {
    pub fn new(
        capacity: usize,
        mut counter: TriangleCounter,
        seed: Option<u64>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(SamplingError::invalid_parameter("reservoir capacity must be positive"));
        }
        counter.clear();
        log::debug!("ReservoirAddRemSampler capacity={}", capacity);

        Ok(Self {
            d_i: 0,
            d_o: 0,
            reservoir: EdgeReservoir::new(capacity),
            counter,
            rng: seeded_rng(seed),
        })
    }

    pub fn d_i(&self) -> u64 {
        self.d_i
    }

    pub fn d_o(&self) -> u64 {
        self.d_o
    }

    pub fn reservoir(&self) -> &EdgeReservoir {
        &self.reservoir
    }

    fn add_reservoir(&mut self, edge: Edge) -> Result<()> {
        self.reservoir.insert(edge)?;
        if !self.counter.add_edge_sample(edge.0, edge.1)? {
            return Err(SamplingError::invariant(format!(
                "reservoir edge {:?} already in the sample",
                edge
            )));
        }
        self.counter.add_triangles(edge.0, edge.1, 1.0)
    }

    fn delete_reservoir(&mut self, edge: Edge) -> Result<()> {
        if !self.reservoir.remove(&edge) {
            return Err(SamplingError::EdgeNotFound(edge.0, edge.1));
        }
        if !self.counter.remove_edge_sample(edge.0, edge.1)? {
            return Err(SamplingError::invariant(format!(
                "reservoir edge {:?} missing from the sample",
                edge
            )));
        }
        self.counter.remove_triangles(edge.0, edge.1, 1.0)
    }

    fn insert(&mut self, edge: Edge) -> Result<()> {
        if self.d_i + self.d_o > 0 {
            let u_rand: f64 = self.rng.gen();
            let thres = self.d_i as f64 / (self.d_i + self.d_o) as f64;
            if u_rand < thres {
                self.d_i -= 1;
                if self.reservoir.is_full() {
                    return Err(SamplingError::invariant(
                        "pending slot backfill into a full reservoir",
                    ));
                }
                self.add_reservoir(edge)?;
            } else {
                self.d_o -= 1;
            }
        } else if !self.reservoir.is_full() {
            self.add_reservoir(edge)?;
        } else {
            let present = self.counter.edges_present_original();
            if present <= self.reservoir.capacity() as u64 {
                return Err(SamplingError::invariant(format!(
                    "full reservoir of {} with only {} edges in the stream graph",
                    self.reservoir.capacity(),
                    present
                )));
            }
            let u_rand: f64 = self.rng.gen();
            let thres = self.reservoir.capacity() as f64 / present as f64;
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

    fn delete(&mut self, edge: Edge) -> Result<()> {
        if self.reservoir.contains(&edge) {
            self.d_i += 1;
            self.delete_reservoir(edge)
        } else {
            self.d_o += 1;
            Ok(())
        }
    }

    /// Probability that a fixed triangle of the stream graph is resident.
    pub fn triangle_probability(&self) -> f64 {
        let s = self.counter.edges_present_original();
        let resident = self.reservoir.len() as u64;
        if s < 3 || resident < 3 {
            return 0.0;
        }

        let presence = if resident == s {
            1.0
        } else {
            co_presence_probability(resident as f64, s as f64, 3)
        };

        let backlog = self.d_i + self.d_o;
        let draws = (self.reservoir.capacity() as u64).min(s + backlog);
        let disturbed = hypergeometric_low_mass(s + backlog, s, draws, 2);

        presence * (1.0 - disturbed)
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

impl TriangleSampler for ReservoirAddRemSampler {
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()> {
        if update.is_self_loop() {
            return Err(SamplingError::SelfLoop(update.node_u));
        }
        let edge = update.edge();
        if update.is_add && self.reservoir.contains(&edge) {
            return Err(SamplingError::DuplicateEdge(edge.0, edge.1));
        }

        self.counter.new_update(update)?;

        if update.is_add {
            self.insert(edge)
        } else {
            self.delete(edge)
        }
    }

    fn triangle_estimate(&self) -> f64 {
        self.scaled(self.counter.triangles())
    }

    fn local_triangle_estimate(&self, node: NodeId) -> Result<f64> {
        if !self.counter.is_local() {
            return Err(SamplingError::LocalCountingDisabled);
        }
        Ok(self.scaled(self.counter.triangles_local(node)))
    }

    fn counter(&self) -> Option<&TriangleCounter> {
        Some(&self.counter)
    }

    fn name(&self) -> &'static str {
        "reservoir-add-remove"
    }
}
