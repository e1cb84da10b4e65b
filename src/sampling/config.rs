use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::counting::{TriangleCounter, DEFAULT_MAX_NODE_ID};
use crate::error::{SamplingError, Result};
use super::{
    FixedPSampler, PavanSampler, PinarSampler, ReservoirAddRemSampler, ReservoirSampler,
    TriangleSampler,
};

/// Strategy selection and its construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    FixedP {
        p: f64,
        #[serde(default)]
        sample_and_hold: bool,
    },
    Reservoir {
        capacity: usize,
        #[serde(default)]
        sample_and_hold: bool,
    },
    ReservoirAddRemove {
        capacity: usize,
    },
    Pinar {
        edge_reservoir: usize,
        wedge_reservoir: usize,
    },
    Pavan {
        estimators: usize,
    },
}

/// Per-run settings shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: Option<u64>,
    /// Maintain per-node triangle tallies.
    pub local: bool,
    pub max_node_id: u64,
    /// Operations per statistics window.
    pub stats_every: usize,
    /// The stream holds insertions only; a run stops at the first removal.
    pub only_add: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            local: false,
            max_node_id: DEFAULT_MAX_NODE_ID,
            stats_every: 10_000,
            only_add: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub run: RunConfig,
    pub sampler: SamplerConfig,
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.sampler.validate(&self.run)
    }
}

impl SamplerConfig {
    /// Reservoir strategy suited to the stream: add-only when `only_add`.
    pub fn reservoir(capacity: usize, sample_and_hold: bool, only_add: bool) -> Self {
        if only_add {
            SamplerConfig::Reservoir { capacity, sample_and_hold }
        } else {
            SamplerConfig::ReservoirAddRemove { capacity }
        }
    }

    pub fn supports_deletions(&self) -> bool {
        match self {
            SamplerConfig::FixedP { sample_and_hold, .. } => !sample_and_hold,
            SamplerConfig::ReservoirAddRemove { .. } => true,
            SamplerConfig::Reservoir { .. }
            | SamplerConfig::Pinar { .. }
            | SamplerConfig::Pavan { .. } => false,
        }
    }

    pub fn supports_local(&self) -> bool {
        !matches!(self, SamplerConfig::Pinar { .. } | SamplerConfig::Pavan { .. })
    }

    /// Reject invalid parameters and unsupported feature combinations.
    pub fn validate(&self, run: &RunConfig) -> Result<()> {
        match *self {
            SamplerConfig::FixedP { p, .. } => {
                if !(p.is_finite() && p > 0.0 && p <= 1.0) {
                    return Err(SamplingError::invalid_parameter(format!(
                        "p must lie in (0, 1], got {}",
                        p
                    )));
                }
            }
            SamplerConfig::Reservoir { capacity, .. }
            | SamplerConfig::ReservoirAddRemove { capacity } => {
                if capacity == 0 {
                    return Err(SamplingError::invalid_parameter(
                        "reservoir capacity must be positive",
                    ));
                }
            }
            SamplerConfig::Pinar { edge_reservoir, wedge_reservoir } => {
                if edge_reservoir == 0 || wedge_reservoir == 0 {
                    return Err(SamplingError::invalid_parameter(
                        "edge and wedge reservoir sizes must be positive",
                    ));
                }
            }
            SamplerConfig::Pavan { estimators } => {
                if estimators == 0 {
                    return Err(SamplingError::invalid_parameter("ensemble size must be positive"));
                }
            }
        }

        if !run.only_add && !self.supports_deletions() {
            return Err(SamplingError::invalid_parameter(format!(
                "{:?} cannot process deletions",
                self
            )));
        }
        if run.local && !self.supports_local() {
            return Err(SamplingError::invalid_parameter(format!(
                "{:?} has no local estimator",
                self
            )));
        }
        if run.stats_every == 0 {
            return Err(SamplingError::invalid_parameter("stats_every must be positive"));
        }
        Ok(())
    }
}

/// Construct the strategy described by `config`, owning a fresh counter.
pub fn build_sampler(config: &SamplerConfig, run: &RunConfig) -> Result<Box<dyn TriangleSampler>> {
    config.validate(run)?;
    let counter = || TriangleCounter::with_max_node_id(run.local, run.max_node_id);

    let sampler: Box<dyn TriangleSampler> = match *config {
        SamplerConfig::FixedP { p, sample_and_hold } => {
            Box::new(FixedPSampler::new(p, sample_and_hold, counter()?, run.seed)?)
        }
        SamplerConfig::Reservoir { capacity, sample_and_hold } => {
            Box::new(ReservoirSampler::new(capacity, sample_and_hold, counter()?, run.seed)?)
        }
        SamplerConfig::ReservoirAddRemove { capacity } => {
            Box::new(ReservoirAddRemSampler::new(capacity, counter()?, run.seed)?)
        }
        SamplerConfig::Pinar { edge_reservoir, wedge_reservoir } => {
            Box::new(PinarSampler::new(edge_reservoir, wedge_reservoir, run.seed)?)
        }
        SamplerConfig::Pavan { estimators } => Box::new(PavanSampler::new(estimators, run.seed)?),
    };
    log::info!("Built {} sampler (seed {:?}, local {})", sampler.name(), run.seed, run.local);
    Ok(sampler)
}
