pub mod traits;
pub mod reservoir;
pub mod fixed_p;
pub mod reservoir_sampler;
pub mod reservoir_add_rem;
pub mod pinar;
pub mod pavan;
pub mod config;

use rand::SeedableRng;
use rand_pcg::Pcg64;

pub use traits::TriangleSampler;
pub use reservoir::EdgeReservoir;
pub use fixed_p::FixedPSampler;
pub use reservoir_sampler::ReservoirSampler;
pub use reservoir_add_rem::ReservoirAddRemSampler;
pub use pinar::{PinarSampler, Wedge, WedgeSlot};
pub use pavan::{PavanEstimator, PavanSampler};
pub use config::{build_sampler, ExperimentConfig, RunConfig, SamplerConfig};

/// One random source per strategy, seeded once per run.
pub(crate) fn seeded_rng(seed: Option<u64>) -> Pcg64 {
    if let Some(seed) = seed {
        Pcg64::seed_from_u64(seed)
    } else {
        Pcg64::from_entropy()
    }
}
