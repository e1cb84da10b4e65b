pub mod error;
pub mod graph;
pub mod counting;
pub mod sampling;
pub mod streaming;

pub use graph::{canonical_edge, DynamicGraph, Edge, NodeId};
pub use counting::{EdgeIdIndex, TriangleCounter, DEFAULT_MAX_NODE_ID};
pub use sampling::{
    build_sampler, EdgeReservoir, ExperimentConfig, FixedPSampler, PavanSampler, PinarSampler,
    ReservoirAddRemSampler, ReservoirSampler, RunConfig, SamplerConfig, TriangleSampler,
};
pub use streaming::{
    local_error, run_counting, run_local_evaluation, EdgeStreamReader, EdgeUpdate, LocalErrorReport,
    LocalErrorRow, RunStats, WindowStat,
};
pub use error::{SamplingError, Result};

pub mod prelude {
    pub use crate::graph::{DynamicGraph, Edge, NodeId};
    pub use crate::counting::TriangleCounter;
    pub use crate::sampling::{
        build_sampler, ExperimentConfig, FixedPSampler, PavanSampler, PinarSampler,
        ReservoirAddRemSampler, ReservoirSampler, RunConfig, SamplerConfig, TriangleSampler,
    };
    pub use crate::streaming::{run_counting, run_local_evaluation, EdgeStreamReader, EdgeUpdate};
    pub use crate::error::{SamplingError, Result};
}
