use crate::counting::TriangleCounter;
use crate::error::Result;
use crate::graph::NodeId;
use crate::streaming::EdgeUpdate;

/// A bounded-memory strategy that turns a stream of edge updates into an
/// unbiased estimate of the number of triangles.
///
/// Updates must be fed in stream order; every call may consume random draws
/// whose outcome depends on all previous calls.
pub trait TriangleSampler: Send {
    /// Apply one true-stream update to the strategy state.
    fn exec_operation(&mut self, update: &EdgeUpdate) -> Result<()>;

    /// Current unbiased estimate of the global triangle count.
    fn triangle_estimate(&self) -> f64;

    /// Current estimate of the triangles incident to `node`.
    fn local_triangle_estimate(&self, node: NodeId) -> Result<f64>;

    /// Counter maintaining the sample, for strategies that use one.
    fn counter(&self) -> Option<&TriangleCounter> {
        None
    }

    fn name(&self) -> &'static str;

    fn supports_local(&self) -> bool {
        self.counter().map(TriangleCounter::is_local).unwrap_or(false)
    }

    /// Exact triangle count of the current sample.
    fn sample_triangles(&self) -> u64 {
        self.counter().map(TriangleCounter::triangles).unwrap_or(0)
    }

    /// Number of edges currently held by the strategy.
    fn sample_size(&self) -> usize {
        self.counter().map(TriangleCounter::size_sample).unwrap_or(0)
    }
}
