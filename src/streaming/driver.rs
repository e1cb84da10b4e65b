use serde::{Deserialize, Serialize};
use crate::counting::TriangleCounter;
use crate::error::{SamplingError, Result};
use crate::sampling::{FixedPSampler, RunConfig, TriangleSampler};
use super::evaluation::{local_error, LocalErrorReport};
use super::stats::{RunStats, WindowStat};
use super::EdgeUpdate;

/// One row of a local-error run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalErrorRow {
    pub op_count: u64,
    pub size_sample: u64,
    pub triangles_exact: u64,
    #[serde(flatten)]
    pub report: LocalErrorReport,
}

impl LocalErrorRow {
    pub fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.op_count,
            self.size_sample,
            self.triangles_exact,
            self.report.top_triangle_exact,
            self.report.top_triangle_est,
            self.report.pearson,
            self.report.mean_eps_err
        )
    }
}

/// Feed `updates` through `sampler`, passing every closed window to `sink`.
///
/// With `only_add` the run ends silently at the first removal.
pub fn run_counting<I, F>(
    updates: I,
    sampler: &mut dyn TriangleSampler,
    run: &RunConfig,
    mut sink: F,
) -> Result<RunStats>
where
    I: IntoIterator<Item = Result<EdgeUpdate>>,
    F: FnMut(&WindowStat) -> Result<()>,
{
    let mut stats = RunStats::new(run.stats_every)?;
    log::info!("Counting run with {} (window {})", sampler.name(), run.stats_every);

    for update in updates {
        let update = update?;
        if run.only_add && !update.is_add {
            log::info!("First removal after {} operations, stopping", stats.op_count());
            break;
        }

        sampler.exec_operation(&update)?;

        if let Some(window) = stats.record(
            update.is_add,
            sampler.sample_triangles(),
            sampler.triangle_estimate(),
            sampler.sample_size(),
            update.timestamp,
        ) {
            sink(&window)?;
        }
    }

    if let Some(window) = stats.finish() {
        sink(&window)?;
    }
    log::debug!("Counting run finished: {} windows", stats.stats().len());
    Ok(stats)
}

/// Run `sampler` next to an exact local counter and report local accuracy
/// every `stats_every` operations, once the stream holds a triangle.
pub fn run_local_evaluation<I, F>(
    updates: I,
    sampler: &mut dyn TriangleSampler,
    run: &RunConfig,
    mut sink: F,
) -> Result<Vec<LocalErrorRow>>
where
    I: IntoIterator<Item = Result<EdgeUpdate>>,
    F: FnMut(&LocalErrorRow) -> Result<()>,
{
    if run.stats_every == 0 {
        return Err(SamplingError::invalid_parameter("stats_every must be positive"));
    }
    let counter = TriangleCounter::with_max_node_id(true, run.max_node_id)?;
    let mut exact = FixedPSampler::new(1.0, false, counter, run.seed)?;
    let every = run.stats_every as u64;
    let mut op_count = 0u64;
    let mut rows = Vec::new();
    log::info!("Local evaluation of {} against exact counts", sampler.name());

    for update in updates {
        let update = update?;
        if run.only_add && !update.is_add {
            log::info!("First removal after {} operations, stopping", op_count);
            break;
        }

        sampler.exec_operation(&update)?;
        exact.exec_operation(&update)?;

        op_count += 1;
        if op_count % every != 0 {
            continue;
        }
        let triangles_exact = exact.sample_triangles();
        if triangles_exact == 0 {
            continue;
        }

        let row = LocalErrorRow {
            op_count,
            size_sample: sampler.sample_size() as u64,
            triangles_exact,
            report: local_error(&exact, &*sampler)?,
        };
        sink(&row)?;
        rows.push(row);
    }
    Ok(rows)
}
