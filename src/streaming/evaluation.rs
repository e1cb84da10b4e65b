use serde::{Deserialize, Serialize};
use crate::error::{SamplingError, Result};
use crate::sampling::TriangleSampler;

/// Agreement between exact and estimated per-node triangle counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalErrorReport {
    pub pearson: f64,
    /// Mean of `|exact - est| / (exact + 1)` over all nodes.
    pub mean_eps_err: f64,
    pub top_triangle_exact: f64,
    pub top_triangle_est: f64,
}

/// Compare local estimates over every node of the exact sampler's sample.
pub fn local_error(
    exact: &dyn TriangleSampler,
    estimate: &dyn TriangleSampler,
) -> Result<LocalErrorReport> {
    let counter = exact.counter().ok_or_else(|| {
        SamplingError::invalid_parameter(format!("{} has no sample graph", exact.name()))
    })?;
    let nodes = counter.nodes();
    if nodes.is_empty() {
        return Ok(LocalErrorReport::default());
    }

    let pairs = nodes
        .iter()
        .map(|&n| Ok((exact.local_triangle_estimate(n)?, estimate.local_triangle_estimate(n)?)))
        .collect::<Result<Vec<(f64, f64)>>>()?;

    let len = pairs.len() as f64;
    let gt_avg = pairs.iter().map(|p| p.0).sum::<f64>() / len;
    let est_avg = pairs.iter().map(|p| p.1).sum::<f64>() / len;

    let mut report = LocalErrorReport::default();
    let mut cov = 0.0;
    let mut sum_dev_gt = 0.0;
    let mut sum_dev_est = 0.0;
    let mut eps_err = 0.0;

    for &(gt, est) in &pairs {
        report.top_triangle_exact = report.top_triangle_exact.max(gt);
        report.top_triangle_est = report.top_triangle_est.max(est);
        eps_err += (gt - est).abs() / (gt + 1.0);

        cov += (gt - gt_avg) * (est - est_avg);
        sum_dev_gt += (gt - gt_avg) * (gt - gt_avg);
        sum_dev_est += (est - est_avg) * (est - est_avg);
    }

    // Undefined for a constant estimate
    report.pearson = if sum_dev_est == 0.0 || sum_dev_gt == 0.0 {
        0.0
    } else {
        cov / (sum_dev_gt.sqrt() * sum_dev_est.sqrt())
    };
    report.mean_eps_err = eps_err / len;
    Ok(report)
}
