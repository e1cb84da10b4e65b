use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use arrow::array::{Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use crate::error::{SamplingError, Result};

pub const TSV_HEADER: [&str; 10] = [
    "op_count_total",
    "last_timestamp",
    "last_triangles_count",
    "last_triangles_est",
    "last_size_sample",
    "operation_num",
    "micros_total",
    "micros_per_op",
    "add_op_in_window",
    "rem_op_in_window",
];

/// Snapshot at the end of one statistics window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStat {
    pub op_count_total: u64,
    pub last_timestamp: u64,
    pub last_triangles_count: u64,
    pub last_triangles_est: f64,
    pub last_size_sample: u64,
    pub operation_num: u64,
    pub micros: f64,
    pub micros_per_op: f64,
    pub add_op_in_window: u64,
    pub rem_op_in_window: u64,
}

impl WindowStat {
    pub fn to_tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.op_count_total,
            self.last_timestamp,
            self.last_triangles_count,
            self.last_triangles_est,
            self.last_size_sample,
            self.operation_num,
            self.micros,
            self.micros_per_op,
            self.add_op_in_window,
            self.rem_op_in_window
        )
    }
}

/// Aggregates per-operation observations into fixed-size windows.
#[derive(Debug)]
pub struct RunStats {
    window: u64,
    op_count: u64,
    last_op_count: u64,
    add_in_window: u64,
    rem_in_window: u64,
    last_triangles_count: u64,
    last_triangles_est: f64,
    last_size_sample: u64,
    last_timestamp: u64,
    window_start: Option<Instant>,
    stats: Vec<WindowStat>,
}

impl RunStats {
    pub fn new(stats_every: usize) -> Result<Self> {
        if stats_every == 0 {
            return Err(SamplingError::invalid_parameter("stats window must be positive"));
        }
        Ok(Self {
            window: stats_every as u64,
            op_count: 0,
            last_op_count: 0,
            add_in_window: 0,
            rem_in_window: 0,
            last_triangles_count: 0,
            last_triangles_est: 0.0,
            last_size_sample: 0,
            last_timestamp: 0,
            window_start: None,
            stats: Vec::new(),
        })
    }

    /// Record one executed operation; returns the window it closed, if any.
    pub fn record(
        &mut self,
        is_add: bool,
        triangles_count: u64,
        triangles_est: f64,
        size_sample: usize,
        timestamp: Option<u64>,
    ) -> Option<WindowStat> {
        if self.window_start.is_none() {
            self.window_start = Some(Instant::now());
        }

        if is_add {
            self.add_in_window += 1;
            self.last_timestamp = timestamp.unwrap_or(0);
        } else {
            self.rem_in_window += 1;
        }
        self.op_count += 1;

        self.last_triangles_count = triangles_count;
        self.last_triangles_est = triangles_est;
        self.last_size_sample = size_sample as u64;

        if self.op_count % self.window == 0 {
            Some(self.close_window())
        } else {
            None
        }
    }

    /// Flush a trailing partial window.
    pub fn finish(&mut self) -> Option<WindowStat> {
        if self.op_count != self.last_op_count {
            Some(self.close_window())
        } else {
            None
        }
    }

    fn close_window(&mut self) -> WindowStat {
        let now = Instant::now();
        let micros = self
            .window_start
            .map(|start| now.duration_since(start).as_micros() as f64)
            .unwrap_or(0.0);
        let operation_num = self.op_count - self.last_op_count;

        let stat = WindowStat {
            op_count_total: self.op_count,
            last_timestamp: self.last_timestamp,
            last_triangles_count: self.last_triangles_count,
            last_triangles_est: self.last_triangles_est,
            last_size_sample: self.last_size_sample,
            operation_num,
            micros,
            micros_per_op: micros / operation_num as f64,
            add_op_in_window: self.add_in_window,
            rem_op_in_window: self.rem_in_window,
        };

        self.add_in_window = 0;
        self.rem_in_window = 0;
        self.last_op_count = self.op_count;
        self.window_start = Some(Instant::now());
        self.stats.push(stat.clone());
        stat
    }

    pub fn stats(&self) -> &[WindowStat] {
        &self.stats
    }

    pub fn op_count(&self) -> u64 {
        self.op_count
    }

    pub fn write_tsv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "{}", TSV_HEADER.join("\t"))?;
        for stat in &self.stats {
            writeln!(out, "{}", stat.to_tsv_row())?;
        }
        Ok(())
    }

    pub fn write_json_lines<W: Write>(&self, mut out: W) -> Result<()> {
        for stat in &self.stats {
            serde_json::to_writer(&mut out, stat)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// All closed windows as one Arrow batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("op_count_total", DataType::UInt64, false),
            Field::new("last_timestamp", DataType::UInt64, false),
            Field::new("last_triangles_count", DataType::UInt64, false),
            Field::new("last_triangles_est", DataType::Float64, false),
            Field::new("last_size_sample", DataType::UInt64, false),
            Field::new("operation_num", DataType::UInt64, false),
            Field::new("micros_total", DataType::Float64, false),
            Field::new("micros_per_op", DataType::Float64, false),
            Field::new("add_op_in_window", DataType::UInt64, false),
            Field::new("rem_op_in_window", DataType::UInt64, false),
        ]));

        let u64_column = |f: fn(&WindowStat) -> u64| -> UInt64Array {
            self.stats.iter().map(f).collect::<Vec<u64>>().into()
        };
        let f64_column = |f: fn(&WindowStat) -> f64| -> Float64Array {
            self.stats.iter().map(f).collect::<Vec<f64>>().into()
        };

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(u64_column(|s| s.op_count_total)),
                Arc::new(u64_column(|s| s.last_timestamp)),
                Arc::new(u64_column(|s| s.last_triangles_count)),
                Arc::new(f64_column(|s| s.last_triangles_est)),
                Arc::new(u64_column(|s| s.last_size_sample)),
                Arc::new(u64_column(|s| s.operation_num)),
                Arc::new(f64_column(|s| s.micros)),
                Arc::new(f64_column(|s| s.micros_per_op)),
                Arc::new(u64_column(|s| s.add_op_in_window)),
                Arc::new(u64_column(|s| s.rem_op_in_window)),
            ],
        )
        .map_err(SamplingError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_windows_close_every_n_ops() {
        let mut stats = RunStats::new(2).unwrap();

        assert!(stats.record(true, 0, 0.0, 1, Some(5)).is_none());
        let first = stats.record(true, 1, 1.5, 2, Some(6)).unwrap();
        assert!(stats.record(false, 1, 1.5, 1, Some(7)).is_none());
        let last = stats.finish().unwrap();

        assert_eq!(first.op_count_total, 2);
        assert_eq!(first.operation_num, 2);
        assert_eq!((first.add_op_in_window, first.rem_op_in_window), (2, 0));
        assert_eq!(first.last_triangles_est, 1.5);

        assert_eq!(last.op_count_total, 3);
        assert_eq!(last.operation_num, 1);
        assert_eq!((last.add_op_in_window, last.rem_op_in_window), (0, 1));
        // Removals leave the timestamp alone
        assert_eq!(last.last_timestamp, 6);
        assert_eq!(stats.stats().len(), 2);
    }

    #[test]
    fn test_finish_on_closed_window_is_empty() {
        let mut stats = RunStats::new(1).unwrap();
        assert!(stats.record(true, 0, 0.0, 1, None).is_some());
        assert!(stats.finish().is_none());
        assert!(RunStats::new(0).is_err());
    }

    #[test]
    fn test_tsv_and_json_output() {
        let mut stats = RunStats::new(1).unwrap();
        stats.record(true, 3, 4.5, 6, Some(9));

        let mut tsv = Vec::new();
        stats.write_tsv(&mut tsv).unwrap();
        let tsv = String::from_utf8(tsv).unwrap();
        let mut lines = tsv.lines();
        assert_eq!(lines.next().unwrap().split('\t').count(), 10);
        assert!(lines.next().unwrap().starts_with("1\t9\t3\t4.5\t6\t1\t"));

        let mut json = Vec::new();
        stats.write_json_lines(&mut json).unwrap();
        let parsed: WindowStat = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, stats.stats()[0]);
    }

    #[test]
    fn test_record_batch_columns() {
        let mut stats = RunStats::new(2).unwrap();
        for i in 0..5u64 {
            stats.record(i % 2 == 0, i, i as f64, i as usize, Some(i));
        }
        stats.finish();

        let batch = stats.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 10);

        let totals = batch
            .column(0)
            .as_any()
            .downcast_ref::<UInt64Array>()
            .unwrap();
        assert_eq!(totals.values().to_vec(), vec![2, 4, 5]);
    }
}
