//! Per-iteration timing accumulation and run summaries.

use crate::config::AccessPattern;
use hdrhistogram::Histogram;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Accumulates the wall-clock cost of kernel invocations, one sample per
/// timed trial. The measured interval brackets exactly one kernel call;
/// population, shuffling, and cache-flush cost stay outside it.
pub struct RunRecorder {
    hist: Histogram<u64>,
    total: Duration,
    runs: u64,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self {
            hist: Histogram::<u64>::new_with_bounds(1, 60_000_000_000, 3).unwrap(),
            total: Duration::ZERO,
            runs: 0,
        }
    }

    /// Start one timed trial.
    #[inline(always)]
    pub fn start(&self) -> Instant {
        Instant::now()
    }

    /// Record the elapsed time since `start`.
    #[inline(always)]
    pub fn record(&mut self, start: Instant) {
        let elapsed = start.elapsed();
        let nanos = elapsed.as_nanos() as u64;
        let _ = self.hist.record(nanos.max(1));
        self.total += elapsed;
        self.runs += 1;
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Cumulative timed duration across all recorded trials.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Average duration per trial (`total / runs`).
    pub fn average(&self) -> Duration {
        if self.runs == 0 {
            Duration::ZERO
        } else {
            self.total / self.runs as u32
        }
    }

    /// Percentile in microseconds.
    pub fn percentile_us(&self, p: f64) -> f64 {
        self.hist.value_at_percentile(p) as f64 / 1_000.0
    }

    /// Mean trial duration in microseconds.
    pub fn mean_us(&self) -> f64 {
        self.hist.mean() / 1_000.0
    }
}

impl Default for RunRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics for one completed run, immutable once emitted.
///
/// `total_timed_secs` and `avg_run_ms` are the benchmark result;
/// `wall_secs` covers the whole run including populate/flush/shuffle
/// overhead and is reported only for context.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub pattern: AccessPattern,
    pub iterations: u64,
    pub dataset_len: usize,
    pub total_timed_secs: f64,
    pub avg_run_ms: f64,
    pub p50_us: f64,
    pub p99_us: f64,
    pub p999_us: f64,
    pub mean_us: f64,
    pub wall_secs: f64,
    /// Last scalar kernel result (direct pattern only); written out so the
    /// work cannot be treated as a dead store.
    pub last_result: Option<i32>,
}

impl RunSummary {
    pub fn from_recorder(
        pattern: AccessPattern,
        dataset_len: usize,
        rec: &RunRecorder,
        wall: Duration,
        last_result: Option<i32>,
    ) -> Self {
        Self {
            pattern,
            iterations: rec.runs(),
            dataset_len,
            total_timed_secs: rec.total().as_secs_f64(),
            avg_run_ms: rec.average().as_secs_f64() * 1_000.0,
            p50_us: rec.percentile_us(50.0),
            p99_us: rec.percentile_us(99.0),
            p999_us: rec.percentile_us(99.9),
            mean_us: rec.mean_us(),
            wall_secs: wall.as_secs_f64(),
            last_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulation_is_monotonic() {
        let mut rec = RunRecorder::new();
        let mut prev = Duration::ZERO;
        for _ in 0..100 {
            let t = rec.start();
            std::hint::black_box((0..100).sum::<u64>());
            rec.record(t);
            assert!(rec.total() >= prev);
            prev = rec.total();
        }
        assert_eq!(rec.runs(), 100);
    }

    #[test]
    fn average_is_total_over_runs() {
        let mut rec = RunRecorder::new();
        for _ in 0..10 {
            let t = rec.start();
            rec.record(t);
        }
        assert_eq!(rec.average(), rec.total() / 10);
    }

    #[test]
    fn empty_recorder_averages_zero() {
        let rec = RunRecorder::new();
        assert_eq!(rec.average(), Duration::ZERO);
    }

    #[test]
    fn summary_carries_recorder_totals() {
        let mut rec = RunRecorder::new();
        for _ in 0..5 {
            let t = rec.start();
            rec.record(t);
        }
        let summary = RunSummary::from_recorder(
            AccessPattern::Direct,
            1024,
            &rec,
            Duration::from_millis(12),
            Some(7),
        );
        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.dataset_len, 1024);
        assert_eq!(summary.total_timed_secs, rec.total().as_secs_f64());
        assert_eq!(summary.last_result, Some(7));
    }
}
