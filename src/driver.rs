//! Orchestrates one benchmark run.
//!
//! A driver moves through four phases: setup (`new`), iterating and
//! reporting (`run`, which consumes the driver), and done (the returned
//! summary). Consuming `self` makes re-running or skipping a phase
//! unrepresentable. Every iteration is unconditional — there is no retry
//! or skip logic, because a partial run produces no statistically
//! meaningful average.

use crate::config::{AccessPattern, BenchConfig};
use crate::dataset::{Dataset, IndirectionTable};
use crate::flush::CacheFlusher;
use crate::kernels;
use crate::recorder::{RunRecorder, RunSummary};
use crate::{BenchResult, DataGen};
use std::hint::black_box;
use std::time::Instant;

pub struct BenchmarkDriver {
    cfg: BenchConfig,
    pattern: AccessPattern,
    dataset: Dataset,
    /// Present only for the indirect patterns; the direct kernel walks the
    /// dataset itself.
    table: Option<IndirectionTable>,
    flusher: CacheFlusher,
    started: Instant,
}

impl BenchmarkDriver {
    /// Setup phase: validate the configuration and allocate the dataset,
    /// indirection table, and scratch buffers. Any failure here is fatal
    /// to the run — nothing has been timed yet and nothing is reported.
    pub fn new(cfg: BenchConfig, pattern: AccessPattern) -> BenchResult<Self> {
        cfg.validate_for(pattern)?;

        let len = cfg.dataset_len();
        let dataset = Dataset::new(len)?;
        let table = if pattern.squares_in_place() {
            Some(IndirectionTable::identity(len)?)
        } else {
            None
        };
        let flusher = CacheFlusher::new(cfg.cache_size_bytes)?;

        Ok(Self {
            cfg,
            pattern,
            dataset,
            table,
            flusher,
            started: Instant::now(),
        })
    }

    /// Run the fixed iteration loop and produce the aggregate statistics.
    pub fn run(self, gen: &mut DataGen) -> BenchResult<RunSummary> {
        self.run_with(gen, |_, _| {})
    }

    /// As [`run`](Self::run), invoking `observer(run_number, result)` after
    /// each trial, outside the timed window.
    pub fn run_with<F>(mut self, gen: &mut DataGen, mut observer: F) -> BenchResult<RunSummary>
    where
        F: FnMut(u64, Option<i32>),
    {
        let (lo, hi) = self.cfg.value_range_for(self.pattern);
        let mut rec = RunRecorder::new();
        let mut last_result = None;

        for run in 1..=self.cfg.iterations as u64 {
            self.dataset.populate(gen, lo, hi);
            if self.pattern.shuffles_table() {
                if let Some(table) = self.table.as_mut() {
                    table.shuffle(gen);
                    debug_assert!(table.is_bijection());
                }
            }
            self.flusher.flush();

            let t = rec.start();
            let result = match self.table.as_ref() {
                None => Some(black_box(kernels::direct_sum_of_squares(
                    self.dataset.as_slice(),
                ))),
                Some(table) => {
                    kernels::square_through_table(self.dataset.as_mut_slice(), table);
                    black_box(self.dataset.as_slice());
                    None
                }
            };
            rec.record(t);

            if result.is_some() {
                last_result = result;
            }
            observer(run, result);
        }

        Ok(RunSummary::from_recorder(
            self.pattern,
            self.dataset.len(),
            &rec,
            self.started.elapsed(),
            last_result,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BenchError;

    fn small_cfg() -> BenchConfig {
        BenchConfig {
            cache_size_bytes: 4096,
            iterations: 5,
            dataset_multiplier: 2,
            value_range: None,
        }
    }

    #[test]
    fn invalid_config_fails_at_setup() {
        let cfg = BenchConfig {
            iterations: 0,
            ..small_cfg()
        };
        assert!(matches!(
            BenchmarkDriver::new(cfg, AccessPattern::Direct),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn direct_run_completes_all_iterations() {
        let mut gen = DataGen::with_seed(42);
        let driver = BenchmarkDriver::new(small_cfg(), AccessPattern::Direct).unwrap();
        let summary = driver.run(&mut gen).unwrap();

        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.dataset_len, 2 * 4096 / 4);
        assert!(summary.total_timed_secs >= 0.0);
        assert!(summary.wall_secs >= summary.total_timed_secs);
        // Values in [1, 10], so the floor average of squares is in [1, 100].
        let result = summary.last_result.unwrap();
        assert!((1..=100).contains(&result));
    }

    #[test]
    fn indirect_runs_produce_no_scalar() {
        let mut gen = DataGen::with_seed(42);
        for pattern in [
            AccessPattern::IndirectIdentity,
            AccessPattern::IndirectShuffled,
        ] {
            let driver = BenchmarkDriver::new(small_cfg(), pattern).unwrap();
            let summary = driver.run(&mut gen).unwrap();
            assert_eq!(summary.iterations, 5);
            assert_eq!(summary.last_result, None);
        }
    }

    #[test]
    fn observer_sees_every_run_in_order() {
        let mut gen = DataGen::with_seed(42);
        let driver = BenchmarkDriver::new(small_cfg(), AccessPattern::Direct).unwrap();
        let mut seen = Vec::new();
        driver
            .run_with(&mut gen, |run, result| {
                seen.push(run);
                assert!(result.is_some());
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }
}
