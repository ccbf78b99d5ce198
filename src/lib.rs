//! Cold-cache access-pattern micro-benchmark harness.
//!
//! Measures the cost of pointer indirection versus direct sequential access
//! over a dataset sized to dwarf the CPU cache. Each timed run is preceded
//! by a deterministic cache flush so that no iteration benefits from
//! residual locality. Three kernels share one arithmetic transformation
//! (squaring) and differ only in how memory is walked: storage order,
//! identity-order indirection, or shuffled indirection.

pub mod config;
pub mod dataset;
pub mod driver;
pub mod flush;
pub mod kernels;
pub mod recorder;
pub mod report;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::TryReserveError;

// ────────────────────────────────────────────────────────────────────────────────
// Error type
// ────────────────────────────────────────────────────────────────────────────────

pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug)]
pub enum BenchError {
    Io(std::io::Error),
    Config(String),
    Resource(String),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchError::Io(e) => write!(f, "IO error: {}", e),
            BenchError::Config(s) => write!(f, "Config error: {}", s),
            BenchError::Resource(s) => write!(f, "Resource error: {}", s),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<std::io::Error> for BenchError {
    fn from(e: std::io::Error) -> Self {
        BenchError::Io(e)
    }
}

impl From<TryReserveError> for BenchError {
    fn from(e: TryReserveError) -> Self {
        BenchError::Resource(format!("allocation failed: {}", e))
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Process-lifetime random source (ChaCha8Rng)
// ────────────────────────────────────────────────────────────────────────────────

/// The single random source for a benchmark process.
///
/// Constructed once — from OS entropy for real runs, or from a fixed seed
/// for reproducible runs and tests — and threaded by `&mut` reference
/// through dataset population and table shuffling. Re-seeding per iteration
/// would be slow and buys nothing: only the value distribution matters.
pub struct DataGen {
    rng: ChaCha8Rng,
}

impl DataGen {
    /// Seed from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seed deterministically; identical seeds yield identical streams.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw one value from the inclusive range `[lo, hi]`.
    #[inline]
    pub fn value_in(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform in-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, xs: &mut [T]) {
        xs.shuffle(&mut self.rng);
    }
}

pub use config::{AccessPattern, BenchConfig};
pub use dataset::{Dataset, IndirectionTable};
pub use driver::BenchmarkDriver;
pub use flush::CacheFlusher;
pub use recorder::{RunRecorder, RunSummary};
