//! Startup constants and validation.
//!
//! The harness is configured entirely through these constants; there is no
//! runtime cache-size detection. Measurement validity depends on
//! `cache_size_bytes` being set correctly for the target machine.

use crate::{BenchError, BenchResult};
use serde::Serialize;

/// Assumed CPU cache size, in bytes. Adjust for the target machine.
pub const DEFAULT_CACHE_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Number of timed trials per run.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Dataset length as a multiple of the cache-fitting integer count.
pub const DEFAULT_DATASET_MULTIPLIER: usize = 10;

/// Largest value whose square fits in `i32`: `floor(sqrt(i32::MAX))`.
pub const MAX_SQUARE_BASE: i32 = 46_340;

// ────────────────────────────────────────────────────────────────────────────────
// Access pattern selection
// ────────────────────────────────────────────────────────────────────────────────

/// The memory-access strategy under measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPattern {
    /// Storage-order iteration over the dataset itself. The cache-friendly
    /// baseline: sequential, prefetchable.
    Direct,
    /// Iteration through the indirection table in identity order. Access
    /// order matches storage order; isolates the cost of indirection alone.
    IndirectIdentity,
    /// Iteration through a freshly shuffled indirection table. Indirection
    /// plus unpredictable order, defeating spatial locality and prefetch.
    IndirectShuffled,
}

impl AccessPattern {
    /// Whether this pattern squares dataset elements in place (as opposed
    /// to reducing them to a scalar).
    pub fn squares_in_place(self) -> bool {
        !matches!(self, AccessPattern::Direct)
    }

    /// Whether the indirection table must be re-shuffled before each trial.
    pub fn shuffles_table(self) -> bool {
        matches!(self, AccessPattern::IndirectShuffled)
    }

    /// Default population range for this pattern, chosen so squaring can
    /// never overflow the dataset's `i32` representation.
    pub fn default_value_range(self) -> (i32, i32) {
        match self {
            AccessPattern::Direct => (1, 10),
            _ => (1, MAX_SQUARE_BASE),
        }
    }

    pub fn all() -> [AccessPattern; 3] {
        [
            AccessPattern::Direct,
            AccessPattern::IndirectIdentity,
            AccessPattern::IndirectShuffled,
        ]
    }
}

impl std::fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessPattern::Direct => write!(f, "direct"),
            AccessPattern::IndirectIdentity => write!(f, "indirect_identity"),
            AccessPattern::IndirectShuffled => write!(f, "indirect_shuffled"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Config
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    /// Assumed cache capacity in bytes; scales the scratch buffers and the
    /// dataset.
    pub cache_size_bytes: usize,
    /// Number of timed trials, fixed at setup.
    pub iterations: usize,
    /// Dataset length = `dataset_multiplier × ints_in_cache()`.
    pub dataset_multiplier: usize,
    /// Overrides the pattern's default population range when set.
    pub value_range: Option<(i32, i32)>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            cache_size_bytes: DEFAULT_CACHE_SIZE_BYTES,
            iterations: DEFAULT_ITERATIONS,
            dataset_multiplier: DEFAULT_DATASET_MULTIPLIER,
            value_range: None,
        }
    }
}

impl BenchConfig {
    /// Number of `i32`s that fit in the assumed cache.
    pub fn ints_in_cache(&self) -> usize {
        self.cache_size_bytes / std::mem::size_of::<i32>()
    }

    /// Dataset element count; deliberately exceeds cache capacity.
    pub fn dataset_len(&self) -> usize {
        self.ints_in_cache() * self.dataset_multiplier
    }

    /// Effective population range for `pattern`.
    pub fn value_range_for(&self, pattern: AccessPattern) -> (i32, i32) {
        self.value_range
            .unwrap_or_else(|| pattern.default_value_range())
    }

    /// Setup-time validation. Any failure here aborts before timed work
    /// begins; a harness with an invalid basis produces no measurement.
    pub fn validate_for(&self, pattern: AccessPattern) -> BenchResult<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config("iterations must be non-zero".into()));
        }
        if self.dataset_multiplier == 0 {
            return Err(BenchError::Config(
                "dataset multiplier must be non-zero".into(),
            ));
        }
        if self.ints_in_cache() == 0 {
            return Err(BenchError::Config(format!(
                "cache size {}B holds no integers",
                self.cache_size_bytes
            )));
        }
        let (lo, hi) = self.value_range_for(pattern);
        if lo > hi {
            return Err(BenchError::Config(format!(
                "invalid value range: lower bound {} exceeds upper bound {}",
                lo, hi
            )));
        }
        if lo < 1 || hi > MAX_SQUARE_BASE {
            return Err(BenchError::Config(format!(
                "value range [{}, {}] outside [1, {}]; squaring could overflow i32",
                lo, hi, MAX_SQUARE_BASE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_len_is_multiplier_times_cache_ints() {
        let cfg = BenchConfig {
            cache_size_bytes: 1024,
            ..Default::default()
        };
        assert_eq!(cfg.ints_in_cache(), 256);
        assert_eq!(cfg.dataset_len(), 2560);

        let cfg = BenchConfig::default();
        assert_eq!(cfg.dataset_len(), 10 * (8 * 1024 * 1024 / 4));
    }

    #[test]
    fn zero_iterations_rejected() {
        let cfg = BenchConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate_for(AccessPattern::Direct),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn inverted_range_rejected() {
        let cfg = BenchConfig {
            value_range: Some((10, 1)),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate_for(AccessPattern::Direct),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn overflowing_square_range_rejected() {
        let cfg = BenchConfig {
            value_range: Some((1, MAX_SQUARE_BASE + 1)),
            ..Default::default()
        };
        assert!(cfg.validate_for(AccessPattern::IndirectIdentity).is_err());
    }

    #[test]
    fn pattern_defaults_avoid_overflow() {
        for p in AccessPattern::all() {
            let cfg = BenchConfig::default();
            cfg.validate_for(p).unwrap();
            let (lo, hi) = cfg.value_range_for(p);
            assert!(lo >= 1 && hi <= MAX_SQUARE_BASE);
        }
    }
}
