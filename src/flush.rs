//! Deterministic cache eviction between timed runs.

use crate::BenchResult;
use std::hint::black_box;

/// Owns two cache-sized scratch buffers and evicts the CPU cache by copying
/// one over the other, pushing `cache_size_bytes` of unrelated data through
/// the cache hierarchy.
///
/// Both buffers are allocated exactly once and never resized; a harness
/// that cannot flush the cache cannot produce meaningful measurements, so
/// allocation failure is fatal to the run. Buffer contents are irrelevant —
/// only the act of the copy matters.
pub struct CacheFlusher {
    src: Box<[u8]>,
    dst: Box<[u8]>,
}

impl CacheFlusher {
    pub fn new(cache_size_bytes: usize) -> BenchResult<Self> {
        Ok(Self {
            src: alloc_zeroed(cache_size_bytes)?,
            dst: alloc_zeroed(cache_size_bytes)?,
        })
    }

    /// Overwrite the destination buffer from the source buffer. Must run
    /// immediately before each timed kernel call and never inside the timed
    /// window.
    pub fn flush(&mut self) {
        self.dst.copy_from_slice(&self.src);
        // Keep the copy observable so it cannot be elided.
        black_box(&mut self.dst);
    }

    /// Bytes moved per flush.
    pub fn len(&self) -> usize {
        self.dst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dst.is_empty()
    }

    /// Fill the source buffer with a sentinel byte. The flush side effect
    /// is then observable as the destination matching it.
    pub fn seed_source(&mut self, byte: u8) {
        self.src.fill(byte);
    }

    pub fn destination(&self) -> &[u8] {
        &self.dst
    }
}

fn alloc_zeroed(n: usize) -> BenchResult<Box<[u8]>> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(n)?;
    buf.resize(n, 0);
    Ok(buf.into_boxed_slice())
}
