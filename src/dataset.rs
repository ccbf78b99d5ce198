//! The numeric dataset and its indirection table.

use crate::{BenchResult, DataGen};

/// Fixed-length sequence of `i32`s, sized to exceed the assumed cache
/// capacity so repeated runs cannot benefit from residual locality. Length
/// never changes after construction; contents are rewritten in place each
/// iteration.
pub struct Dataset {
    values: Vec<i32>,
}

impl Dataset {
    pub fn new(len: usize) -> BenchResult<Self> {
        let mut values: Vec<i32> = Vec::new();
        values.try_reserve_exact(len)?;
        values.resize(len, 0);
        Ok(Self { values })
    }

    /// Wrap literal values, bypassing randomness. Test configurations use
    /// this to make kernel output exactly predictable.
    pub fn from_values(values: Vec<i32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.values
    }

    /// Overwrite every element with a draw from `gen` in `[lo, hi]`.
    pub fn populate(&mut self, gen: &mut DataGen, lo: i32, hi: i32) {
        for v in &mut self.values {
            *v = gen.value_in(lo, hi);
        }
    }
}

/// One index per dataset element, initially the identity mapping.
///
/// Invariant: the table is a bijection onto the dataset's index set at all
/// times — shuffling permutes in place and never duplicates, drops, or
/// reallocates.
pub struct IndirectionTable {
    slots: Vec<usize>,
}

impl IndirectionTable {
    pub fn identity(len: usize) -> BenchResult<Self> {
        let mut slots: Vec<usize> = Vec::new();
        slots.try_reserve_exact(len)?;
        slots.extend(0..len);
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Uniform in-place permutation of the traversal order.
    pub fn shuffle(&mut self, gen: &mut DataGen) {
        gen.shuffle(&mut self.slots);
    }

    /// True when every index in `[0, len)` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];
        for &i in &self.slots {
            if i >= seen.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}
