//! The three workload kernels.
//!
//! All kernels perform the same arithmetic (squaring); they differ only in
//! how memory is walked, which is the entire point of the measurement. No
//! kernel allocates inside the timed window — the shuffled variant's
//! permutation happens in the driver before the timer starts.

use crate::dataset::IndirectionTable;

/// Direct variant: walk the dataset in storage order, accumulate the sum
/// of squares, return the floor average. Sequential and prefetchable — the
/// cache-friendliest baseline.
#[inline(never)]
pub fn direct_sum_of_squares(data: &[i32]) -> i32 {
    let mut sum: u64 = 0;
    for &d in data {
        sum += (d as u64) * (d as u64);
    }
    (sum / data.len() as u64) as i32
}

/// Indirect variant: walk the table's order, squaring each referenced
/// dataset element in place. With an identity table this matches storage
/// order but pays one extra dereference per element; with a shuffled table
/// it also defeats spatial locality and hardware prefetch.
#[inline(never)]
pub fn square_through_table(data: &mut [i32], table: &IndirectionTable) {
    for &slot in table.slots() {
        let v = data[slot];
        data[slot] = v * v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::DataGen;

    #[test]
    fn direct_kernel_floor_average_of_squares() {
        // floor((1 + 4 + 9 + 16) / 4) = 7
        assert_eq!(direct_sum_of_squares(&[1, 2, 3, 4]), 7);
    }

    #[test]
    fn direct_kernel_single_element() {
        assert_eq!(direct_sum_of_squares(&[5]), 25);
    }

    #[test]
    fn identity_table_squares_in_place() {
        let mut data = Dataset::from_values(vec![2, 3]);
        let table = IndirectionTable::identity(2).unwrap();
        square_through_table(data.as_mut_slice(), &table);
        assert_eq!(data.as_slice(), &[4, 9]);
        // Table ordering is untouched by the kernel.
        assert_eq!(table.slots(), &[0, 1]);
    }

    #[test]
    fn shuffled_table_squares_every_element_once() {
        let mut gen = DataGen::with_seed(42);
        let mut data = Dataset::from_values(vec![2, 3, 4, 5, 6, 7, 8, 9]);
        let mut table = IndirectionTable::identity(data.len()).unwrap();
        table.shuffle(&mut gen);
        assert!(table.is_bijection());

        square_through_table(data.as_mut_slice(), &table);
        // Traversal order differs but the result is order-independent.
        assert_eq!(data.as_slice(), &[4, 9, 16, 25, 36, 49, 64, 81]);
    }
}
