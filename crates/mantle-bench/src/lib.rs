//! Benchmark fixtures for the Mantle raw memory access facility.
//!
//! Deterministic helpers shared by the Criterion benches: scattered slot
//! offsets produced by an LCG shuffle, reproducible across runs with no
//! randomness dependency.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Number of slots the benches touch per iteration batch.
pub const SLOT_COUNT: usize = 1024;

const LCG_MUL: u64 = 6364136223846793005;
const LCG_ADD: u64 = 1442695040888963407;

/// Generate `count` byte offsets, each a multiple of `stride`, covering a
/// region of `count * stride` bytes in a shuffled order.
///
/// Fisher-Yates driven by an LCG, so a given seed always produces the
/// same permutation — benches stay comparable run to run.
pub fn scattered_offsets(count: usize, stride: usize, seed: u64) -> Vec<usize> {
    let mut offsets: Vec<usize> = (0..count).map(|k| k * stride).collect();
    let mut state = seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);
    for i in (1..offsets.len()).rev() {
        state = state.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);
        let j = (state >> 33) as usize % (i + 1);
        offsets.swap(i, j);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_a_permutation_of_the_strided_range() {
        let mut offsets = scattered_offsets(64, 8, 42);
        offsets.sort_unstable();
        let expected: Vec<usize> = (0..64).map(|k| k * 8).collect();
        assert_eq!(offsets, expected);
    }

    #[test]
    fn offsets_are_deterministic_per_seed() {
        assert_eq!(scattered_offsets(128, 4, 7), scattered_offsets(128, 4, 7));
        assert_ne!(scattered_offsets(128, 4, 7), scattered_offsets(128, 4, 8));
    }
}
