//! Per-trial seed derivation.
//!
//! A run's inputs are folded into a set seed with fixed prime weights; each
//! repetition inside the set then adds its own index. Identical inputs give
//! identical trial seeds, and therefore identical trajectories.

/// Weight of the searcher count.
pub const SEARCHER_PRIME: i64 = 5413;
/// Weight of the set index.
pub const SET_PRIME: i64 = 733;
/// Weight of the repetition count.
pub const REPEAT_PRIME: i64 = 13;

/// Seed shared by every trial of one set.
///
/// `base + searcher_count * 5413 + set_index * 733 + repeat_count * 13`,
/// with wrapping arithmetic.
///
/// `repeat_count` is the number of repetitions per set, not the index of a
/// repetition: every trial of the set shares this value. The per-repetition
/// offset is added afterwards by [`trial_seed`].
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::derive_seed;
///
/// assert_eq!(derive_seed(1_231_423, 1, 0, 0), 1_236_836);
/// ```
#[inline]
pub fn derive_seed(base_seed: i64, searcher_count: u32, set_index: u32, repeat_count: u32) -> i64 {
    base_seed
        .wrapping_add(i64::from(searcher_count).wrapping_mul(SEARCHER_PRIME))
        .wrapping_add(i64::from(set_index).wrapping_mul(SET_PRIME))
        .wrapping_add(i64::from(repeat_count).wrapping_mul(REPEAT_PRIME))
}

/// Seed of repetition `repeat_index` within a set.
#[inline]
pub fn trial_seed(set_seed: i64, repeat_index: u32) -> i64 {
    set_seed.wrapping_add(i64::from(repeat_index))
}
