//! Combined congruential uniform engine with a Bays-Durham shuffle table.
//!
//! Two multiplicative congruential sequences (moduli [`IM1`] and [`IM2`]) are
//! advanced with Schrage's method and combined by subtraction. The output is
//! reordered through a 32-slot shuffle table indexed by the previous output.

use rand::{Error, RngCore, SeedableRng};

/// Modulus of the primary sequence.
pub const IM1: i64 = 2_147_483_563;
/// Modulus of the secondary sequence.
pub const IM2: i64 = 2_147_483_399;
/// Scale from an integer output to (0, 1).
pub const AM: f64 = 1.0 / IM1 as f64;
/// Wrap offset for the combined output.
pub const IMM1: i64 = IM1 - 1;
const IA1: i64 = 40_014;
const IA2: i64 = 40_692;
const IQ1: i64 = 53_668;
const IQ2: i64 = 52_774;
const IR1: i64 = 12_211;
const IR2: i64 = 3_791;
/// Shuffle table size.
pub const NTAB: usize = 32;
const NDIV: i64 = 1 + IMM1 / NTAB as i64;
/// Distance kept between the largest output and 1.
pub const EPS: f64 = 1.2e-7;
/// Largest value [`UniformEngine::draw`] returns.
pub const RNMX: f64 = 1.0 - EPS;

/// Warm-up iterations discarded before the table is filled.
const WARM_UP: usize = 8;

/// One step of `s <- a * s mod m` without 64-bit overflow (Schrage).
#[inline]
fn schrage(state: i64, a: i64, q: i64, r: i64, m: i64) -> i64 {
    let k = state / q;
    let next = a * (state - k * q) - k * r;
    if next < 0 {
        next + m
    } else {
        next
    }
}

/// Maps any signed seed into `[1, IM1 - 1]`.
#[inline]
fn normalise_seed(seed: i64) -> i64 {
    ((seed.unsigned_abs() % IM1 as u64) as i64).max(1)
}

/// Deterministic uniform generator.
///
/// Every instance owns its full state, so independent trials never share a
/// stream. The same seed followed by the same number of draws reproduces the
/// same values bit for bit.
///
/// # Examples
///
/// ```rust
/// use search_kernel::rng::UniformEngine;
///
/// let mut a = UniformEngine::new(1_231_423);
/// let mut b = UniformEngine::new(1_231_423);
/// assert_eq!(a.draw(), b.draw());
/// ```
#[derive(Clone, Debug)]
pub struct UniformEngine {
    /// Primary congruential state.
    seed: i64,
    /// Secondary congruential state.
    seed2: i64,
    /// Most recent combined output, selects the next table slot.
    iy: i64,
    table: [i64; NTAB],
    /// Seed passed to the last reseed, kept for reproducibility tracking.
    initial_seed: i64,
}

impl UniformEngine {
    /// Creates an engine initialised with `seed`.
    pub fn new(seed: i64) -> Self {
        let mut engine = Self {
            seed: 1,
            seed2: 1,
            iy: 0,
            table: [0; NTAB],
            initial_seed: seed,
        };
        engine.reseed(seed);
        engine
    }

    /// Resets the whole state from `seed`.
    ///
    /// Zero maps to 1 and negative seeds use their magnitude. Both sequences
    /// start from the normalised seed; the shuffle table is filled after
    /// `8` discarded warm-up steps of the primary recurrence.
    pub fn reseed(&mut self, seed: i64) {
        let mut state = normalise_seed(seed);
        self.seed2 = state;
        for j in (0..NTAB + WARM_UP).rev() {
            state = schrage(state, IA1, IQ1, IR1, IM1);
            if j < NTAB {
                self.table[j] = state;
            }
        }
        self.seed = state;
        self.iy = self.table[0];
        self.initial_seed = seed;
    }

    /// Returns the seed of the last reseed.
    #[inline]
    pub fn seed(&self) -> i64 {
        self.initial_seed
    }

    /// Advances both sequences and returns the shuffled integer output in
    /// `[1, IMM1]`.
    #[inline]
    fn next_raw(&mut self) -> i64 {
        self.seed = schrage(self.seed, IA1, IQ1, IR1, IM1);
        self.seed2 = schrage(self.seed2, IA2, IQ2, IR2, IM2);

        let j = (self.iy / NDIV) as usize;
        debug_assert!(j < NTAB);
        self.iy = self.table[j] - self.seed2;
        self.table[j] = self.seed;
        if self.iy < 1 {
            self.iy += IMM1;
        }
        self.iy
    }

    /// Draws a uniform deviate in `(0, 1 - EPS]`.
    ///
    /// The scaled output is rounded through `f32` before the clamp, which
    /// keeps streams identical to the single-precision reference generator.
    #[inline]
    pub fn draw(&mut self) -> f64 {
        let raw = self.next_raw();
        let temp = f64::from((AM * raw as f64) as f32);
        if temp > RNMX {
            RNMX
        } else {
            temp
        }
    }

    /// Read-only view of the shuffle table.
    #[inline]
    pub fn table(&self) -> &[i64; NTAB] {
        &self.table
    }
}

impl RngCore for UniformEngine {
    fn next_u32(&mut self) -> u32 {
        // spread [1, IMM1] over the full u32 range
        ((((self.next_raw() - 1) as u64) << 32) / IMM1 as u64) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for UniformEngine {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }
}
