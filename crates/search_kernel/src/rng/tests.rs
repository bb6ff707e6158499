//! Unit tests for the RNG module.
//!
//! This module contains tests verifying:
//! - Seed reproducibility of uniform and normal streams
//! - Golden values of the reference seed, compared bit for bit
//! - Uniform range including the epsilon clamp
//! - Gaussian pairing and cache invalidation on reseed
//! - Distribution moments
//! - Statistical properties via property-based testing

use super::*;
use rand::Rng;

/// Verifies that the same seed produces identical sequences.
#[test]
fn test_seed_reproducibility() {
    let mut rng1 = SearchRng::from_seed(12345);
    let mut rng2 = SearchRng::from_seed(12345);

    for _ in 0..100 {
        assert_eq!(rng1.gen_uniform(), rng2.gen_uniform());
    }

    let mut rng3 = SearchRng::from_seed(12345);
    let mut rng4 = SearchRng::from_seed(12345);

    for _ in 0..100 {
        assert_eq!(rng3.gen_normal().unwrap(), rng4.gen_normal().unwrap());
    }
}

/// Reseeding mid-stream restarts the exact same sequence.
#[test]
fn test_reseed_restarts_stream() {
    let mut rng = SearchRng::from_seed(1_236_836);
    let first: Vec<f64> = (0..50).map(|_| rng.gen_uniform()).collect();

    rng.reseed(1_236_836);
    let second: Vec<f64> = (0..50).map(|_| rng.gen_uniform()).collect();

    assert_eq!(first, second);
    assert_eq!(rng.seed(), 1_236_836);
}

/// First uniform draws for the reference benchmark seed.
#[allow(clippy::excessive_precision)]
const GOLDEN_UNIFORM: [f64; 5] = [
    0.77389371395111084,
    0.71619892120361328,
    0.56440621614456177,
    0.84284663200378418,
    0.081523887813091278,
];

/// First Gaussian draws after reseeding with the reference benchmark seed.
#[allow(clippy::excessive_precision)]
const GOLDEN_NORMAL: [f64; 5] = [
    0.74319922669359062,
    0.94152919575853589,
    1.1793439294474612,
    0.22154827534642843,
    -0.077013543090750425,
];

/// Pins the uniform stream bit for bit, including the single-precision
/// rounding of every draw.
#[test]
fn test_golden_uniform_stream() {
    let mut rng = SearchRng::from_seed(1_236_836);
    for (i, expected) in GOLDEN_UNIFORM.iter().enumerate() {
        let u = rng.gen_uniform();
        assert_eq!(u.to_bits(), expected.to_bits(), "draw {i}: {u:.17} != {expected:.17}");
    }
}

/// Pins the Gaussian stream bit for bit, served fresh pair then cache.
#[test]
fn test_golden_normal_stream() {
    let mut rng = SearchRng::from_seed(42);
    rng.gen_normal().unwrap();
    assert!(rng.has_cached_normal());

    rng.reseed(1_236_836);
    for (i, expected) in GOLDEN_NORMAL.iter().enumerate() {
        let z = rng.gen_normal().unwrap();
        assert_eq!(z.to_bits(), expected.to_bits(), "draw {i}: {z:.17} != {expected:.17}");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = SearchRng::from_seed(1);
    let mut b = SearchRng::from_seed(2);
    let same = (0..100).filter(|_| a.gen_uniform() == b.gen_uniform()).count();
    assert!(same < 5);
}

/// Verifies that uniform values are in (0, 1 - EPS].
#[test]
fn test_uniform_range() {
    let mut rng = SearchRng::from_seed(42);

    for _ in 0..100_000 {
        let value = rng.gen_uniform();
        assert!(value > 0.0, "Uniform value {} is not above 0", value);
        assert!(value <= RNMX, "Uniform value {} exceeds 1 - EPS", value);
        assert!(value < 1.0);
    }
}

#[test]
fn test_uniform_mean_and_variance() {
    let mut rng = SearchRng::from_seed(1_231_412_314);
    let n = 200_000;
    let mut buffer = vec![0.0; n];
    rng.fill_uniform(&mut buffer);

    let mean = buffer.iter().sum::<f64>() / n as f64;
    let variance = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    assert!((mean - 0.5).abs() < 0.01, "mean {}", mean);
    assert!((variance - 1.0 / 12.0).abs() < 0.005, "variance {}", variance);
}

#[test]
fn test_uniform_buckets_are_balanced() {
    let mut rng = SearchRng::from_seed(77);
    let mut counts = [0usize; 10];
    let n = 100_000;
    for _ in 0..n {
        let bucket = (rng.gen_uniform() * 10.0) as usize;
        counts[bucket.min(9)] += 1;
    }
    for (i, &count) in counts.iter().enumerate() {
        let share = count as f64 / n as f64;
        assert!((share - 0.1).abs() < 0.01, "bucket {} share {}", i, share);
    }
}

/// Two consecutive calls after a reseed compute one fresh pair.
#[test]
fn test_gaussian_pairing_alternates() {
    let mut rng = SearchRng::from_seed(9);
    assert!(!rng.has_cached_normal());

    rng.gen_normal().unwrap();
    assert!(rng.has_cached_normal());
    rng.gen_normal().unwrap();
    assert!(!rng.has_cached_normal());
    rng.gen_normal().unwrap();
    assert!(rng.has_cached_normal());
}

/// A cached deviate must never leak across a reseed boundary.
#[test]
fn test_gaussian_cache_does_not_survive_reseed() {
    let mut fresh = SearchRng::from_seed(2024);
    let expected = [fresh.gen_normal().unwrap(), fresh.gen_normal().unwrap()];

    let mut reused = SearchRng::from_seed(555);
    reused.gen_normal().unwrap();
    assert!(reused.has_cached_normal());

    reused.reseed(2024);
    assert!(!reused.has_cached_normal());
    let got = [reused.gen_normal().unwrap(), reused.gen_normal().unwrap()];

    assert_eq!(got, expected);
}

#[test]
fn test_normal_moments() {
    let mut rng = SearchRng::from_seed(1_231_412_314);
    let n = 200_000;
    let mut buffer = vec![0.0; n];
    rng.fill_normal(&mut buffer).unwrap();

    let mean = buffer.iter().sum::<f64>() / n as f64;
    let variance = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    assert!(mean.abs() < 0.02, "mean {}", mean);
    assert!((variance - 1.0).abs() < 0.03, "variance {}", variance);
}

/// Verifies that empty buffer is handled gracefully.
#[test]
fn test_empty_buffer() {
    let mut rng = SearchRng::from_seed(42);
    let mut empty: Vec<f64> = vec![];

    rng.fill_uniform(&mut empty);
    rng.fill_normal(&mut empty).unwrap();
}

/// The engine plugs into `rand` adaptors.
#[test]
fn test_rand_interop() {
    let mut rng = SearchRng::from_seed(31);
    for _ in 0..1_000 {
        let x: u32 = rng.engine_mut().gen_range(0..6);
        assert!(x < 6);
    }
}

// ============================================================================
// Property-Based Tests with Proptest
// ============================================================================

use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property test: every uniform value lies in (0, 1 - EPS] for any seed.
    #[test]
    fn prop_uniform_in_range(seed in any::<i64>(), size in 1..5000usize) {
        let mut rng = SearchRng::from_seed(seed);
        let mut buffer = vec![0.0; size];
        rng.fill_uniform(&mut buffer);

        for (i, &v) in buffer.iter().enumerate() {
            prop_assert!(
                v > 0.0 && v <= RNMX,
                "Uniform value at index {} is out of range: {} (seed={})",
                i, v, seed
            );
        }
    }

    /// Property test: same seed must produce identical sequences.
    #[test]
    fn prop_seed_determinism(seed in any::<i64>(), count in 1..1000usize) {
        let mut rng1 = SearchRng::from_seed(seed);
        let mut rng2 = SearchRng::from_seed(seed);

        for i in 0..count {
            let v1 = rng1.gen_uniform();
            let v2 = rng2.gen_uniform();
            prop_assert_eq!(
                v1, v2,
                "Mismatch at index {} for seed {}: {} vs {}",
                i, seed, v1, v2
            );
        }
    }

    /// Property test: normal deviates are finite for any seed.
    #[test]
    fn prop_normal_finite(seed in any::<i64>()) {
        let mut rng = SearchRng::from_seed(seed);
        let mut buffer = vec![0.0; 1000];
        rng.fill_normal(&mut buffer).unwrap();
        prop_assert!(buffer.iter().all(|x| x.is_finite()));
    }
}
