//! Polar Box-Muller standard normal sampler.
//!
//! Each accepted trial yields two independent deviates; one is returned and
//! the other is cached for the next call.

use super::uniform::UniformEngine;
use crate::error::{SamplerKind, SamplingError};

/// Default retry bound for every rejection loop in the kernel.
///
/// The unit-disk acceptance rate is π/4, so 10 000 straight rejections
/// never happen with a working uniform source.
pub const DEFAULT_REJECTION_LIMIT: usize = 10_000;

/// Source of uniform deviates in `(0, 1)`.
///
/// The seam exists so samplers can be driven by something other than
/// [`UniformEngine`], e.g. a degenerate source in tests.
pub trait UniformSource {
    /// Returns the next uniform deviate.
    fn next_uniform(&mut self) -> f64;
}

impl UniformSource for UniformEngine {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.draw()
    }
}

/// Standard normal sampler with a one-ahead cache.
///
/// The sampler owns only its cache; the uniform stream is passed in on each
/// call. [`reseed`](Self::reseed) must accompany every reseed of the
/// underlying engine, otherwise the cached deviate from the previous stream
/// is served first.
///
/// # Examples
///
/// ```rust
/// use search_kernel::rng::{GaussianSampler, UniformEngine};
///
/// let mut engine = UniformEngine::new(42);
/// let mut gaussian = GaussianSampler::new();
///
/// let first = gaussian.draw(&mut engine).unwrap();
/// assert!(gaussian.has_cached());
/// let second = gaussian.draw(&mut engine).unwrap();
/// assert!(!gaussian.has_cached());
/// assert_ne!(first, second);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianSampler {
    cached: Option<f64>,
    max_attempts: usize,
}

impl Default for GaussianSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianSampler {
    /// Creates a sampler with [`DEFAULT_REJECTION_LIMIT`].
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_REJECTION_LIMIT)
    }

    /// Creates a sampler that gives up after `max_attempts` rejected pairs.
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            cached: None,
            max_attempts,
        }
    }

    /// Discards the cached deviate.
    #[inline]
    pub fn reseed(&mut self) {
        self.cached = None;
    }

    /// Returns `true` when the next call will be served from the cache.
    #[inline]
    pub fn has_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Returns one standard normal deviate.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::RejectionExhausted`] if `max_attempts`
    /// consecutive pairs fall outside the open unit disk or on its centre.
    pub fn draw<S>(&mut self, source: &mut S) -> Result<f64, SamplingError>
    where
        S: UniformSource + ?Sized,
    {
        if let Some(value) = self.cached.take() {
            return Ok(value);
        }

        let (v1, v2, rsq) = unit_disk_pair(source, self.max_attempts)?;
        let fac = (-2.0 * rsq.ln() / rsq).sqrt();
        self.cached = Some(v1 * fac);
        Ok(v2 * fac)
    }
}

/// Draws `(v1, v2)` uniformly from the open unit disk minus its centre.
fn unit_disk_pair<S>(source: &mut S, max_attempts: usize) -> Result<(f64, f64, f64), SamplingError>
where
    S: UniformSource + ?Sized,
{
    for _ in 0..max_attempts {
        let v1 = 2.0 * source.next_uniform() - 1.0;
        let v2 = 2.0 * source.next_uniform() - 1.0;
        let rsq = v1 * v1 + v2 * v2;
        // rsq == 0 would send ln() to -inf
        if rsq > 0.0 && rsq < 1.0 {
            return Ok((v1, v2, rsq));
        }
    }
    Err(SamplingError::RejectionExhausted {
        sampler: SamplerKind::Gaussian,
        attempts: max_attempts,
    })
}
