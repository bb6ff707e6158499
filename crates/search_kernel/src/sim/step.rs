//! Truncated Gaussian step generation.
//!
//! An unbounded Gaussian occasionally produces a step longer than the whole
//! domain, which the single-reflection boundary cannot map back inside.
//! Components are therefore redrawn until their magnitude is below a fixed
//! bound.
//!
//! This is rejection-only truncation, not a renormalised truncated normal:
//! the accepted values follow the normal density restricted to the bound.
//! With the default bound of `10 * system_size` standard deviations the
//! distortion is far below floating-point noise.

use crate::error::{SamplerKind, SamplingError};
use crate::rng::SearchRng;

/// Per-axis bounded Gaussian sampler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundedStepSampler {
    max_magnitude: f64,
    max_attempts: usize,
}

impl BoundedStepSampler {
    /// Creates a sampler accepting deviates with `|x| < max_magnitude`.
    pub fn new(max_magnitude: f64, max_attempts: usize) -> Self {
        Self {
            max_magnitude,
            max_attempts,
        }
    }

    /// Returns the truncation bound.
    #[inline]
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Draws one unscaled standard normal component below the bound.
    ///
    /// # Errors
    ///
    /// - [`SamplerKind::BoundedStep`] exhaustion after `max_attempts` redraws
    /// - any Gaussian sampling failure
    pub fn draw_bounded_step(&self, rng: &mut SearchRng) -> Result<f64, SamplingError> {
        for _ in 0..self.max_attempts {
            let x = rng.gen_normal()?;
            if x.abs() < self.max_magnitude {
                return Ok(x);
            }
        }
        Err(SamplingError::RejectionExhausted {
            sampler: SamplerKind::BoundedStep,
            attempts: self.max_attempts,
        })
    }

    /// Fills `displacement` with one bounded component per axis, each
    /// multiplied by `scale`.
    pub fn fill_step(
        &self,
        rng: &mut SearchRng,
        displacement: &mut [f64],
        scale: f64,
    ) -> Result<(), SamplingError> {
        for dx in displacement.iter_mut() {
            *dx = self.draw_bounded_step(rng)? * scale;
        }
        Ok(())
    }
}
