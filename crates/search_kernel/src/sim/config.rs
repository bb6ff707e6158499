//! Search simulation configuration.
//!
//! This module provides the immutable run configuration and its builder.
//! Everything is validated once at build time; the kernel never mutates it.

use super::domain::{BoundaryCondition, Domain, DomainShape};
use crate::error::ConfigError;
use crate::rng::DEFAULT_REJECTION_LIMIT;

/// Default retry bound for walker placement.
///
/// Placement acceptance is the volume ratio of the annulus to the enclosing
/// cube, which shrinks quickly with dimension, hence the larger bound.
pub const DEFAULT_PLACEMENT_LIMIT: usize = 1_000_000;

/// Ratio of the default step bound to the system size.
pub const DEFAULT_STEP_BOUND_FACTOR: f64 = 10.0;

/// Retry bounds for the kernel's rejection loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectionLimits {
    /// Unit-disk rejections per Gaussian pair.
    pub gaussian: usize,
    /// Over-bound redraws per axis step.
    pub bounded_step: usize,
    /// Redrawn placements per trial.
    pub placement: usize,
}

impl Default for RejectionLimits {
    fn default() -> Self {
        Self {
            gaussian: DEFAULT_REJECTION_LIMIT,
            bounded_step: DEFAULT_REJECTION_LIMIT,
            placement: DEFAULT_PLACEMENT_LIMIT,
        }
    }
}

impl RejectionLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("gaussian_limit", self.gaussian),
            ("bounded_step_limit", self.bounded_step),
            ("placement_limit", self.placement),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(name, "must be at least 1"));
            }
        }
        Ok(())
    }
}

/// Search simulation configuration.
///
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .system_size(10.0)
///     .target_size(1.0)
///     .dimension(2)
///     .time_scale(1e-3)
///     .repeat_count(100)
///     .set_count(10)
///     .base_seed(1_231_423)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.max_step_magnitude(), 100.0);
/// assert_eq!(config.trial_count(), 1000);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    domain: Domain,
    /// Simulated time per step; the per-axis step variance is `2 * time_scale`.
    time_scale: f64,
    max_step_magnitude: f64,
    searcher_count: u32,
    repeat_count: u32,
    set_count: u32,
    base_seed: i64,
    /// `None` keeps stepping until absorption.
    max_steps: Option<u64>,
    limits: RejectionLimits,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the search domain.
    #[inline]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns the simulated time increment per step.
    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Returns the physical scale applied to unit Gaussian steps,
    /// `sqrt(2 * time_scale)`.
    #[inline]
    pub fn step_scale(&self) -> f64 {
        (2.0 * self.time_scale).sqrt()
    }

    /// Returns the truncation bound for unscaled Gaussian components.
    #[inline]
    pub fn max_step_magnitude(&self) -> f64 {
        self.max_step_magnitude
    }

    /// Returns the number of searchers (enters seed derivation only).
    #[inline]
    pub fn searcher_count(&self) -> u32 {
        self.searcher_count
    }

    /// Returns the number of repetitions per set.
    #[inline]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Returns the number of sets.
    #[inline]
    pub fn set_count(&self) -> u32 {
        self.set_count
    }

    /// Returns the base seed.
    #[inline]
    pub fn base_seed(&self) -> i64 {
        self.base_seed
    }

    /// Returns the optional step cap.
    #[inline]
    pub fn max_steps(&self) -> Option<u64> {
        self.max_steps
    }

    /// Returns the rejection loop bounds.
    #[inline]
    pub fn limits(&self) -> &RejectionLimits {
        &self.limits
    }

    /// Total number of trials in a batch.
    #[inline]
    pub fn trial_count(&self) -> u64 {
        u64::from(self.set_count) * u64::from(self.repeat_count)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `time_scale` or `max_step_magnitude` is not finite and positive
    /// - `searcher_count`, `repeat_count` or `set_count` is 0
    /// - `max_steps` is `Some(0)`
    /// - a rejection limit is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ConfigError::invalid(
                "time_scale",
                format!("{} must be finite and positive", self.time_scale),
            ));
        }
        if !(self.max_step_magnitude.is_finite() && self.max_step_magnitude > 0.0) {
            return Err(ConfigError::invalid(
                "max_step_magnitude",
                format!("{} must be finite and positive", self.max_step_magnitude),
            ));
        }
        for (name, value) in [
            ("searcher_count", self.searcher_count),
            ("repeat_count", self.repeat_count),
            ("set_count", self.set_count),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(name, "must be at least 1"));
            }
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::invalid("max_steps", "must be at least 1"));
        }
        self.limits.validate()
    }
}

/// Builder for [`SimulationConfig`].
///
/// Geometry and `time_scale` are required. Everything else defaults to the
/// reference run: a reflecting sphere with a centred target, one searcher,
/// one set of one repetition, base seed `1231423`, step bound
/// `10 * system_size`, no step cap.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    system_size: Option<f64>,
    target_size: Option<f64>,
    dimension: Option<usize>,
    time_scale: Option<f64>,
    max_step_magnitude: Option<f64>,
    searcher_count: Option<u32>,
    repeat_count: Option<u32>,
    set_count: Option<u32>,
    base_seed: Option<i64>,
    max_steps: Option<u64>,
    limits: RejectionLimits,
    shape: DomainShape,
    boundary: BoundaryCondition,
    target_center: Option<Vec<f64>>,
}

/// Base seed of the reference benchmark.
pub const DEFAULT_BASE_SEED: i64 = 1_231_423;

impl SimulationConfigBuilder {
    /// Sets the outer reflecting radius.
    #[inline]
    pub fn system_size(mut self, system_size: f64) -> Self {
        self.system_size = Some(system_size);
        self
    }

    /// Sets the inner absorbing radius.
    #[inline]
    pub fn target_size(mut self, target_size: f64) -> Self {
        self.target_size = Some(target_size);
        self
    }

    /// Sets the spatial dimension.
    #[inline]
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Sets the simulated time per step (`mu0`).
    #[inline]
    pub fn time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = Some(time_scale);
        self
    }

    /// Overrides the Gaussian truncation bound.
    #[inline]
    pub fn max_step_magnitude(mut self, max_step_magnitude: f64) -> Self {
        self.max_step_magnitude = Some(max_step_magnitude);
        self
    }

    /// Sets the searcher count.
    #[inline]
    pub fn searcher_count(mut self, searcher_count: u32) -> Self {
        self.searcher_count = Some(searcher_count);
        self
    }

    /// Sets the repetitions per set.
    #[inline]
    pub fn repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = Some(repeat_count);
        self
    }

    /// Sets the number of sets.
    #[inline]
    pub fn set_count(mut self, set_count: u32) -> Self {
        self.set_count = Some(set_count);
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn base_seed(mut self, base_seed: i64) -> Self {
        self.base_seed = Some(base_seed);
        self
    }

    /// Caps the number of steps per trial.
    #[inline]
    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Sets the rejection loop bounds.
    #[inline]
    pub fn limits(mut self, limits: RejectionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the outer shape.
    #[inline]
    pub fn shape(mut self, shape: DomainShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the outer boundary condition.
    #[inline]
    pub fn boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    /// Moves the target away from the origin.
    #[inline]
    pub fn target_center(mut self, target_center: Vec<f64>) -> Self {
        self.target_center = Some(target_center);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required field is missing, the geometry is
    /// invalid, or [`SimulationConfig::validate`] fails.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let system_size = self
            .system_size
            .ok_or_else(|| ConfigError::invalid("system_size", "must be specified"))?;
        let target_size = self
            .target_size
            .ok_or_else(|| ConfigError::invalid("target_size", "must be specified"))?;
        let dimension = self
            .dimension
            .ok_or_else(|| ConfigError::invalid("dimension", "must be specified"))?;
        let time_scale = self
            .time_scale
            .ok_or_else(|| ConfigError::invalid("time_scale", "must be specified"))?;

        let domain = Domain::with_layout(
            system_size,
            target_size,
            dimension,
            self.shape,
            self.boundary,
            self.target_center,
        )?;

        let config = SimulationConfig {
            domain,
            time_scale,
            max_step_magnitude: self
                .max_step_magnitude
                .unwrap_or(DEFAULT_STEP_BOUND_FACTOR * system_size),
            searcher_count: self.searcher_count.unwrap_or(1),
            repeat_count: self.repeat_count.unwrap_or(1),
            set_count: self.set_count.unwrap_or(1),
            base_seed: self.base_seed.unwrap_or(DEFAULT_BASE_SEED),
            max_steps: self.max_steps,
            limits: self.limits,
        };

        config.validate()?;
        Ok(config)
    }
}
