//! Error types for the search kernel.
//!
//! This module provides:
//! - `ConfigError`: Invalid simulation parameters, rejected before a run starts
//! - `SamplingError`: A capped rejection loop ran out of attempts
//! - `SimulationError`: Any failure surfaced by the driver

use std::fmt;
use thiserror::Error;

/// Configuration error for the simulation.
///
/// These errors occur at build time when invalid parameters are provided.
/// They are fatal for the run and never retried.
///
/// # Examples
/// ```
/// use search_kernel::error::ConfigError;
///
/// let err = ConfigError::TargetNotInsideSystem { target_size: 10.0, system_size: 5.0 };
/// assert!(err.to_string().contains("target size 10"));
/// ```
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The absorbing target does not fit strictly inside the domain, so
    /// placement could never succeed.
    #[error("Invalid geometry: target size {target_size} must be smaller than system size {system_size}")]
    TargetNotInsideSystem {
        /// Inner absorbing radius.
        target_size: f64,
        /// Outer reflecting radius.
        system_size: f64,
    },

    /// Spatial dimension must be at least one.
    #[error("Invalid dimension {0}: must be at least 1")]
    InvalidDimension(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl ConfigError {
    /// Create an invalid parameter error
    pub fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

/// Rejection sampler that can exhaust its retry budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplerKind {
    /// Polar Box-Muller unit-disk rejection.
    Gaussian,
    /// Per-axis magnitude truncation of Gaussian steps.
    BoundedStep,
    /// Uniform placement inside the search annulus.
    Placement,
}

impl fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerKind::Gaussian => write!(f, "gaussian"),
            SamplerKind::BoundedStep => write!(f, "bounded-step"),
            SamplerKind::Placement => write!(f, "placement"),
        }
    }
}

/// Sampling failure.
///
/// With a correct uniform source none of the rejection loops comes close to
/// its bound; hitting one signals a broken source or a degenerate
/// configuration rather than bad luck.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SamplingError {
    /// Every attempt of a rejection loop was rejected.
    #[error("{sampler} sampler rejected {attempts} consecutive draws")]
    RejectionExhausted {
        /// Which sampler gave up.
        sampler: SamplerKind,
        /// Number of attempts made.
        attempts: usize,
    },
}

/// Errors surfaced by [`SimulationDriver`](crate::sim::SimulationDriver).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sampling error
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),
}
