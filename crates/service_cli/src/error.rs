//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;
use search_kernel::error::{ConfigError as ParameterError, SamplingError, SimulationError};

/// Errors surfaced by `rts` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or merged.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulation parameters were rejected by the kernel.
    #[error("Invalid simulation parameters: {0}")]
    Parameters(#[from] ParameterError),

    /// A trial failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// A raw random stream could not be drawn.
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// Invalid command line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML encoding failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
