//! Run configuration management
//!
//! Handles loading configuration from TOML files, `RTS_*` environment
//! variables, and CLI arguments.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use search_kernel::error::ConfigError as ParameterError;
use search_kernel::sim::{BoundaryCondition, DomainShape, SimulationConfig, DEFAULT_BASE_SEED};

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "RTS_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid simulation parameters: {0}")]
    Parameters(#[from] ParameterError),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Effective configuration of an `rts` invocation.
///
/// Defaults reproduce the reference benchmark: a 2D reflecting disc of
/// radius 10 with a centred unit target, time scale `1e-3`, ten sets of one
/// hundred repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Outer radius or cube half-width
    pub system_size: f64,
    /// Absorbing target radius
    pub target_size: f64,
    /// Spatial dimension
    pub dimension: usize,
    /// Outer shape (sphere, cube)
    pub shape: DomainShape,
    /// Outer boundary condition (reflecting, periodic)
    pub boundary: BoundaryCondition,
    /// Target centre; the origin when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_center: Option<Vec<f64>>,
    /// Simulated time per step
    pub time_scale: f64,
    /// Gaussian truncation bound; `10 * system_size` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step_magnitude: Option<f64>,
    /// Number of searchers (seed derivation input)
    pub searcher_count: u32,
    /// Repetitions per set
    pub repeat_count: u32,
    /// Number of sets
    pub set_count: u32,
    /// Base seed
    pub base_seed: i64,
    /// Optional per-trial step cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            system_size: 10.0,
            target_size: 1.0,
            dimension: 2,
            shape: DomainShape::Sphere,
            boundary: BoundaryCondition::Reflecting,
            target_center: None,
            time_scale: 1e-3,
            max_step_magnitude: None,
            searcher_count: 1,
            repeat_count: 100,
            set_count: 10,
            base_seed: DEFAULT_BASE_SEED,
            max_steps: None,
            log_level: LogLevel::Info,
        }
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

/// Parses a comma-separated coordinate list such as `1.5,-2`.
fn parse_coordinates(name: &str, raw: &str) -> Result<Vec<f64>, ConfigError> {
    raw.split(',').map(|part| parse_value(name, part)).collect()
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `RTS_*` overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));

        if let Some(v) = var("SYSTEM_SIZE") {
            self.system_size = parse_value("RTS_SYSTEM_SIZE", &v)?;
        }
        if let Some(v) = var("TARGET_SIZE") {
            self.target_size = parse_value("RTS_TARGET_SIZE", &v)?;
        }
        if let Some(v) = var("DIMENSION") {
            self.dimension = parse_value("RTS_DIMENSION", &v)?;
        }
        if let Some(v) = var("SHAPE") {
            self.shape = parse_value("RTS_SHAPE", &v)?;
        }
        if let Some(v) = var("BOUNDARY") {
            self.boundary = parse_value("RTS_BOUNDARY", &v)?;
        }
        if let Some(v) = var("TARGET_CENTER") {
            self.target_center = Some(parse_coordinates("RTS_TARGET_CENTER", &v)?);
        }
        if let Some(v) = var("TIME_SCALE") {
            self.time_scale = parse_value("RTS_TIME_SCALE", &v)?;
        }
        if let Some(v) = var("MAX_STEP_MAGNITUDE") {
            self.max_step_magnitude = Some(parse_value("RTS_MAX_STEP_MAGNITUDE", &v)?);
        }
        if let Some(v) = var("SEARCHER_COUNT") {
            self.searcher_count = parse_value("RTS_SEARCHER_COUNT", &v)?;
        }
        if let Some(v) = var("REPEAT_COUNT") {
            self.repeat_count = parse_value("RTS_REPEAT_COUNT", &v)?;
        }
        if let Some(v) = var("SET_COUNT") {
            self.set_count = parse_value("RTS_SET_COUNT", &v)?;
        }
        if let Some(v) = var("SEED") {
            self.base_seed = parse_value("RTS_SEED", &v)?;
        }
        if let Some(v) = var("MAX_STEPS") {
            self.max_steps = Some(parse_value("RTS_MAX_STEPS", &v)?);
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&v)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(v) = cli.system_size {
            self.system_size = v;
        }
        if let Some(v) = cli.target_size {
            self.target_size = v;
        }
        if let Some(v) = cli.dimension {
            self.dimension = v;
        }
        if let Some(shape) = &cli.shape {
            self.shape = parse_value("shape", shape)?;
        }
        if let Some(boundary) = &cli.boundary {
            self.boundary = parse_value("boundary", boundary)?;
        }
        if cli.target_center.is_some() {
            self.target_center = cli.target_center.clone();
        }
        if let Some(v) = cli.time_scale {
            self.time_scale = v;
        }
        if cli.max_step_magnitude.is_some() {
            self.max_step_magnitude = cli.max_step_magnitude;
        }
        if let Some(v) = cli.searcher_count {
            self.searcher_count = v;
        }
        if let Some(v) = cli.repeat_count {
            self.repeat_count = v;
        }
        if let Some(v) = cli.set_count {
            self.set_count = v;
        }
        if let Some(v) = cli.seed {
            self.base_seed = v;
        }
        if cli.max_steps.is_some() {
            self.max_steps = cli.max_steps;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        Ok(())
    }

    /// Build the kernel configuration.
    pub fn to_simulation_config(&self) -> Result<SimulationConfig, ParameterError> {
        let mut builder = SimulationConfig::builder()
            .system_size(self.system_size)
            .target_size(self.target_size)
            .dimension(self.dimension)
            .shape(self.shape)
            .boundary(self.boundary)
            .time_scale(self.time_scale)
            .searcher_count(self.searcher_count)
            .repeat_count(self.repeat_count)
            .set_count(self.set_count)
            .base_seed(self.base_seed);
        if let Some(bound) = self.max_step_magnitude {
            builder = builder.max_step_magnitude(bound);
        }
        if let Some(cap) = self.max_steps {
            builder = builder.max_steps(cap);
        }
        if let Some(center) = &self.target_center {
            builder = builder.target_center(center.clone());
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_simulation_config()?;
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    pub system_size: Option<f64>,
    pub target_size: Option<f64>,
    pub dimension: Option<usize>,
    pub shape: Option<String>,
    pub boundary: Option<String>,
    pub target_center: Option<Vec<f64>>,
    pub time_scale: Option<f64>,
    pub max_step_magnitude: Option<f64>,
    pub searcher_count: Option<u32>,
    pub repeat_count: Option<u32>,
    pub set_count: Option<u32>,
    pub seed: Option<i64>,
    pub max_steps: Option<u64>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<RunConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;

    config.validate()?;
    Ok(config)
}
