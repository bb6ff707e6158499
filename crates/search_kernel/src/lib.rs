//! # Search Kernel
//!
//! Deterministic random engine and first-passage diffusion simulation.
//!
//! This crate provides:
//! - A combined congruential uniform engine with a 32-slot shuffle table,
//!   reproducible bit for bit from an integer seed
//! - Polar Box-Muller Gaussian deviates with a one-ahead cache
//! - A walker diffusing in a reflecting sphere, or a reflecting or periodic
//!   cube, around an absorbing target
//! - A driver deriving per-trial seeds and collecting search times
//! - Moments and linear or logarithmic histograms of search times
//!
//! ## Usage Example
//!
//! ```rust
//! use search_kernel::sim::{SimulationConfig, SimulationDriver};
//!
//! let config = SimulationConfig::builder()
//!     .system_size(10.0)
//!     .target_size(1.0)
//!     .dimension(2)
//!     .time_scale(1e-3)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = SimulationDriver::new(config);
//! let seed = driver.set_seed(0);
//! let outcome = driver.run_trial(seed).unwrap();
//! assert!(outcome.is_absorbed());
//! assert!(outcome.search_time > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration, outcomes and
//!   statistics

#![warn(missing_docs)]

pub mod error;
pub mod rng;
pub mod sim;
