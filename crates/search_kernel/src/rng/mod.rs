//! # Random Number Generation
//!
//! Deterministic random streams for the search simulation.
//!
//! ## Design
//!
//! - **Reproducibility**: a seed plus a draw count fixes every value bit for bit
//! - **Owned state**: engine and Gaussian cache live in values, not globals
//! - **Explicit reseed**: [`SearchRng::reseed`] resets the engine and drops the
//!   cached Gaussian deviate in one call
//! - **Bounded loops**: rejection sampling reports exhaustion instead of
//!   spinning forever
//!
//! ## Module Structure
//!
//! - [`uniform`]: combined congruential engine with shuffle table
//! - [`gaussian`]: polar Box-Muller sampler and the [`UniformSource`] seam
//! - [`search_rng`]: engine plus sampler, the type the simulation uses
//!
//! ## Usage Example
//!
//! ```rust
//! use search_kernel::rng::SearchRng;
//!
//! let mut rng = SearchRng::from_seed(1_236_836);
//! let u = rng.gen_uniform();
//! assert!(u > 0.0 && u < 1.0);
//!
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer).unwrap();
//! ```

pub mod gaussian;
pub mod search_rng;
pub mod uniform;

// Public re-exports
pub use gaussian::{GaussianSampler, UniformSource, DEFAULT_REJECTION_LIMIT};
pub use search_rng::SearchRng;
pub use uniform::{UniformEngine, EPS, RNMX};

#[cfg(test)]
mod tests;
