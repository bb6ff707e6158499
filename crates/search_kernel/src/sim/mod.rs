//! First-passage diffusion simulation.
//!
//! A single walker diffuses inside a bounded domain until it enters an
//! absorbing target of radius `target_size`. The domain is a reflecting
//! sphere of radius `system_size` by default, or a cube of that half-width
//! with reflecting or periodic faces; the target sits at the origin unless
//! moved. The elapsed simulated time is the trial's search time.
//! [`SearchTimeStats`] and [`SearchTimeHistogram`] summarise a batch.
//!
//! # Architecture
//!
//! ```text
//! SimulationDriver
//! ├── SimulationConfig   (geometry, time scale, counts, seed, limits)
//! ├── SearchRng          (uniform engine + Gaussian cache)
//! └── Walker
//!     ├── place()        uniform in the search region
//!     ├── step()         BoundedStepSampler per axis
//!     └── apply_boundary()  reflect, wrap or absorb
//! ```
//!
//! # Reproducibility
//!
//! Trial seeds are derived from the configuration alone (see
//! [`derive_seed`]), so re-running a batch with the same configuration
//! reproduces every trajectory exactly.
//!
//! ```rust
//! use search_kernel::sim::{SimulationConfig, SimulationDriver};
//!
//! let config = SimulationConfig::builder()
//!     .system_size(10.0)
//!     .target_size(1.0)
//!     .dimension(2)
//!     .time_scale(1e-2)
//!     .build()
//!     .unwrap();
//!
//! let first = SimulationDriver::new(config.clone()).run_batch().unwrap();
//! let second = SimulationDriver::new(config).run_batch().unwrap();
//! assert_eq!(first, second);
//! ```

mod config;
mod domain;
mod driver;
mod seed;
mod stats;
mod step;
mod walker;

pub use config::{
    RejectionLimits, SimulationConfig, SimulationConfigBuilder, DEFAULT_BASE_SEED,
    DEFAULT_PLACEMENT_LIMIT, DEFAULT_STEP_BOUND_FACTOR,
};
pub use domain::{radius, BoundaryCondition, Domain, DomainShape};
pub use driver::{BatchResult, SimulationDriver, TrialOutcome, TrialStatus};
pub use seed::{derive_seed, trial_seed, REPEAT_PRIME, SEARCHER_PRIME, SET_PRIME};
pub use stats::{BinScale, HistogramBin, SearchTimeHistogram, SearchTimeStats};
pub use step::BoundedStepSampler;
pub use walker::{Walker, WalkerState};
