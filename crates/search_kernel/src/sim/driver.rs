//! Trial orchestration.
//!
//! # Overview
//!
//! The [`SimulationDriver`] coordinates, for every trial:
//! 1. Seed derivation (via [`derive_seed`] and [`trial_seed`])
//! 2. Reseeding the owned [`SearchRng`]
//! 3. Uniform placement of the [`Walker`] in the search annulus
//! 4. Stepping until absorption or the optional step cap
//!
//! The walker and generator are owned by the driver and reused across
//! trials, so a batch allocates its position buffers once.

use tracing::{debug, trace, warn};

use super::config::SimulationConfig;
use super::seed::{derive_seed, trial_seed};
use super::stats::SearchTimeStats;
use super::walker::{Walker, WalkerState};
use crate::error::SimulationError;
use crate::rng::SearchRng;

/// How a trial ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrialStatus {
    /// The walker reached the target.
    Absorbed,
    /// The configured step cap was hit first.
    StepLimitReached,
}

/// Result of a single trial.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialOutcome {
    /// Set the trial belongs to.
    pub set_index: u32,
    /// Repetition within the set.
    pub repeat_index: u32,
    /// Engine seed used for the trial.
    pub seed: i64,
    /// Simulated time until absorption, or until the cap.
    pub search_time: f64,
    /// Steps taken.
    pub steps: u64,
    /// Termination status.
    pub status: TrialStatus,
}

impl TrialOutcome {
    /// Returns `true` if the walker reached the target.
    #[inline]
    pub fn is_absorbed(&self) -> bool {
        self.status == TrialStatus::Absorbed
    }
}

/// Outcomes of a full batch with their summary.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchResult {
    /// Every trial, ordered by set then repetition.
    pub outcomes: Vec<TrialOutcome>,
    /// Statistics over the absorbed trials.
    pub stats: SearchTimeStats,
}

/// Runs independent first-passage trials for one configuration.
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::{SimulationConfig, SimulationDriver};
///
/// let config = SimulationConfig::builder()
///     .system_size(5.0)
///     .target_size(1.0)
///     .dimension(2)
///     .time_scale(1e-2)
///     .repeat_count(3)
///     .build()
///     .unwrap();
///
/// let mut driver = SimulationDriver::new(config);
/// let batch = driver.run_batch().unwrap();
/// assert_eq!(batch.outcomes.len(), 3);
/// assert_eq!(batch.stats.count(), 3);
/// ```
#[derive(Debug)]
pub struct SimulationDriver {
    config: SimulationConfig,
    rng: SearchRng,
    walker: Walker,
}

impl SimulationDriver {
    /// Creates a driver with its own generator and walker.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = SearchRng::with_gaussian_limit(config.base_seed(), config.limits().gaussian);
        let walker = Walker::new(&config);
        Self {
            config,
            rng,
            walker,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed shared by the trials of `set_index`.
    #[inline]
    pub fn set_seed(&self, set_index: u32) -> i64 {
        derive_seed(
            self.config.base_seed(),
            self.config.searcher_count(),
            set_index,
            self.config.repeat_count(),
        )
    }

    /// Runs one trial from `seed`.
    ///
    /// The outcome's set and repetition indices are zero; use
    /// [`run_set`](Self::run_set) for indexed outcomes.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Sampling`] if any rejection loop is exhausted.
    pub fn run_trial(&mut self, seed: i64) -> Result<TrialOutcome, SimulationError> {
        self.rng.reseed(seed);
        self.walker.place(&mut self.rng)?;

        let max_steps = self.config.max_steps();
        let status = loop {
            if max_steps.is_some_and(|cap| self.walker.steps() >= cap) {
                warn!(
                    seed,
                    steps = self.walker.steps(),
                    "Step cap reached before absorption"
                );
                break TrialStatus::StepLimitReached;
            }
            if self.walker.step(&mut self.rng)? == WalkerState::Absorbed {
                break TrialStatus::Absorbed;
            }
        };

        let outcome = TrialOutcome {
            set_index: 0,
            repeat_index: 0,
            seed,
            search_time: self.walker.elapsed_time(),
            steps: self.walker.steps(),
            status,
        };
        trace!(
            seed,
            search_time = outcome.search_time,
            steps = outcome.steps,
            "Trial finished"
        );
        Ok(outcome)
    }

    /// Runs every repetition of one set.
    ///
    /// Repetition `i` uses `set_seed + i`.
    pub fn run_set(&mut self, set_index: u32) -> Result<Vec<TrialOutcome>, SimulationError> {
        let set_seed = self.set_seed(set_index);
        debug!(
            set_index,
            set_seed,
            repeats = self.config.repeat_count(),
            "Running set"
        );

        let mut outcomes = Vec::with_capacity(self.config.repeat_count() as usize);
        for repeat_index in 0..self.config.repeat_count() {
            let mut outcome = self.run_trial(trial_seed(set_seed, repeat_index))?;
            outcome.set_index = set_index;
            outcome.repeat_index = repeat_index;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Runs `set_count * repeat_count` trials and summarises them.
    pub fn run_batch(&mut self) -> Result<BatchResult, SimulationError> {
        let mut outcomes = Vec::with_capacity(self.config.trial_count() as usize);
        for set_index in 0..self.config.set_count() {
            outcomes.extend(self.run_set(set_index)?);
        }
        let stats = SearchTimeStats::from_outcomes(&outcomes);
        debug!(
            trials = outcomes.len(),
            absorbed = stats.count(),
            mean = stats.mean(),
            "Batch finished"
        );
        Ok(BatchResult { outcomes, stats })
    }
}
