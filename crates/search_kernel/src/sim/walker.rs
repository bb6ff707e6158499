//! Single diffusing searcher.
//!
//! # State machine
//!
//! ```text
//! place() ──► Active ──step()──► Active   (free move or reflection)
//!                      └─step()──► Absorbed (terminal)
//! ```

use super::config::SimulationConfig;
use super::domain::{radius, BoundaryCondition, Domain, DomainShape};
use super::step::BoundedStepSampler;
use crate::error::{ConfigError, SamplerKind, SamplingError};
use crate::rng::SearchRng;

/// Walker lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkerState {
    /// Still searching.
    #[default]
    Active,
    /// Reached the target. No further transitions.
    Absorbed,
}

/// A single walker searching for an absorbing target inside a bounded domain.
///
/// Position and step buffers are allocated once and reused across trials.
///
/// # Examples
///
/// ```rust
/// use search_kernel::rng::SearchRng;
/// use search_kernel::sim::{SimulationConfig, Walker, WalkerState};
///
/// let config = SimulationConfig::builder()
///     .system_size(10.0)
///     .target_size(1.0)
///     .dimension(2)
///     .time_scale(1e-2)
///     .build()
///     .unwrap();
///
/// let mut rng = SearchRng::from_seed(1_236_836);
/// let mut walker = Walker::new(&config);
/// walker.place(&mut rng).unwrap();
/// while walker.step(&mut rng).unwrap() == WalkerState::Active {}
/// assert!(walker.elapsed_time() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Walker {
    domain: Domain,
    sampler: BoundedStepSampler,
    time_scale: f64,
    step_scale: f64,
    placement_limit: usize,
    position: Vec<f64>,
    displacement: Vec<f64>,
    state: WalkerState,
    elapsed_time: f64,
    steps: u64,
}

impl Walker {
    /// Creates an unplaced walker at the origin for `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        let domain = config.domain().clone();
        let dimension = domain.dimension();
        let limits = config.limits();
        Self {
            domain,
            sampler: BoundedStepSampler::new(config.max_step_magnitude(), limits.bounded_step),
            time_scale: config.time_scale(),
            step_scale: config.step_scale(),
            placement_limit: limits.placement,
            position: vec![0.0; dimension],
            displacement: vec![0.0; dimension],
            state: WalkerState::Active,
            elapsed_time: 0.0,
            steps: 0,
        }
    }

    fn reset_clock(&mut self) {
        self.state = WalkerState::Active;
        self.elapsed_time = 0.0;
        self.steps = 0;
    }

    /// Places the walker uniformly in the search region and resets its
    /// clock.
    ///
    /// Each coordinate is drawn in `[-system_size, system_size]`; the whole
    /// vector is redrawn while it lies outside the domain or inside the
    /// target.
    ///
    /// # Errors
    ///
    /// [`SamplerKind::Placement`] exhaustion after the configured number of
    /// redraws.
    pub fn place(&mut self, rng: &mut SearchRng) -> Result<(), SamplingError> {
        self.reset_clock();
        let size = self.domain.system_size();

        for _ in 0..self.placement_limit {
            for x in self.position.iter_mut() {
                *x = size * (2.0 * rng.gen_uniform() - 1.0);
            }
            if self.domain.contains(&self.position) {
                return Ok(());
            }
        }
        Err(SamplingError::RejectionExhausted {
            sampler: SamplerKind::Placement,
            attempts: self.placement_limit,
        })
    }

    /// Puts the walker at an explicit position and resets its clock.
    ///
    /// The position is taken as is; no boundary rule is applied until the
    /// next [`apply_boundary`](Self::apply_boundary) or step.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if the length does not match the
    /// dimension.
    pub fn place_at(&mut self, position: &[f64]) -> Result<(), ConfigError> {
        if position.len() != self.domain.dimension() {
            return Err(ConfigError::invalid(
                "position",
                format!(
                    "expected {} coordinates, got {}",
                    self.domain.dimension(),
                    position.len()
                ),
            ));
        }
        self.reset_clock();
        self.position.copy_from_slice(position);
        Ok(())
    }

    /// Advances one step and applies the boundary rule.
    ///
    /// Absorbed walkers are left untouched. Otherwise the clock advances by
    /// `time_scale` whatever the step's outcome.
    ///
    /// # Errors
    ///
    /// Propagates [`SamplingError`] from step generation; the walker is not
    /// moved in that case.
    pub fn step(&mut self, rng: &mut SearchRng) -> Result<WalkerState, SamplingError> {
        if self.state == WalkerState::Absorbed {
            return Ok(WalkerState::Absorbed);
        }

        self.sampler
            .fill_step(rng, &mut self.displacement, self.step_scale)?;
        self.elapsed_time += self.time_scale;
        self.steps += 1;

        for (x, dx) in self.position.iter_mut().zip(&self.displacement) {
            *x += dx;
        }
        Ok(self.apply_boundary())
    }

    /// Applies the boundary rule to the current position.
    ///
    /// In a sphere, a position outside the system radius is mirrored to
    /// radius `2 * system_size - r` along the same direction; otherwise a
    /// position inside the target is absorbed.
    ///
    /// In a cube, every coordinate beyond `±system_size` is folded back,
    /// mirrored or wrapped depending on the boundary condition, and the
    /// folded position is then tested against the target.
    ///
    /// Absorbed walkers are never mutated.
    pub fn apply_boundary(&mut self) -> WalkerState {
        if self.state == WalkerState::Absorbed {
            return self.state;
        }

        let size = self.domain.system_size();
        match self.domain.shape() {
            DomainShape::Sphere => {
                let r = radius(&self.position);
                if r > size {
                    let factor = (2.0 * size - r) / r;
                    for x in self.position.iter_mut() {
                        *x *= factor;
                    }
                    return self.state;
                }
            }
            DomainShape::Cube => {
                let boundary = self.domain.boundary();
                for x in self.position.iter_mut().filter(|x| x.abs() > size) {
                    *x = fold(*x, size, boundary);
                }
            }
        }

        if self.domain.distance_to_target(&self.position) < self.domain.target_size() {
            self.state = WalkerState::Absorbed;
        }
        self.state
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Distance from the origin.
    #[inline]
    pub fn radius(&self) -> f64 {
        radius(&self.position)
    }

    /// Distance from the target centre.
    #[inline]
    pub fn distance_to_target(&self) -> f64 {
        self.domain.distance_to_target(&self.position)
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Returns `true` once the target has been reached.
    #[inline]
    pub fn is_absorbed(&self) -> bool {
        self.state == WalkerState::Absorbed
    }

    /// Simulated time since placement.
    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Steps taken since placement.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Folds a coordinate of a cube of half-width `size` back into
/// `[-size, size]`, however many widths it overshoots.
fn fold(x: f64, size: f64, boundary: BoundaryCondition) -> f64 {
    match boundary {
        BoundaryCondition::Reflecting => {
            let y = (x + size).rem_euclid(4.0 * size);
            if y > 2.0 * size {
                3.0 * size - y
            } else {
                y - size
            }
        }
        BoundaryCondition::Periodic => (x + size).rem_euclid(2.0 * size) - size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(dimension: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .system_size(10.0)
            .target_size(1.0)
            .dimension(dimension)
            .time_scale(1e-3)
            .build()
            .unwrap()
    }

    #[test]
    fn test_place_lands_in_annulus() {
        for dimension in 1..=4 {
            let mut walker = Walker::new(&config(dimension));
            let mut rng = SearchRng::from_seed(dimension as i64);
            for _ in 0..200 {
                walker.place(&mut rng).unwrap();
                let r = walker.radius();
                assert!((1.0..=10.0).contains(&r), "radius {} in {}D", r, dimension);
                assert_eq!(walker.state(), WalkerState::Active);
                assert_eq!(walker.elapsed_time(), 0.0);
            }
        }
    }

    #[test]
    fn test_place_is_reproducible() {
        let mut a = Walker::new(&config(3));
        let mut b = Walker::new(&config(3));
        a.place(&mut SearchRng::from_seed(8)).unwrap();
        b.place(&mut SearchRng::from_seed(8)).unwrap();
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn test_reflection_mirrors_outward_excursion() {
        let mut walker = Walker::new(&config(2));
        let delta = 0.3;
        walker.place_at(&[10.0 + delta, 0.0]).unwrap();

        assert_eq!(walker.apply_boundary(), WalkerState::Active);
        assert_relative_eq!(walker.radius(), 10.0 - delta, epsilon = 1e-12);
        assert_relative_eq!(walker.position()[0], 10.0 - delta, epsilon = 1e-12);
        assert_eq!(walker.position()[1], 0.0);
    }

    #[test]
    fn test_reflection_preserves_direction() {
        let mut walker = Walker::new(&config(3));
        let start = [6.0, 8.0, 2.0];
        let r0 = radius(&start);
        walker.place_at(&start).unwrap();
        walker.apply_boundary();

        let r1 = walker.radius();
        assert_relative_eq!(r1, 20.0 - r0, epsilon = 1e-12);
        for (x, x0) in walker.position().iter().zip(start) {
            assert_relative_eq!(x / r1, x0 / r0, epsilon = 1e-12);
        }
    }

    fn cube_config(boundary: BoundaryCondition, center: Vec<f64>) -> SimulationConfig {
        SimulationConfig::builder()
            .system_size(5.0)
            .target_size(1.0)
            .dimension(2)
            .time_scale(1e-2)
            .shape(DomainShape::Cube)
            .boundary(boundary)
            .target_center(center)
            .build()
            .unwrap()
    }

    #[test]
    fn test_cube_reflection_mirrors_each_axis() {
        let mut walker = Walker::new(&cube_config(BoundaryCondition::Reflecting, vec![0.0, 0.0]));
        walker.place_at(&[5.5, -6.0]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Active);
        assert_relative_eq!(walker.position()[0], 4.5, epsilon = 1e-12);
        assert_relative_eq!(walker.position()[1], -4.0, epsilon = 1e-12);

        // overshoot by more than a full width lands on the far side
        walker.place_at(&[16.0, 2.0]).unwrap();
        walker.apply_boundary();
        assert_relative_eq!(walker.position()[0], -4.0, epsilon = 1e-12);
        assert_eq!(walker.position()[1], 2.0);
    }

    #[test]
    fn test_cube_periodic_wraps() {
        let mut walker = Walker::new(&cube_config(BoundaryCondition::Periodic, vec![0.0, 0.0]));
        walker.place_at(&[5.5, -6.0]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Active);
        assert_relative_eq!(walker.position()[0], -4.5, epsilon = 1e-12);
        assert_relative_eq!(walker.position()[1], 4.0, epsilon = 1e-12);

        walker.place_at(&[-27.0, 3.0]).unwrap();
        walker.apply_boundary();
        assert_relative_eq!(walker.position()[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cube_wrap_can_land_in_target() {
        let mut walker = Walker::new(&cube_config(BoundaryCondition::Periodic, vec![-3.5, 0.0]));
        walker.place_at(&[5.8, 0.2]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Absorbed);
        assert!(walker.distance_to_target() < 1.0);
    }

    #[test]
    fn test_off_centre_target_absorbs_by_distance() {
        let mut walker = Walker::new(&cube_config(BoundaryCondition::Reflecting, vec![2.0, 2.0]));
        walker.place_at(&[0.5, 0.0]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Active);
        walker.place_at(&[2.5, 2.5]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Absorbed);
    }

    #[test]
    fn test_cube_placement_avoids_target() {
        let mut walker = Walker::new(&cube_config(BoundaryCondition::Periodic, vec![1.0, -1.0]));
        let mut rng = SearchRng::from_seed(11);
        let mut beyond_sphere = false;
        for _ in 0..500 {
            walker.place(&mut rng).unwrap();
            assert!(walker.position().iter().all(|x| x.abs() <= 5.0));
            assert!(walker.distance_to_target() >= 1.0);
            beyond_sphere |= walker.radius() > 5.0;
        }
        assert!(beyond_sphere, "placement never used the cube's corners");
    }

    #[test]
    fn test_cube_walk_stays_inside() {
        for boundary in [BoundaryCondition::Reflecting, BoundaryCondition::Periodic] {
            let mut walker = Walker::new(&cube_config(boundary, vec![3.0, 3.0]));
            let mut rng = SearchRng::from_seed(5);
            walker.place(&mut rng).unwrap();
            while walker.step(&mut rng).unwrap() == WalkerState::Active {
                assert!(walker.position().iter().all(|x| x.abs() <= 5.0));
            }
            assert!(walker.distance_to_target() < 1.0);
        }
    }

    #[test]
    fn test_inside_target_absorbs_and_freezes() {
        let mut walker = Walker::new(&config(2));
        walker.place_at(&[0.3, -0.4]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Absorbed);

        let frozen = walker.position().to_vec();
        let mut rng = SearchRng::from_seed(1);
        for _ in 0..10 {
            assert_eq!(walker.step(&mut rng).unwrap(), WalkerState::Absorbed);
        }
        assert_eq!(walker.position(), frozen.as_slice());
        assert_eq!(walker.steps(), 0);
        assert_eq!(walker.elapsed_time(), 0.0);
    }

    #[test]
    fn test_annulus_position_is_untouched() {
        let mut walker = Walker::new(&config(2));
        walker.place_at(&[3.0, 4.0]).unwrap();
        assert_eq!(walker.apply_boundary(), WalkerState::Active);
        assert_eq!(walker.position(), &[3.0, 4.0]);
    }

    #[test]
    fn test_step_advances_clock() {
        let mut walker = Walker::new(&config(2));
        walker.place_at(&[5.0, 0.0]).unwrap();
        let mut rng = SearchRng::from_seed(4);
        for _ in 0..3 {
            walker.step(&mut rng).unwrap();
        }
        assert_eq!(walker.steps(), 3);
        assert_relative_eq!(walker.elapsed_time(), 3e-3, epsilon = 1e-15);
        assert_ne!(walker.position(), &[5.0, 0.0]);
    }

    #[test]
    fn test_place_at_wrong_dimension() {
        let mut walker = Walker::new(&config(2));
        assert!(walker.place_at(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_placement_exhaustion() {
        // a thin 12D shell fills far less than 0.1% of its cube
        let config = SimulationConfig::builder()
            .system_size(10.0)
            .target_size(9.999)
            .dimension(12)
            .time_scale(1e-3)
            .limits(crate::sim::RejectionLimits {
                placement: 3,
                ..Default::default()
            })
            .build()
            .unwrap();
        let mut walker = Walker::new(&config);
        let err = walker.place(&mut SearchRng::from_seed(1)).unwrap_err();
        assert!(matches!(
            err,
            SamplingError::RejectionExhausted {
                sampler: SamplerKind::Placement,
                attempts: 3
            }
        ));
    }
}
