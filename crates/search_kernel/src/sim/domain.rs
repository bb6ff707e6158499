//! Search domain: a bounded region with an absorbing spherical target.
//!
//! Two outer shapes are supported:
//!
//! - [`DomainShape::Sphere`]: radius `system_size`, reflected radially
//! - [`DomainShape::Cube`]: `[-system_size, system_size]^d`, folded per axis,
//!   either mirrored ([`BoundaryCondition::Reflecting`]) or wrapped
//!   ([`BoundaryCondition::Periodic`])
//!
//! The target is a ball of radius `target_size` around `target_center`,
//! which defaults to the origin.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Outer shape of the domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DomainShape {
    /// Ball of radius `system_size` around the origin.
    #[default]
    Sphere,
    /// Axis-aligned cube of half-width `system_size`.
    Cube,
}

impl FromStr for DomainShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sphere" => Ok(DomainShape::Sphere),
            "cube" => Ok(DomainShape::Cube),
            _ => Err(ConfigError::invalid("shape", format!("unknown shape '{}'", s))),
        }
    }
}

impl fmt::Display for DomainShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainShape::Sphere => write!(f, "sphere"),
            DomainShape::Cube => write!(f, "cube"),
        }
    }
}

/// What happens to a walker that leaves the outer boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundaryCondition {
    /// Mirrored back inside.
    #[default]
    Reflecting,
    /// Re-enters from the opposite face. Cube only.
    Periodic,
}

impl FromStr for BoundaryCondition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reflecting" | "reflect" => Ok(BoundaryCondition::Reflecting),
            "periodic" => Ok(BoundaryCondition::Periodic),
            _ => Err(ConfigError::invalid(
                "boundary",
                format!("unknown boundary condition '{}'", s),
            )),
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Reflecting => write!(f, "reflecting"),
            BoundaryCondition::Periodic => write!(f, "periodic"),
        }
    }
}

/// Geometry of the search problem.
///
/// A valid domain always satisfies `0 < target_size < system_size`,
/// `dimension >= 1`, and keeps the whole target inside the outer boundary.
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::{BoundaryCondition, Domain, DomainShape};
///
/// let domain = Domain::with_layout(
///     5.0,
///     1.0,
///     2,
///     DomainShape::Cube,
///     BoundaryCondition::Periodic,
///     Some(vec![2.0, -2.0]),
/// )
/// .unwrap();
/// assert_eq!(domain.distance_to_target(&[2.0, 0.0]), 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    system_size: f64,
    target_size: f64,
    dimension: usize,
    shape: DomainShape,
    boundary: BoundaryCondition,
    target_center: Vec<f64>,
}

impl Domain {
    /// Creates a reflecting sphere with the target at its centre.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDimension`] if `dimension == 0`
    /// - [`ConfigError::InvalidParameter`] if a radius is not finite and positive
    /// - [`ConfigError::TargetNotInsideSystem`] if `target_size >= system_size`
    pub fn new(system_size: f64, target_size: f64, dimension: usize) -> Result<Self, ConfigError> {
        Self::with_layout(
            system_size,
            target_size,
            dimension,
            DomainShape::Sphere,
            BoundaryCondition::Reflecting,
            None,
        )
    }

    /// Creates a domain of any shape with an optional off-centre target.
    ///
    /// # Errors
    ///
    /// Everything [`Domain::new`] rejects, plus [`ConfigError::InvalidParameter`]
    /// if the boundary does not apply to the shape, or `target_center` has the
    /// wrong length, is not finite, or pushes the target across the boundary.
    pub fn with_layout(
        system_size: f64,
        target_size: f64,
        dimension: usize,
        shape: DomainShape,
        boundary: BoundaryCondition,
        target_center: Option<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        if dimension == 0 {
            return Err(ConfigError::InvalidDimension(dimension));
        }
        if !(system_size.is_finite() && system_size > 0.0) {
            return Err(ConfigError::invalid(
                "system_size",
                format!("{} must be finite and positive", system_size),
            ));
        }
        if !(target_size.is_finite() && target_size > 0.0) {
            return Err(ConfigError::invalid(
                "target_size",
                format!("{} must be finite and positive", target_size),
            ));
        }
        if target_size >= system_size {
            return Err(ConfigError::TargetNotInsideSystem {
                target_size,
                system_size,
            });
        }
        if shape == DomainShape::Sphere && boundary == BoundaryCondition::Periodic {
            return Err(ConfigError::invalid(
                "boundary",
                "periodic boundaries need a cube domain",
            ));
        }

        let target_center = target_center.unwrap_or_else(|| vec![0.0; dimension]);
        if target_center.len() != dimension {
            return Err(ConfigError::invalid(
                "target_center",
                format!(
                    "expected {} coordinates, got {}",
                    dimension,
                    target_center.len()
                ),
            ));
        }
        if target_center.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid("target_center", "must be finite"));
        }
        let fits = match shape {
            DomainShape::Sphere => radius(&target_center) + target_size < system_size,
            DomainShape::Cube => target_center
                .iter()
                .all(|c| c.abs() + target_size < system_size),
        };
        if !fits {
            return Err(ConfigError::invalid(
                "target_center",
                format!(
                    "target of size {} at {:?} crosses the {} boundary",
                    target_size, target_center, shape
                ),
            ));
        }

        Ok(Self {
            system_size,
            target_size,
            dimension,
            shape,
            boundary,
            target_center,
        })
    }

    /// Outer radius or cube half-width.
    #[inline]
    pub fn system_size(&self) -> f64 {
        self.system_size
    }

    /// Absorbing target radius.
    #[inline]
    pub fn target_size(&self) -> f64 {
        self.target_size
    }

    /// Number of spatial axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Outer shape.
    #[inline]
    pub fn shape(&self) -> DomainShape {
        self.shape
    }

    /// Outer boundary condition.
    #[inline]
    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    /// Centre of the target.
    #[inline]
    pub fn target_center(&self) -> &[f64] {
        &self.target_center
    }

    /// Euclidean distance from `position` to the target centre.
    #[inline]
    pub fn distance_to_target(&self, position: &[f64]) -> f64 {
        position
            .iter()
            .zip(&self.target_center)
            .map(|(x, c)| (x - c) * (x - c))
            .sum::<f64>()
            .sqrt()
    }

    /// Returns `true` if `position` is inside the outer boundary and not
    /// inside the target.
    pub fn contains(&self, position: &[f64]) -> bool {
        let inside = match self.shape {
            DomainShape::Sphere => radius(position) <= self.system_size,
            DomainShape::Cube => position.iter().all(|x| x.abs() <= self.system_size),
        };
        inside && self.distance_to_target(position) >= self.target_size
    }
}

/// Euclidean distance of `position` from the origin.
#[inline]
pub fn radius(position: &[f64]) -> f64 {
    position.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(boundary: BoundaryCondition, center: Option<Vec<f64>>) -> Result<Domain, ConfigError> {
        Domain::with_layout(5.0, 1.0, 2, DomainShape::Cube, boundary, center)
    }

    #[test]
    fn test_valid_domain() {
        let domain = Domain::new(10.0, 1.0, 2).unwrap();
        assert_eq!(domain.system_size(), 10.0);
        assert_eq!(domain.target_size(), 1.0);
        assert_eq!(domain.dimension(), 2);
        assert_eq!(domain.shape(), DomainShape::Sphere);
        assert_eq!(domain.boundary(), BoundaryCondition::Reflecting);
        assert_eq!(domain.target_center(), &[0.0, 0.0]);
    }

    #[test]
    fn test_target_must_fit_inside() {
        assert!(matches!(
            Domain::new(1.0, 1.0, 3),
            Err(ConfigError::TargetNotInsideSystem { .. })
        ));
        assert!(matches!(
            Domain::new(1.0, 2.0, 3),
            Err(ConfigError::TargetNotInsideSystem { .. })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Domain::new(10.0, 1.0, 0),
            Err(ConfigError::InvalidDimension(0))
        );
    }

    #[test]
    fn test_non_positive_radii_rejected() {
        assert!(Domain::new(-1.0, 0.5, 2).is_err());
        assert!(Domain::new(10.0, 0.0, 2).is_err());
        assert!(Domain::new(f64::NAN, 1.0, 2).is_err());
        assert!(Domain::new(f64::INFINITY, 1.0, 2).is_err());
    }

    #[test]
    fn test_radius_and_region() {
        let domain = Domain::new(10.0, 1.0, 2).unwrap();
        assert_eq!(radius(&[3.0, 4.0]), 5.0);
        assert!(domain.contains(&[5.0, 0.0]));
        assert!(domain.contains(&[0.0, -1.0]));
        assert!(!domain.contains(&[0.5, 0.0]));
        assert!(!domain.contains(&[10.5, 0.0]));
    }

    #[test]
    fn test_periodic_sphere_rejected() {
        let result = Domain::with_layout(
            5.0,
            1.0,
            2,
            DomainShape::Sphere,
            BoundaryCondition::Periodic,
            None,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "boundary", .. })
        ));
    }

    #[test]
    fn test_off_centre_target_must_stay_inside() {
        assert!(cube(BoundaryCondition::Reflecting, Some(vec![3.9, -3.9])).is_ok());
        assert!(cube(BoundaryCondition::Reflecting, Some(vec![4.0, 0.0])).is_err());
        assert!(cube(BoundaryCondition::Periodic, Some(vec![0.0, f64::NAN])).is_err());
        assert!(cube(BoundaryCondition::Periodic, Some(vec![1.0])).is_err());

        // fits the cube's corner but not the inscribed sphere
        let corner = Some(vec![3.5, 3.5]);
        assert!(cube(BoundaryCondition::Reflecting, corner.clone()).is_ok());
        assert!(Domain::with_layout(
            5.0,
            1.0,
            2,
            DomainShape::Sphere,
            BoundaryCondition::Reflecting,
            corner,
        )
        .is_err());
    }

    #[test]
    fn test_contains() {
        let domain = cube(BoundaryCondition::Reflecting, Some(vec![2.0, 2.0])).unwrap();
        assert_eq!(domain.distance_to_target(&[2.0, 5.0]), 3.0);
        assert!(domain.contains(&[0.0, 0.0]));
        assert!(domain.contains(&[-5.0, 5.0]));
        assert!(!domain.contains(&[2.5, 2.0]));
        assert!(!domain.contains(&[5.1, 0.0]));

        let sphere = Domain::new(5.0, 1.0, 2).unwrap();
        assert!(!sphere.contains(&[4.0, 4.0]));
        assert!(!sphere.contains(&[0.5, 0.0]));
        assert!(sphere.contains(&[3.0, 4.0]));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(DomainShape::from_str("Cube").unwrap(), DomainShape::Cube);
        assert_eq!(DomainShape::from_str("sphere").unwrap(), DomainShape::Sphere);
        assert!(DomainShape::from_str("torus").is_err());
        assert_eq!(
            BoundaryCondition::from_str("PERIODIC").unwrap(),
            BoundaryCondition::Periodic
        );
        assert_eq!(
            BoundaryCondition::from_str("reflect").unwrap(),
            BoundaryCondition::Reflecting
        );
        assert!(BoundaryCondition::from_str("absorbing").is_err());
        assert_eq!(DomainShape::Cube.to_string(), "cube");
        assert_eq!(BoundaryCondition::Periodic.to_string(), "periodic");
    }
}
