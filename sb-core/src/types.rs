//! Core types for the trajectory simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Spin: radians per second (rad/s)
//! - Mass: kilograms (kg)
//! - Density: kilograms per cubic meter (kg/m³)

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::SimError;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities, forces, and spin.
///
/// Coordinate system:
/// - X: horizontal
/// - Y: vertical (positive upward, ground plane at y = 0)
/// - Z: horizontal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Motion State
// =============================================================================

/// Kinematic state of the ball at a given instant.
///
/// Replaced as a whole every tick; nothing updates a single field of a live
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl MotionState {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Ball at rest at a given position
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// Resting position of a ball of the given radius: touching the ground at the origin.
    pub fn rest_position(radius: f64) -> Vec3 {
        Vec3::new(0.0, radius, 0.0)
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

// =============================================================================
// Projectile Parameters
// =============================================================================

/// Everything needed to fire one ball.
///
/// Immutable for the lifetime of a flight. Values are checked by
/// [`ProjectileParameters::validate`] before a flight starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParameters {
    pub mass: f64,
    pub radius: f64,
    pub density: f64,
    pub drag_coefficient: f64,
    pub initial_velocity: Vec3,
    #[serde(default)]
    pub wind_velocity: Vec3,
    #[serde(default)]
    pub spin_vector: Vec3,
}

impl ProjectileParameters {
    /// Parameters for a ball with no wind and no spin.
    pub fn new(
        mass: f64,
        radius: f64,
        density: f64,
        drag_coefficient: f64,
        initial_velocity: Vec3,
    ) -> Self {
        Self {
            mass,
            radius,
            density,
            drag_coefficient,
            initial_velocity,
            wind_velocity: Vec3::ZERO,
            spin_vector: Vec3::ZERO,
        }
    }

    pub fn with_wind(mut self, wind_velocity: Vec3) -> Self {
        self.wind_velocity = wind_velocity;
        self
    }

    pub fn with_spin(mut self, spin_vector: Vec3) -> Self {
        self.spin_vector = spin_vector;
        self
    }

    /// Cross-sectional area π·r²
    pub fn cross_sectional_area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Angular speed |spin| in rad/s
    pub fn spin_rate(&self) -> f64 {
        self.spin_vector.magnitude()
    }

    /// Reject values that would turn into NaN or infinity in the force model.
    pub fn validate(&self) -> Result<(), SimError> {
        positive("mass", self.mass)?;
        positive("radius", self.radius)?;
        non_negative("density", self.density)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        finite_vec("initial_velocity", &self.initial_velocity)?;
        finite_vec("wind_velocity", &self.wind_velocity)?;
        finite_vec("spin_vector", &self.spin_vector)?;
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            requirement: "a finite value greater than zero",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            requirement: "a finite value of at least zero",
        })
    }
}

fn finite_vec(name: &'static str, v: &Vec3) -> Result<(), SimError> {
    for value in [v.x, v.y, v.z] {
        if !value.is_finite() {
            return Err(SimError::InvalidParameter {
                name,
                value,
                requirement: "finite components",
            });
        }
    }
    Ok(())
}

// =============================================================================
// Flight Status
// =============================================================================

/// Where the ball is in its Idle → Firing → Grounded → Idle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    /// Resting at the origin, waiting to be fired.
    Idle,
    /// In flight; every tick advances the trajectory.
    Firing,
    /// Landed; waits out the grace period before returning to rest.
    Grounded,
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    /// Gravitational acceleration along Y (m/s²)
    pub const GRAVITY: f64 = -9.81;

    /// Air density at sea level, 20°C (kg/m³)
    pub const AIR_DENSITY: f64 = 1.204;

    /// Drag coefficient of a smooth sphere
    pub const SPHERE_DRAG_COEFFICIENT: f64 = 0.47;

    /// Floor added to speeds before they are used as denominators
    pub const SPEED_EPSILON: f64 = 1.0e-8;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;

    /// Seconds a landed ball stays put before returning to rest
    pub const GROUNDED_GRACE_PERIOD: f64 = 1.0;

    /// Radius of the ball shown at rest before anything is fired (basketball)
    pub const DEFAULT_REST_RADIUS: f64 = 0.1143;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn basketball() -> ProjectileParameters {
        ProjectileParameters::new(0.625, 0.1143, 1.204, 0.47, Vec3::new(1.0, 8.0, 3.0))
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(&b), 32.0); // 1*4 + 2*5 + 3*6 = 32
    }

    #[test]
    fn test_vec3_operators_produce_new_values() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        let scaled = (sum - a) / 2.0;

        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(scaled, Vec3::new(2.0, 2.5, 3.0));
    }

    #[test]
    fn test_vec3_cross_product() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert!((z.x).abs() < 1e-10);
        assert!((z.y).abs() < 1e-10);
        assert!((z.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_vec3_normalized() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);
        assert!((n.y - 0.8).abs() < 1e-10);
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_derived_quantities() {
        let params = basketball().with_spin(Vec3::new(0.0, 3.0, 4.0));
        let expected_area = std::f64::consts::PI * 0.1143 * 0.1143;
        assert!((params.cross_sectional_area() - expected_area).abs() < 1e-15);
        assert!((params.spin_rate() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_accepts_zero_density_and_drag() {
        let mut params = basketball();
        params.density = 0.0;
        params.drag_coefficient = 0.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scalars() {
        let mut params = basketball();
        params.mass = 0.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { name: "mass", .. })
        ));

        let mut params = basketball();
        params.radius = -0.1;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { name: "radius", .. })
        ));

        let mut params = basketball();
        params.density = -1.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { name: "density", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_vectors() {
        let params = basketball().with_wind(Vec3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter {
                name: "wind_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_parameters_from_yaml_default_wind_and_spin() {
        let yaml = "
mass: 0.28
radius: 0.103505
density: 1.204
drag_coefficient: 0.47
initial_velocity: { x: 1.0, y: 2.0, z: 3.0 }
";
        let params: ProjectileParameters = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.wind_velocity, Vec3::ZERO);
        assert_eq!(params.spin_vector, Vec3::ZERO);
        assert_eq!(params.initial_velocity, Vec3::new(1.0, 2.0, 3.0));
    }
}
