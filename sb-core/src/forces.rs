//! Physical forces acting on the ball.
//!
//! [`SpinningBallForces`] implements [`AccelerationField`] for a spinning ball
//! in a moving air mass:
//!
//! - **Gravity**: constant acceleration along Y
//! - **Drag**: opposes motion relative to the wind, proportional to v²
//! - **Magnus**: lift from spin, perpendicular to velocity and spin axis
//!
//! ## Drag
//!
//! ```text
//! v_rel = v - v_wind
//! F_drag = -0.5 * ρ * |v_rel|² * A * Cd * v_rel / |v_rel|
//! ```
//!
//! ## Magnus
//!
//! The lift coefficient scales with the spin parameter `r·ω / |v|`:
//!
//! ```text
//! C_L = r * ω / |v|
//! |F_magnus| = 0.5 * ρ * A * C_L * |v|²
//! F_magnus = |F_magnus| / |v| * (v.y*k.z - k.y*v.z,
//!                                v.x*k.z - k.x*v.z,
//!                                v.x*k.y - k.x*v.y)
//! ```
//!
//! `k` is the unit spin axis. The component order of the direction term is
//! not the right-handed `v × k`: its Y component has the opposite sign.
//! Trajectories depend on this ordering, so it is kept as is.
//!
//! Both speeds get [`constants::SPEED_EPSILON`] added before they are used
//! as denominators, so a ball at rest (or at rest relative to the wind) sees
//! finite forces.

use crate::integrator::AccelerationField;
use crate::types::{constants, ProjectileParameters, Vec3};

/// Acceleration field of one flight.
///
/// Built once at fire time; every derived quantity the field needs is cached
/// here so evaluating it is a pure function of `(position, velocity)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinningBallForces {
    mass: f64,
    radius: f64,
    density: f64,
    drag_coefficient: f64,
    wind_velocity: Vec3,

    /// Cross-sectional area π·r² (m²)
    area: f64,

    /// |spin| in rad/s
    spin_rate: f64,

    /// Unit spin axis, `None` for a ball without spin
    spin_axis: Option<Vec3>,

    /// Gravity along Y (m/s²)
    gravity: f64,
}

impl SpinningBallForces {
    /// Cache the derived quantities of `params` with the default gravity.
    pub fn new(params: &ProjectileParameters) -> Self {
        Self::with_gravity(params, constants::GRAVITY)
    }

    /// Cache the derived quantities of `params` with a custom gravity along Y.
    pub fn with_gravity(params: &ProjectileParameters, gravity: f64) -> Self {
        let spin_rate = params.spin_rate();
        let spin_axis = if spin_rate < constants::EPSILON {
            None
        } else {
            Some(params.spin_vector.normalized())
        };

        Self {
            mass: params.mass,
            radius: params.radius,
            density: params.density,
            drag_coefficient: params.drag_coefficient,
            wind_velocity: params.wind_velocity,
            area: params.cross_sectional_area(),
            spin_rate,
            spin_axis,
            gravity,
        }
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn spin_rate(&self) -> f64 {
        self.spin_rate
    }

    pub fn spin_axis(&self) -> Option<Vec3> {
        self.spin_axis
    }

    /// Aerodynamic drag force (N) at velocity `v`.
    pub fn drag_force(&self, v: Vec3) -> Vec3 {
        let relative = v - self.wind_velocity;
        let relative_mag = relative.magnitude() + constants::SPEED_EPSILON;

        let drag_mag =
            -0.5 * self.density * relative_mag * relative_mag * self.area * self.drag_coefficient;

        Vec3::new(
            drag_mag * relative.x / relative_mag,
            drag_mag * relative.y / relative_mag,
            drag_mag * relative.z / relative_mag,
        )
    }

    /// Magnus force (N) at velocity `v`. Zero for a ball without spin.
    pub fn magnus_force(&self, v: Vec3) -> Vec3 {
        let Some(axis) = self.spin_axis else {
            return Vec3::ZERO;
        };

        let speed = v.magnitude() + constants::SPEED_EPSILON;
        let lift_coefficient = self.radius * self.spin_rate / speed;
        let magnus_mag = 0.5 * self.density * self.area * lift_coefficient * speed * speed;

        Vec3::new(
            (v.y * axis.z - axis.y * v.z) * magnus_mag / speed,
            (v.x * axis.z - axis.x * v.z) * magnus_mag / speed,
            (v.x * axis.y - axis.x * v.y) * magnus_mag / speed,
        )
    }
}

impl AccelerationField for SpinningBallForces {
    fn acceleration(&self, _s: Vec3, v: Vec3, _t: f64) -> Vec3 {
        let fd = self.drag_force(v);
        let fm = self.magnus_force(v);

        Vec3::new(
            (fd.x + fm.x) / self.mass,
            (fd.y + fm.y) / self.mass + self.gravity,
            (fd.z + fm.z) / self.mass,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn basketball() -> ProjectileParameters {
        ProjectileParameters::new(
            0.625,
            0.1143,
            constants::AIR_DENSITY,
            constants::SPHERE_DRAG_COEFFICIENT,
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_gravity_only_in_vacuum() {
        let mut params = basketball().with_spin(Vec3::new(0.0, 50.0, 0.0));
        params.density = 0.0;
        let forces = SpinningBallForces::new(&params);

        let acc = forces.acceleration(Vec3::ZERO, Vec3::new(10.0, 3.0, -2.0), 0.0);

        assert!(acc.x.abs() < constants::EPSILON);
        assert!((acc.y - constants::GRAVITY).abs() < constants::EPSILON);
        assert!(acc.z.abs() < constants::EPSILON);
    }

    #[test]
    fn test_custom_gravity() {
        let mut params = basketball();
        params.density = 0.0;
        let forces = SpinningBallForces::with_gravity(&params, 0.0);

        assert_eq!(
            forces.acceleration(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), 0.0),
            Vec3::ZERO
        );
    }

    #[test_case(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO ; "still air")]
    #[test_case(Vec3::new(10.0, 5.0, -3.0), Vec3::new(2.0, 0.0, 1.0) ; "with wind")]
    #[test_case(Vec3::new(0.0, 0.0, 0.0), Vec3::new(-4.0, 0.0, 7.0) ; "ball at rest in wind")]
    fn test_drag_antiparallel_to_relative_velocity(v: Vec3, wind: Vec3) {
        let forces = SpinningBallForces::new(&basketball().with_wind(wind));
        let drag = forces.drag_force(v);
        let relative = v - wind;

        let cross = drag.cross(&relative).magnitude();
        assert!(
            cross < 1e-9 * drag.magnitude() * relative.magnitude(),
            "drag should be parallel to v_rel, |drag × v_rel| = {}",
            cross
        );
        assert!(drag.dot(&relative) < 0.0, "drag should oppose v_rel");
    }

    #[test]
    fn test_drag_magnitude() {
        let forces = SpinningBallForces::new(&basketball());
        let drag = forces.drag_force(Vec3::new(0.0, -20.0, 0.0));

        let expected =
            0.5 * constants::AIR_DENSITY * 400.0 * forces.area() * constants::SPHERE_DRAG_COEFFICIENT;
        assert!((drag.y - expected).abs() < 1e-6, "got {}, expected {}", drag.y, expected);
    }

    #[test]
    fn test_drag_vanishes_without_relative_motion() {
        let wind = Vec3::new(3.0, 0.0, -1.0);
        let forces = SpinningBallForces::new(&basketball().with_wind(wind));

        let drag = forces.drag_force(wind);
        assert!(drag.magnitude() < 1e-12);
        assert!(drag.is_finite());
    }

    #[test_case(Vec3::new(10.0, 0.0, 0.0) ; "forward")]
    #[test_case(Vec3::new(-3.0, 7.0, 2.0) ; "oblique")]
    #[test_case(Vec3::ZERO ; "at rest")]
    fn test_no_magnus_without_spin(v: Vec3) {
        let forces = SpinningBallForces::new(&basketball());
        assert_eq!(forces.spin_axis(), None);
        assert_eq!(forces.magnus_force(v), Vec3::ZERO);
    }

    #[test]
    fn test_spin_axis_is_unit_and_rate_cached() {
        let forces = SpinningBallForces::new(&basketball().with_spin(Vec3::new(0.0, 30.0, 40.0)));
        let axis = forces.spin_axis().unwrap();
        assert!((axis.magnitude() - 1.0).abs() < 1e-12);
        assert!((forces.spin_rate() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_magnus_component_order() {
        // Spin about +Z, moving along +X: x' = 0, y' = v.x*k.z = +v.x, z' = 0
        let forces = SpinningBallForces::new(&basketball().with_spin(Vec3::new(0.0, 0.0, 20.0)));
        let v = Vec3::new(10.0, 0.0, 0.0);
        let fm = forces.magnus_force(v);

        let speed = 10.0 + constants::SPEED_EPSILON;
        let cl = 0.1143 * 20.0 / speed;
        let expected = 0.5 * constants::AIR_DENSITY * forces.area() * cl * speed * speed / speed * 10.0;

        assert!(fm.x.abs() < 1e-12);
        assert!((fm.y - expected).abs() < 1e-9, "got {}, expected {}", fm.y, expected);
        assert!(fm.z.abs() < 1e-12);
        // A right-handed v × k would point down here
        assert!(v.cross(&Vec3::new(0.0, 0.0, 1.0)).y < 0.0);
    }

    #[test]
    fn test_magnus_all_components_general_direction() {
        // k = s / ω with s = (5, -20, 3), so the direction term is
        // (v.y*s.z - s.y*v.z, v.x*s.z - s.x*v.z, v.x*s.y - s.x*v.y) / ω = (7, 17, -125) / ω
        // and |F| / |v| = 0.5 * ρ * A * r * ω, leaving F = 0.5 * ρ * A * r * (7, 17, -125).
        let forces = SpinningBallForces::new(&basketball().with_spin(Vec3::new(5.0, -20.0, 3.0)));
        let v = Vec3::new(4.0, 9.0, -1.0);
        let fm = forces.magnus_force(v);

        let scale = 0.5 * constants::AIR_DENSITY * forces.area() * 0.1143;
        let expected = Vec3::new(7.0, 17.0, -125.0) * scale;
        for (got, want) in [(fm.x, expected.x), (fm.y, expected.y), (fm.z, expected.z)] {
            assert!(
                (got - want).abs() < 1e-9 * want.abs(),
                "got {:?}, expected {:?}",
                fm,
                expected
            );
        }

        // Only Y disagrees with the right-handed v × s = (7, -17, -125)
        assert_eq!(v.cross(&Vec3::new(5.0, -20.0, 3.0)), Vec3::new(7.0, -17.0, -125.0));
    }

    #[test]
    fn test_magnus_perpendicular_to_spin_axis_when_velocity_in_plane() {
        // Spin about +Y, velocity in the XZ plane: force stays in the XZ plane
        let forces = SpinningBallForces::new(&basketball().with_spin(Vec3::new(0.0, 10.0, 0.0)));
        let fm = forces.magnus_force(Vec3::new(5.0, 0.0, 5.0));

        assert!(fm.y.abs() < 1e-12);
        assert!(fm.magnitude() > 0.0);
    }

    #[test]
    fn test_acceleration_combines_forces() {
        let params = basketball()
            .with_wind(Vec3::new(1.0, 0.0, 2.0))
            .with_spin(Vec3::new(5.0, -20.0, 3.0));
        let forces = SpinningBallForces::new(&params);
        let v = Vec3::new(4.0, 9.0, -1.0);

        let acc = forces.acceleration(Vec3::ZERO, v, 0.25);
        let expected = (forces.drag_force(v) + forces.magnus_force(v)) / params.mass
            + Vec3::new(0.0, constants::GRAVITY, 0.0);

        assert!((acc - expected).magnitude() < 1e-12);
    }

    #[test]
    fn test_acceleration_ignores_position_and_time() {
        let forces = SpinningBallForces::new(&basketball().with_spin(Vec3::new(1.0, 2.0, 3.0)));
        let v = Vec3::new(2.0, 2.0, 2.0);

        assert_eq!(
            forces.acceleration(Vec3::ZERO, v, 0.0),
            forces.acceleration(Vec3::new(50.0, 3.0, -8.0), v, 4.0)
        );
    }
}
