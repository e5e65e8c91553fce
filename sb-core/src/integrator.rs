//! Numerical integrators for advancing the simulation in time.
//!
//! Both entry points implement the classical fourth-order Runge-Kutta
//! method with a fixed step:
//!
//! - [`Rk4::solve_scalar_vector`]: generic first-order system over a slice of
//!   numbers, driven by a caller-supplied increment function.
//! - [`Rk4::solve_motion`]: the coupled position/velocity system of a body,
//!   driven by an [`AccelerationField`].
//!
//! ## Algorithm (position/velocity form)
//!
//! ```text
//! a1 = a(s, v, 0)
//! s2 = s + v*dt/2      v2 = v + a1*dt/2     a2 = a(s2, v2, dt/2)
//! s3 = s + v2*dt/2     v3 = v + a2*dt/2     a3 = a(s3, v3, dt/2)
//! s4 = s + v3*dt       v4 = v + a3*dt       a4 = a(s4, v4, dt)
//! s' = s + (v + 2*v2 + 2*v3 + v4) * dt/6
//! v' = v + (a1 + 2*a2 + 2*a3 + a4) * dt/6
//! ```
//!
//! Every stage is based on the starting `(s, v)`, never on the previous
//! stage's position.

use crate::error::SimError;
use crate::types::{MotionState, Vec3};

/// Source of accelerations for [`Rk4::solve_motion`].
///
/// Implementations must be free of side effects during a call: the
/// integrator evaluates the field four times per step at hypothetical
/// states that are never committed.
pub trait AccelerationField {
    /// Acceleration at position `s` and velocity `v`, `t` seconds into the step.
    fn acceleration(&self, s: Vec3, v: Vec3, t: f64) -> Vec3;
}

impl<F> AccelerationField for F
where
    F: Fn(Vec3, Vec3, f64) -> Vec3,
{
    fn acceleration(&self, s: Vec3, v: Vec3, t: f64) -> Vec3 {
        self(s, v, t)
    }
}

/// Fixed-step fourth-order Runge-Kutta integrator.
pub struct Rk4;

impl Rk4 {
    /// Advance a generic state vector `q` by one step of size `step`.
    ///
    /// `rhs(q, delta, step, scale)` returns the increment contributed by one
    /// stage, evaluated at `q + scale * delta`. The stages are:
    ///
    /// ```text
    /// k1 = rhs(q, q,  h, 0.0)
    /// k2 = rhs(q, k1, h, 0.5)
    /// k3 = rhs(q, k2, h, 0.5)
    /// k4 = rhs(q, k3, h, 1.0)
    /// ```
    ///
    /// # Errors
    /// [`SimError::PreconditionViolation`] as soon as a stage returns a
    /// vector whose length differs from `q.len()`.
    pub fn solve_scalar_vector<F>(q: &[f64], step: f64, rhs: F) -> Result<Vec<f64>, SimError>
    where
        F: Fn(&[f64], &[f64], f64, f64) -> Vec<f64>,
    {
        let k1 = checked_stage("k1", q.len(), rhs(q, q, step, 0.0))?;
        let k2 = checked_stage("k2", q.len(), rhs(q, &k1, step, 0.5))?;
        let k3 = checked_stage("k3", q.len(), rhs(q, &k2, step, 0.5))?;
        let k4 = checked_stage("k4", q.len(), rhs(q, &k3, step, 1.0))?;

        Ok((0..q.len())
            .map(|i| q[i] + (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0)
            .collect())
    }

    /// Advance a position/velocity pair by `dt` seconds.
    ///
    /// # Arguments
    /// * `position` - Position at the start of the step
    /// * `velocity` - Velocity at the start of the step
    /// * `dt` - Step length in seconds
    /// * `accel` - Acceleration field, evaluated four times
    ///
    /// # Returns
    /// The state after `dt` seconds.
    pub fn solve_motion<A: AccelerationField + ?Sized>(
        position: Vec3,
        velocity: Vec3,
        dt: f64,
        accel: &A,
    ) -> MotionState {
        let half = 0.5 * dt;

        let v1 = velocity;
        let a1 = accel.acceleration(position, v1, 0.0);

        let s2 = position + v1 * half;
        let v2 = velocity + a1 * half;
        let a2 = accel.acceleration(s2, v2, half);

        let s3 = position + v2 * half;
        let v3 = velocity + a2 * half;
        let a3 = accel.acceleration(s3, v3, half);

        let s4 = position + v3 * dt;
        let v4 = velocity + a3 * dt;
        let a4 = accel.acceleration(s4, v4, dt);

        let sixth = dt / 6.0;
        MotionState {
            position: position + (v1 + v2 * 2.0 + v3 * 2.0 + v4) * sixth,
            velocity: velocity + (a1 + a2 * 2.0 + a3 * 2.0 + a4) * sixth,
        }
    }
}

fn checked_stage(stage: &'static str, expected: usize, k: Vec<f64>) -> Result<Vec<f64>, SimError> {
    if k.len() == expected {
        Ok(k)
    } else {
        Err(SimError::PreconditionViolation {
            stage,
            expected,
            got: k.len(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
