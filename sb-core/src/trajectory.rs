//! Flight of a single ball, advanced once per rendered frame.
//!
//! [`TrajectoryModel`] owns the parameters of the current flight and the
//! ball's [`MotionState`]. An external tick source calls
//! [`advance`](TrajectoryModel::advance) every frame; each call makes exactly
//! one [`Rk4::solve_motion`] call.
//!
//! ```text
//!           fire                    y < radius
//!   Idle ─────────▶ Firing ─────────────────────▶ Grounded
//!    ▲               ▲  │ fire                       │ │
//!    │               └──┘                      fire  │ │ grace period
//!    │               ▲                               │ │ (or settle)
//!    │               └───────────────────────────────┘ │
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! In [`IntegrationMode::FromLaunch`] (the default) the integrator is always
//! started from the launch state and asked to cover the whole elapsed
//! flight time in one step. The tick delta only feeds the elapsed time, the
//! visual spin angle and the grace period. Larger elapsed times therefore
//! mean a larger single RK4 step.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::config::{IntegrationMode, SimulationConfig};
use crate::error::SimError;
use crate::forces::SpinningBallForces;
use crate::integrator::Rk4;
use crate::types::{positive, FlightStatus, MotionState, ProjectileParameters, Vec3};

/// Parameters and cached forces of the flight in progress (or the last one).
#[derive(Debug, Clone)]
struct Flight {
    params: ProjectileParameters,
    forces: SpinningBallForces,
    launch: MotionState,
}

/// Read-only view of the model handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: FlightStatus,
    /// Seconds since the last `fire`
    pub elapsed: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub spin_axis: Option<Vec3>,
    /// rad/s
    pub spin_rate: f64,
    /// Accumulated rotation about `spin_axis`, in [0, 2π)
    pub spin_angle: f64,
}

#[derive(Debug, Clone)]
pub struct TrajectoryModel {
    config: SimulationConfig,
    rest_radius: f64,
    status: FlightStatus,
    state: MotionState,
    flight: Option<Flight>,
    elapsed: f64,
    grounded_for: f64,
    spin_angle: f64,
}

impl Default for TrajectoryModel {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self::idle(config)
    }
}

impl TrajectoryModel {
    /// Create an idle model resting at `(0, config.rest_radius, 0)`.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::idle(config))
    }

    fn idle(config: SimulationConfig) -> Self {
        let rest_radius = config.rest_radius;
        Self {
            config,
            rest_radius,
            status: FlightStatus::Idle,
            state: MotionState::at_rest(MotionState::rest_position(rest_radius)),
            flight: None,
            elapsed: 0.0,
            grounded_for: 0.0,
            spin_angle: 0.0,
        }
    }

    /// Launch a ball from `(0, radius, 0)` with the given parameters.
    ///
    /// Works from any state: a flight in progress or a grounded ball is
    /// replaced immediately, with elapsed time back at zero.
    ///
    /// # Errors
    /// [`SimError::InvalidParameter`] if the parameters would produce
    /// non-finite forces; the model is left untouched in that case.
    pub fn fire(&mut self, params: ProjectileParameters) -> Result<(), SimError> {
        params.validate()?;

        let forces = SpinningBallForces::with_gravity(&params, self.config.gravity);
        let launch = MotionState::new(
            MotionState::rest_position(params.radius),
            params.initial_velocity,
        );

        debug!(
            previous = ?self.status,
            mass = params.mass,
            radius = params.radius,
            spin_rate = forces.spin_rate(),
            "firing ball"
        );

        self.rest_radius = params.radius;
        self.state = launch;
        self.elapsed = 0.0;
        self.grounded_for = 0.0;
        self.spin_angle = 0.0;
        self.status = FlightStatus::Firing;
        self.flight = Some(Flight {
            params,
            forces,
            launch,
        });
        Ok(())
    }

    /// Advance the model by one tick of `dt` seconds and return the new state.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn advance(&mut self, dt: f64) -> MotionState {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "ignoring invalid tick delta");
            0.0
        };

        match self.status {
            FlightStatus::Idle => {}
            FlightStatus::Firing => self.step_flight(dt),
            FlightStatus::Grounded => {
                self.grounded_for += dt;
                if self.grounded_for >= self.config.grace_period {
                    self.settle();
                }
            }
        }

        self.state
    }

    fn step_flight(&mut self, dt: f64) {
        let Some(flight) = self.flight.as_ref() else {
            return;
        };

        self.elapsed += dt;
        let next = match self.config.integration {
            IntegrationMode::FromLaunch => Rk4::solve_motion(
                flight.launch.position,
                flight.launch.velocity,
                self.elapsed,
                &flight.forces,
            ),
            IntegrationMode::Incremental => {
                Rk4::solve_motion(self.state.position, self.state.velocity, dt, &flight.forces)
            }
        };
        self.spin_angle = (self.spin_angle + flight.forces.spin_rate() * dt).rem_euclid(TAU);

        let radius = flight.params.radius;
        if next.position.y < radius {
            let landed = Vec3::new(next.position.x, radius, next.position.z);
            info!(
                elapsed = self.elapsed,
                x = landed.x,
                z = landed.z,
                "ball landed"
            );
            self.state = MotionState::new(landed, next.velocity);
            self.status = FlightStatus::Grounded;
            self.grounded_for = 0.0;
        } else {
            trace!(elapsed = self.elapsed, y = next.position.y, "tick");
            self.state = next;
        }
    }

    /// Return a grounded ball to rest without waiting for the grace period.
    ///
    /// Returns `true` if the ball was grounded and has been reset.
    pub fn settle(&mut self) -> bool {
        if self.status != FlightStatus::Grounded {
            return false;
        }
        debug!(rest_radius = self.rest_radius, "returning ball to rest");
        self.status = FlightStatus::Idle;
        self.state = MotionState::at_rest(MotionState::rest_position(self.rest_radius));
        self.grounded_for = 0.0;
        true
    }

    /// Change the radius of the resting ball.
    ///
    /// A ball that is not in flight is moved to the new resting height. A
    /// flight in progress keeps the radius it was fired with.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), SimError> {
        positive("radius", radius)?;
        self.rest_radius = radius;

        if self.status != FlightStatus::Firing {
            let p = self.state.position;
            self.state = MotionState::new(Vec3::new(p.x, radius, p.z), self.state.velocity);
        }
        Ok(())
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn is_firing(&self) -> bool {
        self.status == FlightStatus::Firing
    }

    /// Seconds since the last `fire`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn rest_radius(&self) -> f64 {
        self.rest_radius
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Parameters of the current or most recent flight.
    pub fn parameters(&self) -> Option<&ProjectileParameters> {
        self.flight.as_ref().map(|f| &f.params)
    }

    pub fn spin_axis(&self) -> Option<Vec3> {
        self.flight.as_ref().and_then(|f| f.forces.spin_axis())
    }

    pub fn spin_rate(&self) -> f64 {
        self.flight.as_ref().map_or(0.0, |f| f.forces.spin_rate())
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            elapsed: self.elapsed,
            position: self.state.position,
            velocity: self.state.velocity,
            spin_axis: self.spin_axis(),
            spin_rate: self.spin_rate(),
            spin_angle: self.spin_angle,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
