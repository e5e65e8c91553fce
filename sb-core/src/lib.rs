//! # SB Core
//!
//! Trajectory core for a spinning ball in flight.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, motion state, projectile parameters)
//! - `integrator`: Numerical integration (fixed-step RK4)
//! - `forces`: Physical forces (gravity, drag, Magnus effect)
//! - `trajectory`: Per-tick flight state machine driven by the presentation layer
//! - `config`: YAML-loadable simulation settings
//! - `presets`: YAML ball/launch presets and random launches
//! - `error`: Error types

pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod presets;
pub mod trajectory;
pub mod types;

pub use config::{IntegrationMode, SimulationConfig};
pub use error::{LoadError, SimError};
pub use forces::SpinningBallForces;
pub use integrator::{AccelerationField, Rk4};
pub use trajectory::{Snapshot, TrajectoryModel};
pub use types::{FlightStatus, MotionState, ProjectileParameters, Vec3};
