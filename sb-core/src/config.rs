//! Simulation settings that outlive a single flight.
//!
//! Settings can be built in code or read from YAML; every field is optional
//! in the file and falls back to [`SimulationConfig::default`]:
//!
//! ```yaml
//! gravity: -9.81
//! grace_period: 1.0
//! integration: from_launch   # or: incremental
//! rest_radius: 0.1143
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, SimError};
use crate::types::{constants, positive};

/// How [`TrajectoryModel::advance`](crate::trajectory::TrajectoryModel::advance)
/// drives the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Every tick integrates from the launch state over the whole elapsed
    /// flight time as a single RK4 step.
    #[default]
    FromLaunch,
    /// Every tick integrates from the previous state over the tick delta.
    Incremental,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravitational acceleration along Y (m/s²)
    pub gravity: f64,

    /// Seconds a landed ball waits before returning to rest
    pub grace_period: f64,

    pub integration: IntegrationMode,

    /// Radius of the resting ball before the first flight
    pub rest_radius: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: constants::GRAVITY,
            grace_period: constants::GROUNDED_GRACE_PERIOD,
            integration: IntegrationMode::FromLaunch,
            rest_radius: constants::DEFAULT_REST_RADIUS,
        }
    }
}

impl SimulationConfig {
    /// Parse settings from a YAML document and validate them.
    pub fn from_yaml_str(contents: &str) -> Result<Self, LoadError> {
        let config: SimulationConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings from a YAML file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "gravity",
                value: self.gravity,
                requirement: "a finite value",
            });
        }
        if !(self.grace_period.is_finite() && self.grace_period >= 0.0) {
            return Err(SimError::InvalidParameter {
                name: "grace_period",
                value: self.grace_period,
                requirement: "a finite value of at least zero",
            });
        }
        positive("rest_radius", self.rest_radius)
    }
}

// =============================================================================
// Tests
// =============================================================================
