//! Error types for the trajectory core.

use thiserror::Error;

/// Errors raised by the integrator and the trajectory model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A physical parameter is outside the range the force model can handle
    #[error("invalid parameter `{name}` = {value}: expected {requirement}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Human-readable constraint
        requirement: &'static str,
    },

    /// A derivative function returned a state vector of the wrong length
    #[error("precondition violated at {stage}: expected {expected} components, got {got}")]
    PreconditionViolation {
        /// RK4 stage that produced the bad vector (k1..k4)
        stage: &'static str,
        /// Length of the input state
        expected: usize,
        /// Length actually returned
        got: usize,
    },
}

/// Errors raised while reading configuration and preset files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for the expected type
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No preset with that name exists
    #[error("preset not found: {0}")]
    NotFound(String),

    /// The file parsed but describes an unusable simulation
    #[error(transparent)]
    Invalid(#[from] SimError),
}
