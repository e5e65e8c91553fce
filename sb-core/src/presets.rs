//! Ball and launch presets.
//!
//! Presets are YAML files, so new balls and launches can be added without
//! recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── balls/
//! │   ├── basketball.yaml
//! │   ├── football.yaml
//! │   └── volleyball.yaml
//! └── launches/
//!     ├── backspin_lob.yaml
//!     └── ...
//! ```
//!
//! A ball file holds `name`, `mass` and `radius`. A launch file holds a
//! `name` plus every field of [`ProjectileParameters`].

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::types::{ProjectileParameters, Vec3};

/// A named ball: just the mass and size, no launch conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallPreset {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
}

impl BallPreset {
    pub fn basketball() -> Self {
        Self {
            name: "Basketball".to_string(),
            mass: 0.625,
            radius: 0.1143,
        }
    }

    pub fn volleyball() -> Self {
        Self {
            name: "Volleyball".to_string(),
            mass: 0.28,
            radius: 0.103505,
        }
    }

    pub fn football() -> Self {
        Self {
            name: "Football".to_string(),
            mass: 0.43,
            radius: 0.11,
        }
    }

    /// Balls available without a presets directory.
    pub fn builtin() -> [BallPreset; 3] {
        [Self::basketball(), Self::volleyball(), Self::football()]
    }

    /// Launch parameters for this ball in still air, without spin.
    pub fn launch(&self, density: f64, drag_coefficient: f64, initial_velocity: Vec3) -> ProjectileParameters {
        ProjectileParameters::new(
            self.mass,
            self.radius,
            density,
            drag_coefficient,
            initial_velocity,
        )
    }
}

/// A named, complete set of fire parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPreset {
    pub name: String,
    #[serde(flatten)]
    pub parameters: ProjectileParameters,
}

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain `balls/` and `launches/` subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a ball by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("presets");
    /// let ball = loader.load_ball("volleyball")?;
    /// ```
    pub fn load_ball(&self, name: &str) -> Result<BallPreset, LoadError> {
        let ball: BallPreset = self.load("balls", name)?;
        ball.launch(0.0, 0.0, Vec3::ZERO).validate()?;
        Ok(ball)
    }

    /// Load a launch by name. The parameters are validated before returning.
    pub fn load_launch(&self, name: &str) -> Result<LaunchPreset, LoadError> {
        let launch: LaunchPreset = self.load("launches", name)?;
        launch.parameters.validate()?;
        Ok(launch)
    }

    /// List all available balls.
    pub fn list_balls(&self) -> Result<Vec<String>, LoadError> {
        self.list("balls")
    }

    /// List all available launches.
    pub fn list_launches(&self) -> Result<Vec<String>, LoadError> {
        self.list("launches")
    }

    fn load<T: serde::de::DeserializeOwned>(&self, subdir: &str, name: &str) -> Result<T, LoadError> {
        let path = self.base_path.join(subdir).join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(LoadError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn list(&self, subdir: &str) -> Result<Vec<String>, LoadError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Random launches
// =============================================================================

/// Pick a built-in ball and random launch conditions.
///
/// Every component is drawn uniformly and rounded down to two decimals:
///
/// | quantity         | x          | y           | z          |
/// |------------------|------------|-------------|------------|
/// | initial velocity | [-10, 10)  | [5, 12)     | [0, 15)    |
/// | wind velocity    | [-10, 10)  | [-5, 5)     | [-10, 10)  |
/// | spin vector      | [-20, 20)  | [-100, 100) | [-20, 20)  |
///
/// Density and drag coefficient are the caller's.
pub fn random_launch<R: Rng + ?Sized>(
    rng: &mut R,
    density: f64,
    drag_coefficient: f64,
) -> LaunchPreset {
    let balls = BallPreset::builtin();
    let ball = &balls[rng.random_range(0..balls.len())];

    let initial_velocity = Vec3::new(
        two_decimals(rng, -10.0, 10.0),
        two_decimals(rng, 5.0, 12.0),
        two_decimals(rng, 0.0, 15.0),
    );
    let wind_velocity = Vec3::new(
        two_decimals(rng, -10.0, 10.0),
        two_decimals(rng, -5.0, 5.0),
        two_decimals(rng, -10.0, 10.0),
    );
    let spin_vector = Vec3::new(
        two_decimals(rng, -20.0, 20.0),
        two_decimals(rng, -100.0, 100.0),
        two_decimals(rng, -20.0, 20.0),
    );

    LaunchPreset {
        name: format!("Random {}", ball.name.to_lowercase()),
        parameters: ball
            .launch(density, drag_coefficient, initial_velocity)
            .with_wind(wind_velocity)
            .with_spin(spin_vector),
    }
}

fn two_decimals<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    ((min + rng.random::<f64>() * (max - min)) * 100.0).floor() / 100.0
}

// =============================================================================
// Tests
// =============================================================================
