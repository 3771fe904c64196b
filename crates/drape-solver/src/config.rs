//! Simulation and cloth configuration.
//!
//! Parameters that control the fixed-step loop (timestep, projection
//! passes, gravity) and the material of a cloth body.

use serde::{Deserialize, Serialize};

use drape_types::constants::{DEFAULT_BODY_MASS, DEFAULT_DT, DEFAULT_ITERATIONS, GRAVITY};
use drape_types::{DrapeError, DrapeResult};

/// How constraints are projected each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Every constraint in registration order on the calling thread.
    Direct,
    /// Color classes through the sequential dispatcher.
    #[default]
    ColoredSequential,
    /// Color classes through the rayon dispatcher.
    ColoredParallel,
}

/// Configuration for the simulation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed timestep (seconds).
    pub time_step: f32,

    /// Constraint projection passes per tick. No convergence check.
    pub iterations: u32,

    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [f32; 3],

    /// Velocity damping factor applied after velocity correction
    /// (0.0 = none, 1.0 = full stop).
    pub damping: f32,

    /// Constraint projection backend.
    pub projection: ProjectionMode,

    /// Whether ticks are skipped until the simulation is unpaused.
    pub start_paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_DT,
            iterations: DEFAULT_ITERATIONS,
            gravity: [0.0, -GRAVITY, 0.0],
            damping: 0.0,
            projection: ProjectionMode::default(),
            start_paused: false,
        }
    }
}

impl SimulationConfig {
    /// Creates a config for debugging (few passes, direct projection).
    pub fn debug() -> Self {
        Self {
            iterations: 2,
            projection: ProjectionMode::Direct,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (smaller step, more passes, parallel).
    pub fn high_quality() -> Self {
        Self {
            time_step: DEFAULT_DT / 2.0,
            iterations: 30,
            projection: ProjectionMode::ColoredParallel,
            ..Default::default()
        }
    }

    /// Rejects values the loop cannot run with.
    pub fn validate(&self) -> DrapeResult<()> {
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(DrapeError::InvalidConfig(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if self.iterations == 0 {
            return Err(DrapeError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(DrapeError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(DrapeError::InvalidConfig(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// Material parameters of a cloth body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    /// Total body mass (kg), spread evenly over the particles.
    pub mass: f32,
    /// Stored on every stretch constraint; see [`StretchConstraint`](crate::stretch::StretchConstraint).
    pub stretch_stiffness: f32,
    /// Fraction of the bend correction applied per pass.
    pub bend_stiffness: f32,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            mass: DEFAULT_BODY_MASS,
            stretch_stiffness: 1.0,
            bend_stiffness: 1.0,
        }
    }
}

impl ClothParams {
    pub fn validate(&self) -> DrapeResult<()> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(DrapeError::InvalidConfig(format!(
                "cloth mass must be positive and finite, got {}",
                self.mass
            )));
        }
        for (name, k) in [
            ("stretch_stiffness", self.stretch_stiffness),
            ("bend_stiffness", self.bend_stiffness),
        ] {
            if !(0.0..=1.0).contains(&k) {
                return Err(DrapeError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {k}"
                )));
            }
        }
        Ok(())
    }
}
