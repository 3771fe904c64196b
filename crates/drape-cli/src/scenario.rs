//! Simulation scenarios: a generated cloth grid, its pinning and the loop
//! configuration, loadable from TOML.
//!
//! ```toml
//! ticks = 400
//! pin = "top_row"
//!
//! [simulation]
//! time_step = 0.005
//! iterations = 10
//! projection = "colored_parallel"
//!
//! [cloth]
//! cols = 20
//! rows = 20
//! elevation = 1.0
//!
//! [cloth.params]
//! mass = 1.0
//! bend_stiffness = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use drape_mesh::generators::horizontal_quad_grid;
use drape_solver::{ClothBody, ClothParams, SimulationConfig};
use drape_types::{DrapeError, DrapeResult};

/// Which grid vertices are fixed in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    /// Nothing pinned: the sheet free-falls.
    None,
    /// The whole first row.
    #[default]
    TopRow,
    /// The two ends of the first row.
    Corners,
}

/// A horizontal quad-grid cloth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothSpec {
    /// Quads along X.
    pub cols: usize,
    /// Quads along Z.
    pub rows: usize,
    /// Extent along X (meters).
    pub width: f32,
    /// Extent along Z (meters).
    pub depth: f32,
    /// Height of the sheet (meters).
    pub elevation: f32,
    pub params: ClothParams,
}

impl Default for ClothSpec {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            width: 1.0,
            depth: 1.0,
            elevation: 1.0,
            params: ClothParams::default(),
        }
    }
}

/// A fully specified run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub simulation: SimulationConfig,
    pub cloth: ClothSpec,
    pub pin: PinMode,
    /// Number of ticks to run.
    pub ticks: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::hanging_sheet()
    }
}

impl Scenario {
    /// A 1m × 1m sheet at 20×20 resolution pinned along its first row,
    /// hanging for 2 seconds.
    pub fn hanging_sheet() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            cloth: ClothSpec::default(),
            pin: PinMode::TopRow,
            ticks: 400,
        }
    }

    /// Loads a scenario from a TOML file and validates it.
    pub fn load(path: &Path) -> DrapeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let scenario: Scenario =
            toml::from_str(&text).map_err(|e| DrapeError::Serialization(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> DrapeResult<()> {
        self.simulation.validate()?;
        self.cloth.params.validate()?;
        if self.cloth.cols == 0 || self.cloth.rows == 0 {
            return Err(DrapeError::InvalidConfig(
                "cloth grid needs at least one quad in each direction".into(),
            ));
        }
        if !(self.cloth.width > 0.0 && self.cloth.depth > 0.0) {
            return Err(DrapeError::InvalidConfig(format!(
                "cloth extent must be positive, got {} × {}",
                self.cloth.width, self.cloth.depth
            )));
        }
        Ok(())
    }

    /// Per-vertex pin mask for the scenario's grid.
    pub fn pinned(&self) -> Vec<bool> {
        let verts_x = self.cloth.cols + 1;
        let mut pinned = vec![false; verts_x * (self.cloth.rows + 1)];
        match self.pin {
            PinMode::None => {}
            PinMode::TopRow => pinned[..verts_x].iter_mut().for_each(|p| *p = true),
            PinMode::Corners => {
                pinned[0] = true;
                pinned[verts_x - 1] = true;
            }
        }
        pinned
    }

    /// Builds the cloth body described by the scenario.
    pub fn build_cloth(&self) -> DrapeResult<ClothBody> {
        let spec = &self.cloth;
        let mesh = horizontal_quad_grid(spec.cols, spec.rows, spec.width, spec.depth, spec.elevation);
        Ok(ClothBody::new(mesh, spec.params.clone(), self.pinned())?.with_name("sheet"))
    }
}
