//! # drape-solver
//!
//! Position-based dynamics for cloth: particles, stretch and bend
//! constraints, constraint graph coloring and the fixed-step loop.
//!
//! ## Key Types
//!
//! - [`ParticleStore`]: SoA per-particle mass, position, velocity
//! - [`ConstraintSet`]: Stretch ([`StretchConstraint`]) and bend
//!   ([`BendConstraint`]) constraints built from mesh topology
//! - [`GraphColorer`]: Partitions constraints into conflict-free classes
//! - [`SimulatedBody`]: Capability set the loop drives; [`ClothBody`]
//!   implements it
//! - [`Simulation`]: Predict, project, correct velocities, commit
//! - [`SimulationConfig`] / [`ClothParams`]: Serializable configuration

pub mod bending;
pub mod body;
pub mod cloth;
pub mod coloring;
pub mod config;
pub mod constraints;
pub mod particles;
pub mod simulation;
pub mod stretch;

pub use bending::BendConstraint;
pub use body::SimulatedBody;
pub use cloth::ClothBody;
pub use coloring::{ColorClass, Coloring, GraphColorer};
pub use config::{ClothParams, ProjectionMode, SimulationConfig};
pub use constraints::ConstraintSet;
pub use particles::ParticleStore;
pub use simulation::{Simulation, SimulationPhase, StepResult};
pub use stretch::StretchConstraint;
