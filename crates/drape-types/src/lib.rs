//! # drape-types
//!
//! Shared identifiers, error types, and physical constants
//! for the drape cloth solver.
//!
//! This crate has no simulation logic. It defines the vocabulary
//! that all other drape crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{DrapeError, DrapeResult};
pub use ids::{ColorId, ParticleId};
