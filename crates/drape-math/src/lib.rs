//! # drape-math
//!
//! Math primitives for the drape cloth solver.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Vec4`, `Mat4`)
//! - Triangle geometry helpers (areas, interior-angle cotangents)
//! - Accessors for dense DOF vectors (`[x0, y0, z0, x1, ...]`)
//! - The distance projection kernel shared by the solver and dispatchers

pub mod dof;
pub mod geometry;
pub mod projection;

// Re-export glam types as the canonical math types for drape.
pub use glam::{Mat4, Vec3, Vec4};
