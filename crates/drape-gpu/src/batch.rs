//! Flattened color-class batches.
//!
//! A batch is the dispatch-ready form of one color class of stretch
//! constraints:
//! - `indices: [a0, b0, a1, b1, ...]`: global particle indices (DOF offset / 3)
//! - `data: [rest0, wa0, wb0, rest1, ...]`: rest length and inverse masses
//!
//! Both arrays are plain scalars so a device backend can upload them as-is.

use std::collections::HashSet;

use drape_math::dof::read_vec3;
use drape_math::projection::distance_correction;
use drape_math::Vec3;
use drape_types::{ColorId, DrapeError, DrapeResult};

/// Floats stored per constraint in [`ColorBatch::data`].
pub const FLOATS_PER_CONSTRAINT: usize = 3;

/// One color class of distance constraints, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBatch {
    /// Color class this batch was built from.
    pub color: ColorId,
    /// Particle index pairs, two per constraint.
    pub indices: Vec<u32>,
    /// `[rest, wa, wb]` per constraint.
    pub data: Vec<f32>,
}

impl ColorBatch {
    /// Creates an empty batch for `color`.
    pub fn new(color: ColorId) -> Self {
        Self {
            color,
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Creates an empty batch with room for `count` constraints.
    pub fn with_capacity(color: ColorId, count: usize) -> Self {
        Self {
            color,
            indices: Vec::with_capacity(count * 2),
            data: Vec::with_capacity(count * FLOATS_PER_CONSTRAINT),
        }
    }

    /// Appends a distance constraint between particles `a` and `b`.
    pub fn push(&mut self, a: u32, b: u32, rest: f32, wa: f32, wb: f32) {
        self.indices.push(a);
        self.indices.push(b);
        self.data.extend_from_slice(&[rest, wa, wb]);
    }

    /// Number of constraints in the batch.
    #[inline]
    pub fn count(&self) -> usize {
        self.indices.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Particle pair of constraint `i`.
    #[inline]
    pub fn pair(&self, i: usize) -> [u32; 2] {
        [self.indices[2 * i], self.indices[2 * i + 1]]
    }

    /// `[rest, wa, wb]` of constraint `i`.
    #[inline]
    pub fn params(&self, i: usize) -> [f32; 3] {
        let base = i * FLOATS_PER_CONSTRAINT;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Correction for constraint `i` evaluated against `positions`.
    ///
    /// Returns the particle pair alongside the two deltas so callers can
    /// scatter without re-reading the index array.
    #[inline]
    pub fn correction(&self, positions: &[f32], i: usize) -> Option<([u32; 2], Vec3, Vec3)> {
        let [a, b] = self.pair(i);
        let [rest, wa, wb] = self.params(i);
        let pa = read_vec3(positions, a as usize * 3);
        let pb = read_vec3(positions, b as usize * 3);
        distance_correction(pa, pb, wa, wb, rest).map(|(da, db)| ([a, b], da, db))
    }

    /// Checks array shapes and that every index addresses one of
    /// `particle_count` particles.
    pub fn validate(&self, particle_count: usize) -> DrapeResult<()> {
        if self.indices.len() % 2 != 0 {
            return Err(DrapeError::Dispatch(format!(
                "batch {} has an odd index count ({})",
                self.color.0,
                self.indices.len()
            )));
        }
        if self.data.len() != self.count() * FLOATS_PER_CONSTRAINT {
            return Err(DrapeError::Dispatch(format!(
                "batch {} has {} data floats for {} constraints",
                self.color.0,
                self.data.len(),
                self.count()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&idx| idx as usize >= particle_count) {
            return Err(DrapeError::Dispatch(format!(
                "batch {} references particle {} (particle count: {})",
                self.color.0, bad, particle_count
            )));
        }
        Ok(())
    }

    /// Returns true if no particle appears in more than one constraint.
    pub fn is_conflict_free(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.indices.len());
        self.indices.iter().all(|&idx| seen.insert(idx))
    }
}
