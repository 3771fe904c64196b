//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! The mesh is immutable input for topology extraction and, once a body
//! is running, the object it writes committed positions and normals into
//! for the render side.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use drape_types::{DrapeError, DrapeResult};

/// A triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    /// X components of vertex normals.
    pub normal_x: Vec<f32>,
    /// Y components of vertex normals.
    pub normal_y: Vec<f32>,
    /// Z components of vertex normals.
    pub normal_z: Vec<f32>,

    // --- Triangle data ---
    /// Triangle indices: each triangle is [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position as a `glam::Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> drape_math::Vec3 {
        drape_math::Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns the normal of vertex `i` as a `glam::Vec3`.
    #[inline]
    pub fn normal_vec3(&self, i: usize) -> drape_math::Vec3 {
        drape_math::Vec3::new(self.normal_x[i], self.normal_y[i], self.normal_z[i])
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Overwrites every vertex position, one `Vec3` per vertex.
    pub fn write_positions(&mut self, positions: &[drape_math::Vec3]) -> DrapeResult<()> {
        if positions.len() != self.vertex_count() {
            return Err(DrapeError::InvalidMesh(format!(
                "{} positions written to a mesh of {} vertices",
                positions.len(),
                self.vertex_count()
            )));
        }
        for (i, p) in positions.iter().enumerate() {
            self.pos_x[i] = p.x;
            self.pos_y[i] = p.y;
            self.pos_z[i] = p.z;
        }
        Ok(())
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            normal_x: Vec::with_capacity(vertex_capacity),
            normal_y: Vec::with_capacity(vertex_capacity),
            normal_z: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> DrapeResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(DrapeError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }
        if self.normal_x.len() != n || self.normal_y.len() != n || self.normal_z.len() != n {
            return Err(DrapeError::InvalidMesh(
                "Normal arrays have inconsistent lengths".into(),
            ));
        }

        validate_indices(&self.indices, n)
    }

    /// Constructs a mesh from interleaved position data.
    ///
    /// Converts `[x0, y0, z0, x1, y1, z1, ...]` to SoA layout. Normals
    /// are zeroed; call [`compute_vertex_normals`](crate::normals::compute_vertex_normals)
    /// to fill them.
    pub fn from_interleaved(positions: &[f32], indices: &[u32]) -> DrapeResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(DrapeError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for chunk in positions.chunks_exact(3) {
            mesh.pos_x.push(chunk[0]);
            mesh.pos_y.push(chunk[1]);
            mesh.pos_z.push(chunk[2]);
        }

        mesh.normal_x.resize(n, 0.0);
        mesh.normal_y.resize(n, 0.0);
        mesh.normal_z.resize(n, 0.0);

        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }

    /// Returns positions interleaved as `[x0, y0, z0, x1, ...]`.
    pub fn interleaved_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 3);
        for i in 0..self.vertex_count() {
            out.extend_from_slice(&self.position(i));
        }
        out
    }
}

/// Validates a flat triangle index buffer against a vertex count.
///
/// Rejects buffers whose length is not a multiple of 3, out-of-range
/// indices, triangles that repeat a vertex, and triangles listed twice
/// (in either winding).
pub fn validate_indices(indices: &[u32], vertex_count: usize) -> DrapeResult<()> {
    if indices.len() % 3 != 0 {
        return Err(DrapeError::InvalidMesh(
            "Index count is not divisible by 3".into(),
        ));
    }

    for (i, &idx) in indices.iter().enumerate() {
        if idx as usize >= vertex_count {
            return Err(DrapeError::InvalidMesh(format!(
                "Index {} at position {} is out of range (vertex count: {})",
                idx, i, vertex_count
            )));
        }
    }

    let mut seen = HashMap::with_capacity(indices.len() / 3);
    for (t, tri) in indices.chunks_exact(3).enumerate() {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        if a == b || b == c || a == c {
            return Err(DrapeError::InvalidMesh(format!(
                "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                t, a, b, c
            )));
        }

        // Same vertex set in any winding; it would hinge a triangle onto itself.
        let mut key = [a, b, c];
        key.sort_unstable();
        if let Some(first) = seen.insert(key, t) {
            return Err(DrapeError::InvalidMesh(format!(
                "Triangle {} duplicates triangle {}: [{}, {}, {}]",
                t, first, a, b, c
            )));
        }
    }

    Ok(())
}
