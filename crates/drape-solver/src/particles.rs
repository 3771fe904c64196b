//! Particle store: SoA per-particle state for one body.
//!
//! Positions and velocities are `glam::Vec3`; masses are per particle.
//! Each particle owns three consecutive scalars of the global state
//! vectors, starting at `dof_offset + 3 * index`.

use drape_math::dof::{read_vec3, write_vec3};
use drape_math::Vec3;
use drape_mesh::TriangleMesh;
use drape_types::constants::DOFS_PER_PARTICLE;
use drape_types::{DrapeError, DrapeResult, ParticleId};

/// Per-particle simulation state for a single body.
///
/// Particles are created once from the body's mesh and never destroyed
/// during a run. A pinned particle has infinite mass and zero inverse
/// mass: it feels no gravity and takes no constraint correction.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub mass: Vec<f32>,
    pub inv_mass: Vec<f32>,
    /// Offset of particle 0 in the global state vectors.
    dof_offset: usize,
}

impl ParticleStore {
    /// Builds one particle per vertex, spreading `total_mass` evenly.
    pub fn from_mesh(mesh: &TriangleMesh, total_mass: f32, pinned: &[bool]) -> DrapeResult<Self> {
        let positions = (0..mesh.vertex_count()).map(|i| mesh.position_vec3(i)).collect();
        Self::from_positions(positions, total_mass, pinned)
    }

    /// Builds particles at `positions`, spreading `total_mass` evenly.
    pub fn from_positions(positions: Vec<Vec3>, total_mass: f32, pinned: &[bool]) -> DrapeResult<Self> {
        let n = positions.len();

        if pinned.len() != n {
            return Err(DrapeError::InvalidConfig(format!(
                "Pinned array length ({}) != particle count ({})",
                pinned.len(),
                n
            )));
        }
        if !(total_mass > 0.0 && total_mass.is_finite()) {
            return Err(DrapeError::InvalidConfig(format!(
                "Body mass must be positive and finite, got {total_mass}"
            )));
        }

        let node_mass = total_mass / n.max(1) as f32;
        let (mass, inv_mass): (Vec<f32>, Vec<f32>) = pinned
            .iter()
            .map(|&fixed| {
                if fixed {
                    (f32::INFINITY, 0.0)
                } else {
                    (node_mass, 1.0 / node_mass)
                }
            })
            .unzip();

        Ok(Self {
            velocities: vec![Vec3::ZERO; n],
            positions,
            mass,
            inv_mass,
            dof_offset: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of scalar DOFs this store occupies in the global vectors.
    #[inline]
    pub fn dof_count(&self) -> usize {
        self.len() * DOFS_PER_PARTICLE
    }

    #[inline]
    pub fn is_pinned(&self, id: ParticleId) -> bool {
        self.inv_mass[id.index()] == 0.0
    }

    pub fn pinned_count(&self) -> usize {
        self.inv_mass.iter().filter(|&&w| w == 0.0).count()
    }

    pub fn set_dof_offset(&mut self, offset: usize) {
        self.dof_offset = offset;
    }

    pub fn dof_offset(&self) -> usize {
        self.dof_offset
    }

    /// Offset of particle `id` in the global state vectors.
    #[inline]
    pub fn offset_of(&self, id: ParticleId) -> usize {
        self.dof_offset + DOFS_PER_PARTICLE * id.index()
    }

    /// Index of particle `id` counted over all bodies (`offset / 3`).
    #[inline]
    pub fn global_index(&self, id: ParticleId) -> u32 {
        (self.offset_of(id) / DOFS_PER_PARTICLE) as u32
    }

    /// Writes positions into `buf` at this store's offsets.
    pub fn gather_positions(&self, buf: &mut [f32]) {
        for (i, &x) in self.positions.iter().enumerate() {
            write_vec3(buf, self.dof_offset + DOFS_PER_PARTICLE * i, x);
        }
    }

    /// Reads positions back from `buf`.
    pub fn scatter_positions(&mut self, buf: &[f32]) {
        let base = self.dof_offset;
        for (i, x) in self.positions.iter_mut().enumerate() {
            *x = read_vec3(buf, base + DOFS_PER_PARTICLE * i);
        }
    }

    pub fn gather_velocities(&self, buf: &mut [f32]) {
        for (i, &v) in self.velocities.iter().enumerate() {
            write_vec3(buf, self.dof_offset + DOFS_PER_PARTICLE * i, v);
        }
    }

    pub fn scatter_velocities(&mut self, buf: &[f32]) {
        let base = self.dof_offset;
        for (i, v) in self.velocities.iter_mut().enumerate() {
            *v = read_vec3(buf, base + DOFS_PER_PARTICLE * i);
        }
    }

    /// Writes each particle's inverse mass into all three of its DOFs.
    pub fn gather_inverse_masses(&self, buf: &mut [f32]) {
        for (i, &w) in self.inv_mass.iter().enumerate() {
            write_vec3(buf, self.dof_offset + DOFS_PER_PARTICLE * i, Vec3::splat(w));
        }
    }

    /// Adds `m * gravity` to `buf` for every free particle.
    pub fn accumulate_gravity(&self, gravity: Vec3, buf: &mut [f32]) {
        for (i, &m) in self.mass.iter().enumerate() {
            if self.inv_mass[i] == 0.0 {
                continue;
            }
            let offset = self.dof_offset + DOFS_PER_PARTICLE * i;
            let f = read_vec3(buf, offset) + gravity * m;
            write_vec3(buf, offset, f);
        }
    }

    /// Kinetic energy `0.5 * m * |v|^2` summed over free particles.
    pub fn kinetic_energy(&self) -> f64 {
        let mut energy = 0.0f64;
        for (i, v) in self.velocities.iter().enumerate() {
            if self.inv_mass[i] > 0.0 {
                energy += 0.5 * self.mass[i] as f64 * v.length_squared() as f64;
            }
        }
        energy
    }
}
