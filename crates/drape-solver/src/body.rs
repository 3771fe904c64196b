//! Simulated body trait: the capability set the loop drives.
//!
//! The simulation only talks to bodies through this trait, enabling new
//! body kinds (ropes, volumetric meshes) without touching the loop.

use drape_gpu::ColorDispatcher;
use drape_math::Vec3;
use drape_mesh::TriangleMesh;
use drape_types::DrapeResult;

use crate::coloring::Coloring;

/// A body whose particles live in the global state vectors.
///
/// The loop calls these methods in order each tick:
///
/// ```text
/// body.initialize(dof_offset)?;              // once
/// loop {
///     body.positions(x)?; body.velocities(v)?; body.inverse_masses(w)?;
///     body.accumulate_external_force(g, f)?;
///     for _ in 0..iterations { body.project_constraints(p, dispatcher)?; }
///     body.set_positions(x)?; body.set_velocities(v)?;
///     body.update_object_state()?;
/// }
/// ```
///
/// All buffer arguments are global, interleaved `[x0, y0, z0, x1, ...]`
/// vectors; a body reads and writes only its own DOF range.
pub trait SimulatedBody: Send {
    /// Builds particles and constraints and claims the DOF range starting
    /// at `dof_offset`.
    fn initialize(&mut self, dof_offset: usize) -> DrapeResult<()>;

    /// Number of scalar DOFs (3 per particle). Known before `initialize`.
    fn dof_count(&self) -> usize;

    fn positions(&self, x: &mut [f32]) -> DrapeResult<()>;

    fn set_positions(&mut self, x: &[f32]) -> DrapeResult<()>;

    fn velocities(&self, v: &mut [f32]) -> DrapeResult<()>;

    fn set_velocities(&mut self, v: &[f32]) -> DrapeResult<()>;

    /// Writes each particle's inverse mass into all three of its DOFs.
    fn inverse_masses(&self, w: &mut [f32]) -> DrapeResult<()>;

    /// Adds external forces (gravity `m·g` on free particles) into `f`.
    fn accumulate_external_force(&self, gravity: Vec3, f: &mut [f32]) -> DrapeResult<()>;

    /// One projection pass over all of the body's constraints against the
    /// predicted positions `p`. With a dispatcher, colored constraints go
    /// through it one class at a time in increasing color order.
    fn project_constraints(&self, p: &mut [f32], dispatcher: Option<&dyn ColorDispatcher>) -> DrapeResult<()>;

    /// Pushes committed state into the render object.
    fn update_object_state(&mut self) -> DrapeResult<()>;

    /// Kinetic energy of the body's free particles.
    fn kinetic_energy(&self) -> f64;

    /// The render-facing mesh.
    fn mesh(&self) -> &TriangleMesh;

    /// Color classes of the body's constraints, once initialized.
    fn coloring(&self) -> Option<&Coloring> {
        None
    }

    /// Returns the body's name.
    fn name(&self) -> &str;
}
