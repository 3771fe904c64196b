//! Cloth body: a triangle mesh simulated with stretch and bend constraints.

use drape_gpu::ColorDispatcher;
use drape_math::Vec3;
use drape_mesh::normals::compute_vertex_normals;
use drape_mesh::{Topology, TriangleMesh};
use drape_types::constants::DOFS_PER_PARTICLE;
use drape_types::{DrapeError, DrapeResult};

use crate::body::SimulatedBody;
use crate::coloring::{Coloring, GraphColorer};
use crate::config::ClothParams;
use crate::constraints::ConstraintSet;
use crate::particles::ParticleStore;

/// State built by [`ClothBody::initialize`].
#[derive(Debug, Clone)]
struct ClothState {
    particles: ParticleStore,
    constraints: ConstraintSet,
    coloring: Coloring,
}

/// A piece of cloth: one particle per mesh vertex, one stretch constraint
/// per edge and one bend constraint per interior edge.
///
/// Only stretch constraints are colored; bend constraints are always
/// projected in order after the color classes.
#[derive(Debug, Clone)]
pub struct ClothBody {
    name: String,
    mesh: TriangleMesh,
    params: ClothParams,
    pinned: Vec<bool>,
    state: Option<ClothState>,
}

impl ClothBody {
    /// Creates a cloth body. `pinned[i]` fixes vertex `i` in place.
    ///
    /// The mesh, mask and parameters are validated here; particles and
    /// constraints are built by `initialize`.
    pub fn new(mesh: TriangleMesh, params: ClothParams, pinned: Vec<bool>) -> DrapeResult<Self> {
        mesh.validate()?;
        params.validate()?;
        if pinned.len() != mesh.vertex_count() {
            return Err(DrapeError::InvalidConfig(format!(
                "Pinned array length ({}) != vertex count ({})",
                pinned.len(),
                mesh.vertex_count()
            )));
        }

        Ok(Self {
            name: "cloth".into(),
            mesh,
            params,
            pinned,
            state: None,
        })
    }

    /// Creates a cloth body with no pinned vertices.
    pub fn free(mesh: TriangleMesh, params: ClothParams) -> DrapeResult<Self> {
        let n = mesh.vertex_count();
        Self::new(mesh, params, vec![false; n])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn params(&self) -> &ClothParams {
        &self.params
    }

    pub fn pinned(&self) -> &[bool] {
        &self.pinned
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> DrapeResult<&ClothState> {
        self.state.as_ref().ok_or(DrapeError::NotInitialized("cloth body"))
    }

    fn state_mut(&mut self) -> DrapeResult<&mut ClothState> {
        self.state.as_mut().ok_or(DrapeError::NotInitialized("cloth body"))
    }

    pub fn particles(&self) -> Option<&ParticleStore> {
        self.state.as_ref().map(|s| &s.particles)
    }

    pub fn constraints(&self) -> Option<&ConstraintSet> {
        self.state.as_ref().map(|s| &s.constraints)
    }
}

impl SimulatedBody for ClothBody {
    fn initialize(&mut self, dof_offset: usize) -> DrapeResult<()> {
        let mut particles = ParticleStore::from_mesh(&self.mesh, self.params.mass, &self.pinned)?;
        particles.set_dof_offset(dof_offset);

        let topology = Topology::build(&self.mesh)?;
        let constraints = ConstraintSet::build(&topology, &particles, &self.params)?;
        let coloring = GraphColorer::color_stretch(&constraints.stretch, &particles);
        coloring.validate(&constraints.stretch)?;

        tracing::info!(
            body = %self.name,
            particles = particles.len(),
            pinned = particles.pinned_count(),
            stretch = constraints.stretch_count(),
            bend = constraints.bend_count(),
            skipped_bend = constraints.skipped_bends,
            colors = coloring.class_count(),
            dof_offset,
            "cloth body initialized"
        );

        self.state = Some(ClothState {
            particles,
            constraints,
            coloring,
        });
        Ok(())
    }

    fn dof_count(&self) -> usize {
        self.mesh.vertex_count() * DOFS_PER_PARTICLE
    }

    fn positions(&self, x: &mut [f32]) -> DrapeResult<()> {
        self.state()?.particles.gather_positions(x);
        Ok(())
    }

    fn set_positions(&mut self, x: &[f32]) -> DrapeResult<()> {
        self.state_mut()?.particles.scatter_positions(x);
        Ok(())
    }

    fn velocities(&self, v: &mut [f32]) -> DrapeResult<()> {
        self.state()?.particles.gather_velocities(v);
        Ok(())
    }

    fn set_velocities(&mut self, v: &[f32]) -> DrapeResult<()> {
        self.state_mut()?.particles.scatter_velocities(v);
        Ok(())
    }

    fn inverse_masses(&self, w: &mut [f32]) -> DrapeResult<()> {
        self.state()?.particles.gather_inverse_masses(w);
        Ok(())
    }

    fn accumulate_external_force(&self, gravity: Vec3, f: &mut [f32]) -> DrapeResult<()> {
        self.state()?.particles.accumulate_gravity(gravity, f);
        Ok(())
    }

    fn project_constraints(&self, p: &mut [f32], dispatcher: Option<&dyn ColorDispatcher>) -> DrapeResult<()> {
        let state = self.state()?;
        match dispatcher {
            None => state.constraints.project_all(&state.particles, p),
            Some(dispatcher) => {
                for class in &state.coloring.classes {
                    dispatcher.dispatch(p, &class.batch)?;
                }
                state.constraints.project_bends(&state.particles, p);
            }
        }
        Ok(())
    }

    fn update_object_state(&mut self) -> DrapeResult<()> {
        let state = self.state.as_ref().ok_or(DrapeError::NotInitialized("cloth body"))?;
        self.mesh.write_positions(&state.particles.positions)?;
        compute_vertex_normals(&mut self.mesh);
        Ok(())
    }

    fn kinetic_energy(&self) -> f64 {
        self.particles().map_or(0.0, ParticleStore::kinetic_energy)
    }

    fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    fn coloring(&self) -> Option<&Coloring> {
        self.state.as_ref().map(|s| &s.coloring)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
