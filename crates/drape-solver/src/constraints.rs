//! Constraint set construction from mesh topology.

use drape_mesh::Topology;
use drape_types::{DrapeError, DrapeResult, ParticleId};

use crate::bending::BendConstraint;
use crate::config::ClothParams;
use crate::particles::ParticleStore;
use crate::stretch::StretchConstraint;

/// All constraints of one body, in registration order.
///
/// Stretch constraints follow the topology's edge order and bend
/// constraints its hinge order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pub stretch: Vec<StretchConstraint>,
    pub bend: Vec<BendConstraint>,
    /// Hinges dropped because a wing triangle was degenerate.
    pub skipped_bends: usize,
}

impl ConstraintSet {
    /// One stretch constraint per unique edge and one bend constraint per
    /// hinge, with rest state taken from the store's current positions.
    ///
    /// Degenerate hinges are skipped with a warning rather than failing
    /// the whole body.
    pub fn build(topology: &Topology, store: &ParticleStore, params: &ClothParams) -> DrapeResult<Self> {
        if topology.vertex_count != store.len() {
            return Err(DrapeError::InvalidMesh(format!(
                "Topology covers {} vertices but the body has {} particles",
                topology.vertex_count,
                store.len()
            )));
        }

        let stretch = topology
            .edges
            .iter()
            .map(|e| {
                StretchConstraint::new(
                    ParticleId(e.a),
                    ParticleId(e.b),
                    store,
                    params.stretch_stiffness,
                )
            })
            .collect();

        let mut bend = Vec::with_capacity(topology.bend_count());
        let mut skipped_bends = 0;
        for (h, hinge) in topology.bend_candidates.iter().enumerate() {
            let ids = hinge.vertices().map(ParticleId);
            match BendConstraint::new(ids, store, params.bend_stiffness) {
                Ok(c) => bend.push(c),
                Err(DrapeError::DegenerateGeometry(reason)) => {
                    tracing::warn!(hinge = h, vertices = ?hinge.vertices(), %reason, "skipping degenerate bend hinge");
                    skipped_bends += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            stretch,
            bend,
            skipped_bends,
        })
    }

    pub fn stretch_count(&self) -> usize {
        self.stretch.len()
    }

    pub fn bend_count(&self) -> usize {
        self.bend.len()
    }

    /// Local particle pairs of every stretch constraint, for coloring.
    pub fn stretch_pairs(&self) -> Vec<[u32; 2]> {
        self.stretch.iter().map(StretchConstraint::pair).collect()
    }

    /// Projects every stretch constraint, then every bend constraint.
    pub fn project_all(&self, store: &ParticleStore, p: &mut [f32]) {
        for c in &self.stretch {
            c.project(store, p);
        }
        self.project_bends(store, p);
    }

    pub fn project_bends(&self, store: &ParticleStore, p: &mut [f32]) {
        for c in &self.bend {
            c.project(store, p);
        }
    }
}
