//! Stretch (distance) constraints.
//!
//! One constraint per unique mesh edge, holding the pair at its initial
//! length.

use drape_math::dof::{add_vec3, read_vec3};
use drape_math::projection::distance_correction;
use drape_types::ParticleId;

use crate::particles::ParticleStore;

/// Keeps two particles at their rest distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchConstraint {
    pub particles: [ParticleId; 2],
    /// Distance between the pair in the initial configuration.
    pub rest_length: f32,
    /// Material stiffness. Carried for configuration round trips; the
    /// projection restores the full violation every pass.
    pub stiffness: f32,
}

impl StretchConstraint {
    /// Creates a constraint whose rest length is the pair's current distance.
    pub fn new(a: ParticleId, b: ParticleId, store: &ParticleStore, stiffness: f32) -> Self {
        let rest_length = store.positions[a.index()].distance(store.positions[b.index()]);
        Self {
            particles: [a, b],
            rest_length,
            stiffness,
        }
    }

    /// Raw particle indices, local to the body.
    #[inline]
    pub fn pair(&self) -> [u32; 2] {
        [self.particles[0].0, self.particles[1].0]
    }

    /// Signed violation `|pa - pb| - rest` in the global buffer `p`.
    pub fn violation(&self, store: &ParticleStore, p: &[f32]) -> f32 {
        let [a, b] = self.particles;
        let pa = read_vec3(p, store.offset_of(a));
        let pb = read_vec3(p, store.offset_of(b));
        pa.distance(pb) - self.rest_length
    }

    /// Projects the constraint in place on the global buffer `p`.
    pub fn project(&self, store: &ParticleStore, p: &mut [f32]) {
        let [a, b] = self.particles;
        let (oa, ob) = (store.offset_of(a), store.offset_of(b));
        let wa = store.inv_mass[a.index()];
        let wb = store.inv_mass[b.index()];

        if let Some((da, db)) =
            distance_correction(read_vec3(p, oa), read_vec3(p, ob), wa, wb, self.rest_length)
        {
            add_vec3(p, oa, da);
            add_vec3(p, ob, db);
        }
    }
}
