//! Isometric quadratic bending constraints.
//!
//! Each interior edge of the mesh gets one hinge constraint over the two
//! triangles sharing it:
//! ```text
//!        x2
//!       /  \
//!     x0 ── x1
//!       \  /
//!        x3
//! ```
//! The bending energy of a hinge that was flat at rest is quadratic in the
//! four positions, `C(p) = ½ Σ_ij Q_ij p_i·p_j`, with a constant 4×4
//! matrix `Q` built once from cotangent weights of the rest shape.
//!
//! With interior angles α0, α1 of triangle (x0, x1, x2) at x0, x1 and
//! β0, β1 of triangle (x0, x1, x3) at x0, x1:
//! ```text
//! K = [cot α1 + cot β1, cot α0 + cot β0, -(cot α0 + cot α1), -(cot β0 + cot β1)]
//! Q = 3 / (A0 + A1) · K Kᵀ
//! ```
//! `Σ K_i = 0` and `Σ K_i x_i = 0` for any flat hinge, so a flat
//! configuration has zero energy and receives no correction.

use drape_math::dof::{add_vec3, read_vec3};
use drape_math::geometry::{interior_cotangent, triangle_area};
use drape_math::{Mat4, Vec3, Vec4};
use drape_types::constants::{DEGENERATE_AREA_THRESHOLD, EPSILON};
use drape_types::{DrapeError, DrapeResult, ParticleId};

use crate::particles::ParticleStore;

/// Cotangent weight vector `K` and combined area `A0 + A1` of a hinge.
///
/// Fails with [`DrapeError::DegenerateGeometry`] if either triangle is
/// (numerically) zero-area.
pub fn hinge_weights(x: [Vec3; 4]) -> DrapeResult<(Vec4, f32)> {
    let [x0, x1, x2, x3] = x;
    let area0 = triangle_area(x0, x1, x2);
    let area1 = triangle_area(x0, x1, x3);
    if area0 < DEGENERATE_AREA_THRESHOLD || area1 < DEGENERATE_AREA_THRESHOLD {
        return Err(DrapeError::DegenerateGeometry(format!(
            "hinge triangle areas {area0:e} and {area1:e}"
        )));
    }

    let cot = |apex: Vec3, p: Vec3, q: Vec3| {
        interior_cotangent(apex, p, q)
            .ok_or_else(|| DrapeError::DegenerateGeometry("hinge angle has no cotangent".into()))
    };
    let a0 = cot(x0, x1, x2)?;
    let a1 = cot(x1, x0, x2)?;
    let b0 = cot(x0, x1, x3)?;
    let b1 = cot(x1, x0, x3)?;

    let k = Vec4::new(a1 + b1, a0 + b0, -(a0 + a1), -(b0 + b1));
    Ok((k, area0 + area1))
}

/// Bending constraint over one hinge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendConstraint {
    /// `[x0, x1, x2, x3]`: shared edge first, then the opposite vertices.
    pub particles: [ParticleId; 4],
    /// Symmetric 4×4 energy matrix.
    pub q: Mat4,
    /// Inverse masses of the four particles (diagonal blocks `w_i · I₃`).
    pub w: Vec4,
    /// Fraction of the computed correction applied per pass.
    pub stiffness: f32,
}

impl BendConstraint {
    /// Builds the hinge from the store's current (rest) positions.
    ///
    /// The four particles must be distinct.
    pub fn new(particles: [ParticleId; 4], store: &ParticleStore, stiffness: f32) -> DrapeResult<Self> {
        for i in 0..4 {
            if particles[i + 1..].contains(&particles[i]) {
                return Err(DrapeError::DegenerateGeometry(format!(
                    "hinge lists particle {} twice",
                    particles[i].0
                )));
            }
        }

        let x = particles.map(|id| store.positions[id.index()]);
        let (k, area) = hinge_weights(x)?;

        let q = Mat4::from_cols(k * k.x, k * k.y, k * k.z, k * k.w) * (3.0 / area);
        let w = Vec4::from_array(particles.map(|id| store.inv_mass[id.index()]));

        Ok(Self {
            particles,
            q,
            w,
            stiffness,
        })
    }

    fn read(&self, store: &ParticleStore, p: &[f32]) -> [Vec3; 4] {
        self.particles.map(|id| read_vec3(p, store.offset_of(id)))
    }

    /// `∇C_i = Σ_j Q_ij p_j` for each of the four particles.
    fn gradients(&self, x: &[Vec3; 4]) -> [Vec3; 4] {
        let row = |i: usize| {
            let r = self.q.row(i);
            x[0] * r.x + x[1] * r.y + x[2] * r.z + x[3] * r.w
        };
        [row(0), row(1), row(2), row(3)]
    }

    /// Bending energy `C` at the positions in `p`.
    pub fn value(&self, store: &ParticleStore, p: &[f32]) -> f32 {
        let x = self.read(store, p);
        let grad = self.gradients(&x);
        0.5 * (0..4).map(|i| x[i].dot(grad[i])).sum::<f32>()
    }

    /// Projects the constraint in place on the global buffer `p`.
    pub fn project(&self, store: &ParticleStore, p: &mut [f32]) {
        let x = self.read(store, p);
        let grad = self.gradients(&x);
        let w = self.w.to_array();

        let c = 0.5 * (0..4).map(|i| x[i].dot(grad[i])).sum::<f32>();
        let denom: f32 = (0..4).map(|i| w[i] * grad[i].length_squared()).sum();
        if !denom.is_finite() || denom <= EPSILON {
            return;
        }

        let lambda = c / denom;
        for (i, id) in self.particles.iter().enumerate() {
            if w[i] > 0.0 {
                add_vec3(p, store.offset_of(*id), grad[i] * (-self.stiffness * lambda * w[i]));
            }
        }
    }
}
