//! Graph coloring of constraints for conflict-free batched projection.
//!
//! Two constraints conflict when they share a particle. Greedy coloring
//! assigns each constraint the smallest color not already taken by a
//! conflicting constraint, so every color class can be projected
//! concurrently without write conflicts.

use std::collections::HashSet;

use drape_gpu::ColorBatch;
use drape_types::{ColorId, DrapeError, DrapeResult};

use crate::particles::ParticleStore;
use crate::stretch::StretchConstraint;

/// Greedy sequential constraint colorer.
pub struct GraphColorer;

impl GraphColorer {
    /// Color constraints given as particle index tuples.
    ///
    /// Constraints are processed in input order; constraint `u` takes the
    /// smallest color not used by any earlier constraint sharing a
    /// particle with it. Returns one color per constraint.
    pub fn assign_colors<const N: usize>(constraints: &[[u32; N]]) -> Vec<u32> {
        if constraints.is_empty() {
            return Vec::new();
        }

        let particle_count = constraints
            .iter()
            .flat_map(|c| c.iter())
            .max()
            .map_or(0, |&m| m as usize + 1);

        // Particle → constraints incidence
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); particle_count];
        for (ci, c) in constraints.iter().enumerate() {
            for &p in c {
                incident[p as usize].push(ci);
            }
        }

        // A constraint has fewer than `len` neighbours, so its color is < len.
        let mut forbidden = vec![false; constraints.len() + 1];
        let mut colors = vec![u32::MAX; constraints.len()];

        for (u, c) in constraints.iter().enumerate() {
            for &p in c {
                for &v in &incident[p as usize] {
                    if v < u {
                        forbidden[colors[v] as usize] = true;
                    }
                }
            }

            let color = forbidden.iter().position(|&f| !f).unwrap_or(forbidden.len());
            colors[u] = color as u32;

            for &p in c {
                for &v in &incident[p as usize] {
                    if v < u {
                        forbidden[colors[v] as usize] = false;
                    }
                }
            }
        }

        colors
    }

    /// Colors a body's stretch constraints and flattens each class into a
    /// dispatch batch addressed by global particle index.
    pub fn color_stretch(constraints: &[StretchConstraint], store: &ParticleStore) -> Coloring {
        let pairs: Vec<[u32; 2]> = constraints.iter().map(StretchConstraint::pair).collect();
        let colors = Self::assign_colors(&pairs);
        let class_count = colors.iter().max().map_or(0, |&m| m as usize + 1);

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); class_count];
        for (ci, &color) in colors.iter().enumerate() {
            members[color as usize].push(ci);
        }

        let classes = members
            .into_iter()
            .enumerate()
            .map(|(color, members)| {
                let color = ColorId(color as u32);
                let mut batch = ColorBatch::with_capacity(color, members.len());
                for &ci in &members {
                    let c = &constraints[ci];
                    let [a, b] = c.particles;
                    batch.push(
                        store.global_index(a),
                        store.global_index(b),
                        c.rest_length,
                        store.inv_mass[a.index()],
                        store.inv_mass[b.index()],
                    );
                }
                ColorClass {
                    color,
                    members,
                    batch,
                }
            })
            .collect();

        Coloring {
            classes,
            constraint_count: constraints.len(),
        }
    }
}

/// Constraints sharing one color.
#[derive(Debug, Clone)]
pub struct ColorClass {
    pub color: ColorId,
    /// Indices into the stretch constraint list, in input order.
    pub members: Vec<usize>,
    /// Members flattened for dispatch.
    pub batch: ColorBatch,
}

impl ColorClass {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition of a constraint list into color classes, ordered by color.
#[derive(Debug, Clone, Default)]
pub struct Coloring {
    pub classes: Vec<ColorClass>,
    /// Number of constraints that were colored.
    pub constraint_count: usize,
}

impl Coloring {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn largest_class(&self) -> usize {
        self.classes.iter().map(ColorClass::len).max().unwrap_or(0)
    }

    /// Checks that the classes partition `constraints` and that no two
    /// members of one class share a particle.
    pub fn validate(&self, constraints: &[StretchConstraint]) -> DrapeResult<()> {
        if self.constraint_count != constraints.len() {
            return Err(DrapeError::InvariantViolation(format!(
                "coloring covers {} constraints, expected {}",
                self.constraint_count,
                constraints.len()
            )));
        }

        let mut seen = vec![false; constraints.len()];
        for (k, class) in self.classes.iter().enumerate() {
            if class.color.index() != k {
                return Err(DrapeError::InvariantViolation(format!(
                    "class {} carries color {}",
                    k, class.color.0
                )));
            }
            if class.batch.count() != class.members.len() {
                return Err(DrapeError::InvariantViolation(format!(
                    "class {} batch holds {} constraints for {} members",
                    k,
                    class.batch.count(),
                    class.members.len()
                )));
            }

            let mut touched = HashSet::with_capacity(class.members.len() * 2);
            for &ci in &class.members {
                let Some(c) = constraints.get(ci) else {
                    return Err(DrapeError::InvariantViolation(format!(
                        "class {k} references constraint {ci} out of range"
                    )));
                };
                if std::mem::replace(&mut seen[ci], true) {
                    return Err(DrapeError::InvariantViolation(format!(
                        "constraint {ci} appears in more than one class"
                    )));
                }
                for p in c.particles {
                    if !touched.insert(p) {
                        return Err(DrapeError::InvariantViolation(format!(
                            "class {} has two constraints sharing particle {}",
                            k, p.0
                        )));
                    }
                }
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(DrapeError::InvariantViolation(format!(
                "constraint {missing} has no color"
            )));
        }
        Ok(())
    }
}
