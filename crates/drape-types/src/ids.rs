//! Index newtypes for simulation entities.
//!
//! Constraints refer to particles through these indices, never through
//! references, so the particle arena can be reallocated freely.

use serde::{Deserialize, Serialize};

/// Index of a particle inside its body's particle store.
///
/// Local to the body: the global position of the particle in the state
/// vectors is `dof_offset + 3 * index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

/// Index of a color class. Classes are dispatched in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColorId(pub u32);

impl ParticleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ColorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParticleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
