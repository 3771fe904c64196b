//! Color-batch dispatch trait and the sequential reference executor.
//!
//! The [`ColorDispatcher`] trait is the only seam between the solver and
//! whatever executes constraint batches. The solver calls `dispatch` once
//! per color class per projection pass, in increasing color order, and
//! does not start the next class until the call returns.

use drape_math::dof::add_vec3;
use drape_types::{DrapeError, DrapeResult};

use crate::batch::ColorBatch;

/// Executes one color class of distance constraints against the
/// predicted-position buffer.
///
/// Implementations may process the members of a batch in any order or
/// concurrently: the coloring guarantees they touch disjoint particles.
///
/// # Implementations
/// - [`SequentialDispatcher`]: Sequential CPU reference (always available)
/// - [`RayonDispatcher`](crate::parallel::RayonDispatcher): Thread pool
pub trait ColorDispatcher: Send + Sync {
    /// Initialize the executor. Called once before the first dispatch.
    fn init(&mut self) -> DrapeResult<()>;

    /// Returns the executor name (e.g., "sequential", "rayon").
    fn name(&self) -> &str;

    /// Project every constraint in `batch`, writing into `positions`
    /// (interleaved `[x0, y0, z0, x1, ...]`).
    ///
    /// Fails with [`DrapeError::Dispatch`] if the batch is malformed or
    /// references a particle outside `positions`.
    fn dispatch(&self, positions: &mut [f32], batch: &ColorBatch) -> DrapeResult<()>;

    /// Returns true if batch members may run concurrently.
    fn is_parallel(&self) -> bool;
}

/// Shape checks shared by all executors.
pub(crate) fn check_dispatch(positions: &[f32], batch: &ColorBatch) -> DrapeResult<()> {
    if positions.len() % 3 != 0 {
        return Err(DrapeError::Dispatch(format!(
            "position buffer length {} is not a multiple of 3",
            positions.len()
        )));
    }
    batch.validate(positions.len() / 3)
}

/// Projects the batch member by member on the calling thread.
pub(crate) fn project_sequential(positions: &mut [f32], batch: &ColorBatch) {
    for i in 0..batch.count() {
        if let Some(([a, b], da, db)) = batch.correction(positions, i) {
            add_vec3(positions, a as usize * 3, da);
            add_vec3(positions, b as usize * 3, db);
        }
    }
}

/// Sequential reference executor.
///
/// Used for:
/// - Correctness validation (other executors must match it bit for bit)
/// - Small meshes where thread hand-off isn't worthwhile
#[derive(Debug, Default)]
pub struct SequentialDispatcher {
    initialized: bool,
}

impl SequentialDispatcher {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    /// Returns true once `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ColorDispatcher for SequentialDispatcher {
    fn init(&mut self) -> DrapeResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "sequential"
    }

    fn dispatch(&self, positions: &mut [f32], batch: &ColorBatch) -> DrapeResult<()> {
        check_dispatch(positions, batch)?;
        project_sequential(positions, batch);
        Ok(())
    }

    fn is_parallel(&self) -> bool {
        false
    }
}
