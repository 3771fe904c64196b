//! Thread-pool executor for color batches.
//!
//! All corrections of a class are computed in parallel from a shared,
//! read-only view of the positions, then scattered on the calling thread.
//! Members of a class never share a particle, so the result is identical
//! to running them one after another.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use drape_math::dof::add_vec3;
use drape_types::{DrapeError, DrapeResult};

use crate::batch::ColorBatch;
use crate::dispatcher::{check_dispatch, project_sequential, ColorDispatcher};

/// Batches smaller than this run on the calling thread.
pub const DEFAULT_MIN_PARALLEL_BATCH: usize = 256;

/// Executes color batches on a rayon thread pool.
pub struct RayonDispatcher {
    /// Requested worker count; `None` uses rayon's global pool.
    threads: Option<usize>,
    pool: Option<ThreadPool>,
    min_parallel_batch: usize,
}

impl RayonDispatcher {
    /// Dispatcher on rayon's global pool.
    pub fn new() -> Self {
        Self {
            threads: None,
            pool: None,
            min_parallel_batch: DEFAULT_MIN_PARALLEL_BATCH,
        }
    }

    /// Dispatcher on a dedicated pool of `threads` workers, built by `init`.
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
            ..Self::new()
        }
    }

    /// Sets the batch size below which work stays on the calling thread.
    /// Zero forces every batch through the pool.
    pub fn with_min_parallel_batch(mut self, min: usize) -> Self {
        self.min_parallel_batch = min;
        self
    }

    /// Number of worker threads batches will run on.
    pub fn thread_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn project_parallel(&self, positions: &mut [f32], batch: &ColorBatch) {
        let view: &[f32] = positions;
        let compute = || {
            (0..batch.count())
                .into_par_iter()
                .filter_map(|i| batch.correction(view, i))
                .collect::<Vec<_>>()
        };
        let corrections = match &self.pool {
            Some(pool) => pool.install(compute),
            None => compute(),
        };

        for ([a, b], da, db) in corrections {
            add_vec3(positions, a as usize * 3, da);
            add_vec3(positions, b as usize * 3, db);
        }
    }
}

impl Default for RayonDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RayonDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonDispatcher")
            .field("threads", &self.threads)
            .field("min_parallel_batch", &self.min_parallel_batch)
            .finish()
    }
}

impl ColorDispatcher for RayonDispatcher {
    fn init(&mut self) -> DrapeResult<()> {
        if let (Some(threads), None) = (self.threads, &self.pool) {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("drape-dispatch-{i}"))
                .build()
                .map_err(|e| DrapeError::Dispatch(format!("thread pool: {e}")))?;
            self.pool = Some(pool);
        }
        tracing::debug!(threads = self.thread_count(), "rayon dispatcher ready");
        Ok(())
    }

    fn name(&self) -> &str {
        "rayon"
    }

    fn dispatch(&self, positions: &mut [f32], batch: &ColorBatch) -> DrapeResult<()> {
        check_dispatch(positions, batch)?;
        if batch.count() < self.min_parallel_batch {
            project_sequential(positions, batch);
        } else {
            self.project_parallel(positions, batch);
        }
        Ok(())
    }

    fn is_parallel(&self) -> bool {
        true
    }
}
