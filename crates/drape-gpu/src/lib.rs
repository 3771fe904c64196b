//! # drape-gpu
//!
//! Batch execution layer for the drape cloth solver.
//!
//! The solver hands each color class of stretch constraints to a
//! [`ColorDispatcher`] as a flat [`ColorBatch`]. Two executors ship here:
//! - [`SequentialDispatcher`]: Reference CPU implementation (always available)
//! - [`RayonDispatcher`]: Thread-pool execution over a class's members
//!
//! A GPU backend would implement the same trait, uploading the batch's
//! index and data arrays as storage buffers.

pub mod batch;
pub mod buffers;
pub mod dispatcher;
pub mod parallel;

pub use batch::ColorBatch;
pub use buffers::ComputeBuffer;
pub use dispatcher::{ColorDispatcher, SequentialDispatcher};
pub use parallel::RayonDispatcher;
