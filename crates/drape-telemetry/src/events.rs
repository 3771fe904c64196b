//! Simulation event types.
//!
//! Structured events emitted by the simulation loop at fixed points of
//! each tick. Events are lightweight value types carrying just enough
//! data to monitor a run.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
///
/// Events are tagged with the tick index they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick number (0-indexed).
    pub timestep: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Constraint coloring finished for a body.
    Coloring {
        /// Body name.
        body: String,
        /// Number of color classes.
        classes: u32,
        /// Number of colored stretch constraints.
        constraints: u32,
        /// Size of the largest class.
        largest_class: u32,
    },

    /// Tick started.
    TimestepBegin {
        /// Simulation time at the start of the tick (seconds).
        sim_time: f64,
    },

    /// The loop moved to another phase of the tick.
    Phase {
        /// `predicting`, `projecting` or `committing`.
        phase: String,
    },

    /// One projection pass over every body's constraints completed.
    ProjectionPass {
        /// Pass number within the tick.
        iteration: u32,
    },

    /// Tick completed.
    TimestepEnd {
        /// Projection passes run.
        iterations: u32,
        /// Wall-clock time for the entire tick (seconds).
        wall_time: f64,
    },

    /// A tick was requested while paused.
    Skipped,

    /// Energy snapshot after commit.
    Energy {
        /// Kinetic energy (0.5 * m * v^2) of the free particles.
        kinetic: f64,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given tick.
    pub fn new(timestep: u32, kind: EventKind) -> Self {
        Self { timestep, kind }
    }
}
