//! # drape-telemetry
//!
//! Event bus for simulation telemetry. The solver emits structured events
//! (tick timing, projection passes, coloring summaries, energy) that are
//! consumed by pluggable sinks: an in-memory recorder, `tracing` logs, or
//! a JSON-lines writer.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};
