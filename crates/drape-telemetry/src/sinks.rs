//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them (record in memory,
//! log through `tracing`, append to a JSON-lines stream).

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Records events into a shared `Vec` for tests and inspection.
///
/// The sink is boxed into the bus, so the recording is reached through
/// the handle returned by [`VecSink::events`].
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded events.
    pub fn events(&self) -> Arc<Mutex<Vec<SimulationEvent>>> {
        Arc::clone(&self.events)
    }

    /// Snapshot of everything recorded so far.
    pub fn snapshot(&self) -> Vec<SimulationEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        // `tracing` macros need a constant level.
        match self.level {
            tracing::Level::ERROR => {
                tracing::error!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::WARN => {
                tracing::warn!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::INFO => {
                tracing::info!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            tracing::Level::DEBUG => {
                tracing::debug!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
            _ => {
                tracing::trace!(timestep = event.timestep, event = ?event.kind, "simulation_event")
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}

/// Writes one JSON object per event to any writer.
///
/// Write failures are logged once and the sink goes quiet; telemetry
/// never aborts a run.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    failed: bool,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn fail(&mut self, err: &dyn std::fmt::Display) {
        if !self.failed {
            tracing::warn!(error = %err, "event stream write failed; dropping further events");
            self.failed = true;
        }
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &SimulationEvent) {
        if self.failed {
            return;
        }
        if let Err(e) = serde_json::to_writer(&mut self.writer, event) {
            self.fail(&e);
            return;
        }
        if let Err(e) = self.writer.write_all(b"\n") {
            self.fail(&e);
        }
    }

    fn finalize(&mut self) {
        if let Err(e) = self.writer.flush() {
            self.fail(&e);
        }
    }

    fn name(&self) -> &str {
        "json_lines_sink"
    }
}
