//! Fixed-step position-based dynamics loop.
//!
//! Each tick:
//! 1. gather `x`, `v`, `w` and the external force `f` from every body,
//! 2. predict `v += dt · w · f` and `p = x + dt · v`,
//! 3. run `iterations` projection passes over every body's constraints,
//! 4. derive `v = (p - x) / dt` (then damp),
//! 5. commit `x = p` and push the state back into the bodies.
//!
//! Step 2 integrates acceleration: the force buffer holds `m · g`, so it
//! is scaled by the inverse mass `w` before it reaches the velocity. The
//! textbook form `v += dt · f` treats `f` as an acceleration already; the
//! two agree for unit masses and differ otherwise.
//!
//! Each phase change is published as an [`EventKind::Phase`] event. If a
//! tick fails, [`Simulation::phase`] keeps the phase it failed in.

use std::time::Instant;

use drape_gpu::{ColorDispatcher, ComputeBuffer, RayonDispatcher, SequentialDispatcher};
use drape_math::Vec3;
use drape_telemetry::{EventBus, EventKind};
use drape_types::{DrapeError, DrapeResult};

use crate::body::SimulatedBody;
use crate::config::{ProjectionMode, SimulationConfig};

/// Where the loop is within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    Idle,
    Predicting,
    Projecting { iteration: u32 },
    Committing,
}

impl SimulationPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Predicting => "predicting",
            Self::Projecting { .. } => "projecting",
            Self::Committing => "committing",
        }
    }
}

/// Sets `phase` and announces entry into a new phase on `events`.
fn enter_phase(phase: &mut SimulationPhase, next: SimulationPhase, events: Option<&EventBus>, tick: u32) {
    let changed = phase.label() != next.label();
    *phase = next;
    if let (true, Some(bus)) = (changed, events) {
        bus.emit_kind(
            tick,
            EventKind::Phase {
                phase: next.label().to_string(),
            },
        );
    }
}

/// Result of a single `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// False if the tick was skipped because the simulation is paused.
    pub advanced: bool,
    /// Projection passes performed.
    pub iterations: u32,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

/// Global state vectors, one scalar per DOF.
#[derive(Debug, Clone)]
struct StateBuffers {
    /// Committed positions.
    x: ComputeBuffer,
    /// Predicted positions, projected in place.
    p: ComputeBuffer,
    v: ComputeBuffer,
    f: ComputeBuffer,
    /// Inverse masses, repeated per DOF.
    w: ComputeBuffer,
}

impl StateBuffers {
    fn new(dofs: usize) -> Self {
        Self {
            x: ComputeBuffer::zeros(dofs),
            p: ComputeBuffer::zeros(dofs),
            v: ComputeBuffer::zeros(dofs),
            f: ComputeBuffer::zeros(dofs),
            w: ComputeBuffer::zeros(dofs),
        }
    }
}

/// Drives a set of bodies through fixed timesteps.
///
/// ```text
/// let mut sim = Simulation::new(config)?;
/// sim.add_body(Box::new(cloth))?;
/// sim.initialize()?;
/// loop { sim.step()?; }
/// ```
pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Box<dyn SimulatedBody>>,
    dispatcher: Option<Box<dyn ColorDispatcher>>,
    buffers: Option<StateBuffers>,
    events: Option<EventBus>,
    phase: SimulationPhase,
    paused: bool,
    tick: u32,
    sim_time: f64,
}

impl Simulation {
    /// Creates a simulation with the dispatcher selected by
    /// `config.projection`.
    pub fn new(config: SimulationConfig) -> DrapeResult<Self> {
        config.validate()?;

        let dispatcher: Option<Box<dyn ColorDispatcher>> = match config.projection {
            ProjectionMode::Direct => None,
            ProjectionMode::ColoredSequential => Some(Box::new(SequentialDispatcher::new())),
            ProjectionMode::ColoredParallel => Some(Box::new(RayonDispatcher::new())),
        };

        Ok(Self {
            paused: config.start_paused,
            config,
            bodies: Vec::new(),
            dispatcher,
            buffers: None,
            events: None,
            phase: SimulationPhase::Idle,
            tick: 0,
            sim_time: 0.0,
        })
    }

    /// Replaces the dispatcher chosen from the config.
    pub fn with_dispatcher(mut self, dispatcher: Box<dyn ColorDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Routes telemetry events through `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Registers a body. Bodies must be added before `initialize`.
    pub fn add_body(&mut self, body: Box<dyn SimulatedBody>) -> DrapeResult<usize> {
        if self.buffers.is_some() {
            return Err(DrapeError::InvalidConfig(
                "bodies must be added before initialize()".into(),
            ));
        }
        self.bodies.push(body);
        Ok(self.bodies.len() - 1)
    }

    /// Assigns DOF offsets body by body, builds every body's constraints
    /// and allocates the global state vectors.
    ///
    /// Can only be called once: bodies rebuild their rest state from
    /// their render mesh, which holds the committed pose after any tick.
    pub fn initialize(&mut self) -> DrapeResult<()> {
        if self.buffers.is_some() {
            return Err(DrapeError::InvalidConfig(
                "simulation is already initialized".into(),
            ));
        }

        let mut dofs = 0;
        for body in &mut self.bodies {
            body.initialize(dofs)?;
            dofs += body.dof_count();
        }

        if let Some(dispatcher) = self.dispatcher.as_mut() {
            dispatcher.init()?;
        }

        let mut buffers = StateBuffers::new(dofs);
        for body in &self.bodies {
            body.positions(buffers.x.as_mut_slice())?;
        }
        self.buffers = Some(buffers);

        if let Some(bus) = &self.events {
            for body in &self.bodies {
                if let Some(coloring) = body.coloring() {
                    bus.emit_kind(
                        self.tick,
                        EventKind::Coloring {
                            body: body.name().to_string(),
                            classes: coloring.class_count() as u32,
                            constraints: coloring.constraint_count as u32,
                            largest_class: coloring.largest_class() as u32,
                        },
                    );
                }
            }
        }

        tracing::info!(
            bodies = self.bodies.len(),
            particles = dofs / 3,
            dispatcher = self.dispatcher.as_ref().map_or("direct", |d| d.name()),
            dt = self.config.time_step,
            iterations = self.config.iterations,
            "simulation initialized"
        );
        self.flush_events();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.buffers.is_some()
    }

    /// Advances one fixed timestep, or does nothing if paused.
    pub fn step(&mut self) -> DrapeResult<StepResult> {
        if self.buffers.is_none() {
            return Err(DrapeError::NotInitialized("simulation"));
        }

        if self.paused {
            if let Some(bus) = &self.events {
                bus.emit_kind(self.tick, EventKind::Skipped);
            }
            self.flush_events();
            return Ok(StepResult {
                advanced: false,
                iterations: 0,
                wall_time: 0.0,
            });
        }

        let start = Instant::now();
        self.advance()?;
        self.phase = SimulationPhase::Idle;

        let wall_time = start.elapsed().as_secs_f64();
        let iterations = self.config.iterations;
        let kinetic = self.kinetic_energy();

        if let Some(bus) = &self.events {
            bus.emit_kind(self.tick, EventKind::TimestepEnd { iterations, wall_time });
            bus.emit_kind(self.tick, EventKind::Energy { kinetic });
        }
        self.flush_events();

        tracing::debug!(tick = self.tick, sim_time = self.sim_time, kinetic, wall_time, "tick");
        self.tick += 1;
        self.sim_time += self.config.time_step as f64;

        Ok(StepResult {
            advanced: true,
            iterations,
            wall_time,
        })
    }

    fn advance(&mut self) -> DrapeResult<()> {
        let dt = self.config.time_step;
        let gravity = Vec3::from_array(self.config.gravity);
        let Some(buf) = self.buffers.as_mut() else {
            return Err(DrapeError::NotInitialized("simulation"));
        };

        if let Some(bus) = &self.events {
            bus.emit_kind(self.tick, EventKind::TimestepBegin { sim_time: self.sim_time });
        }

        enter_phase(&mut self.phase, SimulationPhase::Predicting, self.events.as_ref(), self.tick);
        buf.f.fill(0.0);
        for body in &self.bodies {
            body.positions(buf.x.as_mut_slice())?;
            body.velocities(buf.v.as_mut_slice())?;
            body.inverse_masses(buf.w.as_mut_slice())?;
            body.accumulate_external_force(gravity, buf.f.as_mut_slice())?;
        }
        buf.v.add_scaled_product(buf.w.as_slice(), buf.f.as_slice(), dt)?;
        buf.p.assign_axpy(buf.x.as_slice(), buf.v.as_slice(), dt)?;

        let dispatcher = self.dispatcher.as_deref();
        for iteration in 0..self.config.iterations {
            enter_phase(
                &mut self.phase,
                SimulationPhase::Projecting { iteration },
                self.events.as_ref(),
                self.tick,
            );
            for body in &self.bodies {
                body.project_constraints(buf.p.as_mut_slice(), dispatcher)?;
            }
            if let Some(bus) = &self.events {
                bus.emit_kind(self.tick, EventKind::ProjectionPass { iteration });
            }
        }

        enter_phase(&mut self.phase, SimulationPhase::Committing, self.events.as_ref(), self.tick);
        let scale = (1.0 - self.config.damping) / dt;
        for ((v, &p), &x) in buf
            .v
            .as_mut_slice()
            .iter_mut()
            .zip(buf.p.as_slice())
            .zip(buf.x.as_slice())
        {
            *v = (p - x) * scale;
        }
        buf.x.copy_from_slice(buf.p.as_slice())?;

        for body in &mut self.bodies {
            body.set_positions(buf.x.as_slice())?;
            body.set_velocities(buf.v.as_slice())?;
            body.update_object_state()?;
        }
        Ok(())
    }

    /// Runs `ticks` steps and returns how many advanced.
    pub fn run(&mut self, ticks: u32) -> DrapeResult<u32> {
        let mut advanced = 0;
        for _ in 0..ticks {
            if self.step()?.advanced {
                advanced += 1;
            }
        }
        Ok(advanced)
    }

    fn flush_events(&mut self) {
        if let Some(bus) = self.events.as_mut() {
            bus.flush();
        }
    }

    /// Flushes and finalizes the event sinks.
    pub fn finish(&mut self) {
        if let Some(bus) = self.events.as_mut() {
            bus.finish();
        }
    }

    /// Flips the paused flag and returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::info!(paused = self.paused, "pause toggled");
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `Idle` between ticks, or the phase the last failed tick stopped in.
    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn timestep(&self) -> f32 {
        self.config.time_step
    }

    /// Ticks advanced so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Simulated time advanced so far (seconds).
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Name of the active dispatcher, or `"direct"`.
    pub fn dispatcher_name(&self) -> &str {
        self.dispatcher.as_ref().map_or("direct", |d| d.name())
    }

    pub fn bodies(&self) -> &[Box<dyn SimulatedBody>] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&dyn SimulatedBody> {
        self.bodies.get(index).map(|b| &**b)
    }

    /// Total number of scalar DOFs over all bodies.
    pub fn dof_count(&self) -> usize {
        self.bodies.iter().map(|b| b.dof_count()).sum()
    }

    /// Committed positions of every particle, interleaved.
    pub fn positions(&self) -> DrapeResult<&[f32]> {
        self.buffers
            .as_ref()
            .map(|b| b.x.as_slice())
            .ok_or(DrapeError::NotInitialized("simulation"))
    }

    /// Committed velocities of every particle, interleaved.
    pub fn velocities(&self) -> DrapeResult<&[f32]> {
        self.buffers
            .as_ref()
            .map(|b| b.v.as_slice())
            .ok_or(DrapeError::NotInitialized("simulation"))
    }

    /// Kinetic energy summed over all bodies.
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }
}
