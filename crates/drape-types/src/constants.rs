//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.8;

/// Default fixed simulation timestep (seconds).
pub const DEFAULT_DT: f32 = 0.005;

/// Default number of constraint projection passes per timestep.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Default total mass of a cloth body (kg), spread evenly over its particles.
pub const DEFAULT_BODY_MASS: f32 = 1.0;

/// Epsilon for floating-point comparisons and near-zero denominators.
pub const EPSILON: f32 = 1.0e-7;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: f32 = 1.0e-10;

/// Number of scalar degrees of freedom per particle.
pub const DOFS_PER_PARTICLE: usize = 3;
