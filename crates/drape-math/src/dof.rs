//! Accessors for dense DOF vectors.
//!
//! Global state vectors store three consecutive scalars per particle,
//! addressed by the particle's DOF offset.

use glam::Vec3;

/// Reads the 3-vector stored at `offset`.
#[inline]
pub fn read_vec3(buf: &[f32], offset: usize) -> Vec3 {
    Vec3::new(buf[offset], buf[offset + 1], buf[offset + 2])
}

/// Overwrites the 3-vector stored at `offset`.
#[inline]
pub fn write_vec3(buf: &mut [f32], offset: usize, v: Vec3) {
    buf[offset] = v.x;
    buf[offset + 1] = v.y;
    buf[offset + 2] = v.z;
}

/// Adds `dv` to the 3-vector stored at `offset`.
#[inline]
pub fn add_vec3(buf: &mut [f32], offset: usize, dv: Vec3) {
    buf[offset] += dv.x;
    buf[offset + 1] += dv.y;
    buf[offset + 2] += dv.z;
}
