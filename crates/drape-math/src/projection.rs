//! Distance constraint projection kernel.
//!
//! This is the per-constraint body of a stretch projection. The solver's
//! direct path and every color-batch dispatcher call the same function so
//! all backends agree bit for bit.

use glam::Vec3;

use drape_types::constants::EPSILON;

/// Position corrections for a distance constraint between `pa` and `pb`.
///
/// Moves the pair toward `rest` along their connecting line, weighted by
/// the inverse masses `wa`, `wb`. Returns `(delta_a, delta_b)`, or `None`
/// when no correction can be computed: both particles fixed, or the
/// points coincide so the direction is undefined.
///
/// Applied in isolation, one correction restores the rest length exactly.
#[inline]
pub fn distance_correction(pa: Vec3, pb: Vec3, wa: f32, wb: f32, rest: f32) -> Option<(Vec3, Vec3)> {
    let w = wa + wb;
    if w <= 0.0 {
        return None;
    }

    let d = pa - pb;
    let len = d.length();
    if len < EPSILON {
        return None;
    }

    let correction = d * ((len - rest) / (len * w));
    Some((-wa * correction, wb * correction))
}
