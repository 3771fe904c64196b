//! Triangle geometry helpers used when building constraints.

use glam::Vec3;

/// Area of triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}

/// Cotangent of the angle between `u` and `v`.
///
/// Returns `None` when the vectors are parallel or either is zero,
/// where the cotangent is unbounded.
#[inline]
pub fn cotangent(u: Vec3, v: Vec3) -> Option<f32> {
    let sin_scaled = u.cross(v).length();
    if sin_scaled <= f32::EPSILON * u.length() * v.length() {
        return None;
    }
    Some(u.dot(v) / sin_scaled)
}

/// Cotangent of the interior angle at `apex` in triangle `(apex, p, q)`.
#[inline]
pub fn interior_cotangent(apex: Vec3, p: Vec3, q: Vec3) -> Option<f32> {
    cotangent(p - apex, q - apex)
}
