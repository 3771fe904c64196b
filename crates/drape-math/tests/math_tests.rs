//! Integration tests for drape-math.

use drape_math::dof::{add_vec3, read_vec3, write_vec3};
use drape_math::geometry::{cotangent, interior_cotangent, triangle_area};
use drape_math::projection::distance_correction;
use drape_math::Vec3;

// ─── Geometry Tests ───────────────────────────────────────────

#[test]
fn unit_right_triangle_area() {
    let a = triangle_area(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert!((a - 0.5).abs() < 1e-6);
}

#[test]
fn collinear_triangle_has_zero_area() {
    let a = triangle_area(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
    assert!(a.abs() < 1e-9);
}

#[test]
fn cotangent_of_right_angle_is_zero() {
    let c = cotangent(Vec3::X, Vec3::Y).unwrap();
    assert!(c.abs() < 1e-6);
}

#[test]
fn cotangent_of_45_degrees_is_one() {
    let c = cotangent(Vec3::X, Vec3::new(1.0, 1.0, 0.0)).unwrap();
    assert!((c - 1.0).abs() < 1e-5);
}

#[test]
fn cotangent_of_parallel_vectors_is_undefined() {
    assert!(cotangent(Vec3::X, Vec3::X * 3.0).is_none());
    assert!(cotangent(Vec3::ZERO, Vec3::Y).is_none());
}

#[test]
fn interior_cotangent_equilateral() {
    let h = 3.0f32.sqrt() / 2.0;
    let c = interior_cotangent(Vec3::ZERO, Vec3::X, Vec3::new(0.5, h, 0.0)).unwrap();
    // cot(60°) = 1/√3
    assert!((c - 1.0 / 3.0f32.sqrt()).abs() < 1e-5);
}

// ─── DOF Accessor Tests ───────────────────────────────────────

#[test]
fn dof_read_write_add() {
    let mut buf = vec![0.0f32; 6];
    write_vec3(&mut buf, 3, Vec3::new(1.0, 2.0, 3.0));
    add_vec3(&mut buf, 3, Vec3::new(0.5, 0.5, 0.5));
    assert_eq!(&buf[..3], &[0.0, 0.0, 0.0]);
    assert_eq!(read_vec3(&buf, 3), Vec3::new(1.5, 2.5, 3.5));
}

// ─── Distance Kernel Tests ────────────────────────────────────

#[test]
fn equal_masses_split_the_correction() {
    let pa = Vec3::ZERO;
    let pb = Vec3::new(3.0, 0.0, 0.0);
    let (da, db) = distance_correction(pa, pb, 1.0, 1.0, 1.0).unwrap();

    assert!((da - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    assert!((db - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    assert!((((pa + da) - (pb + db)).length() - 1.0).abs() < 1e-6);
}

#[test]
fn compressed_pair_is_pushed_apart() {
    let pa = Vec3::ZERO;
    let pb = Vec3::new(0.0, 0.5, 0.0);
    let (da, db) = distance_correction(pa, pb, 1.0, 1.0, 1.0).unwrap();
    assert!(da.y < 0.0);
    assert!(db.y > 0.0);
    assert!((((pa + da) - (pb + db)).length() - 1.0).abs() < 1e-6);
}

#[test]
fn both_fixed_gives_no_correction() {
    let r = distance_correction(Vec3::ZERO, Vec3::X * 2.0, 0.0, 0.0, 1.0);
    assert!(r.is_none());
}

#[test]
fn coincident_points_give_no_correction() {
    let r = distance_correction(Vec3::ONE, Vec3::ONE, 1.0, 1.0, 1.0);
    assert!(r.is_none());
}
