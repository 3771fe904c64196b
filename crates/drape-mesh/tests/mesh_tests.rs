//! Integration tests for drape-mesh.

use drape_mesh::generators::{horizontal_quad_grid, quad_grid};
use drape_mesh::normals::compute_vertex_normals;
use drape_mesh::topology::{Edge, Topology};
use drape_mesh::TriangleMesh;
use drape_math::Vec3;
use drape_types::DrapeError;
use std::collections::HashSet;

// ─── TriangleMesh Tests ───────────────────────────────────────

fn make_single_triangle() -> TriangleMesh {
    TriangleMesh {
        pos_x: vec![0.0, 1.0, 0.0],
        pos_y: vec![0.0, 0.0, 1.0],
        pos_z: vec![0.0, 0.0, 0.0],
        normal_x: vec![0.0, 0.0, 0.0],
        normal_y: vec![0.0, 0.0, 0.0],
        normal_z: vec![1.0, 1.0, 1.0],
        indices: vec![0, 1, 2],
    }
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn position_access() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.position(1), [1.0, 0.0, 0.0]);
    assert_eq!(mesh.triangle(0), [0, 1, 2]);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn validate_catches_inconsistent_lengths() {
    let mut mesh = make_single_triangle();
    mesh.pos_y.push(99.0);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = make_single_triangle();
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_duplicated_triangle() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    assert!(TriangleMesh::from_interleaved(&positions, &[0, 1, 2, 2, 1, 0]).is_err());
}

#[test]
fn validate_catches_repeated_vertex() {
    let mut mesh = make_single_triangle();
    mesh.indices = vec![0, 0, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn from_interleaved_round_trip() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = TriangleMesh::from_interleaved(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.pos_x, vec![0.0, 1.0, 0.0]);
    assert_eq!(mesh.interleaved_positions(), positions);
}

#[test]
fn from_interleaved_rejects_ragged_positions() {
    let result = TriangleMesh::from_interleaved(&[0.0, 1.0], &[]);
    assert!(result.is_err());
}

#[test]
fn write_positions_checks_vertex_count() {
    let mut mesh = quad_grid(1, 1, 1.0, 1.0);
    let lifted: Vec<Vec3> = (0..4).map(|i| mesh.position_vec3(i) + Vec3::Y).collect();
    mesh.write_positions(&lifted).unwrap();
    assert_eq!(mesh.position_vec3(3), lifted[3]);
    assert!(mesh.write_positions(&lifted[..3]).is_err());
}

#[test]
fn mesh_json_round_trip() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.indices, mesh.indices);
    assert!(recovered.validate().is_ok());
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(3, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.validate().is_ok());
}

#[test]
fn quad_grid_top_row_first() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    for i in 0..3 {
        assert!((mesh.pos_y[i] - 0.5).abs() < 1e-6);
    }
    for i in 6..9 {
        assert!((mesh.pos_y[i] + 0.5).abs() < 1e-6);
    }
}

#[test]
fn horizontal_grid_is_flat_at_elevation() {
    let mesh = horizontal_quad_grid(4, 4, 1.0, 1.0, 2.0);
    assert!(mesh.pos_y.iter().all(|&y| (y - 2.0).abs() < 1e-6));
    // Normals point along ±Y
    for i in 0..mesh.vertex_count() {
        assert!((mesh.normal_vec3(i).y.abs() - 1.0).abs() < 1e-5);
    }
}

// ─── Normals Tests ────────────────────────────────────────────

#[test]
fn normals_of_flat_grid_are_unit_z() {
    let mut mesh = quad_grid(2, 2, 1.0, 1.0);
    mesh.normal_z.iter_mut().for_each(|n| *n = 0.0);
    compute_vertex_normals(&mut mesh);
    for i in 0..mesh.vertex_count() {
        let n = mesh.normal_vec3(i);
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.z - 1.0).abs() < 1e-5);
    }
}

// ─── Edge Tests ───────────────────────────────────────────────

#[test]
fn edge_equality_ignores_winding_and_opposite() {
    let e1 = Edge::new(3, 7, 1);
    let e2 = Edge::new(7, 3, 9);
    assert_eq!(e1, e2);

    let mut set = HashSet::new();
    assert!(set.insert(e1));
    assert!(!set.insert(e2));
}

#[test]
fn edge_key_is_canonical() {
    assert_eq!(Edge::new(5, 2, 0).key(), (2, 5));
    assert_eq!(Edge::new(2, 5, 0).key(), (2, 5));
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn single_quad_has_five_edges_and_one_hinge() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&mesh).unwrap();

    assert_eq!(topo.edge_count(), 5);
    assert_eq!(topo.bend_count(), 1);

    // Vertices: 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right.
    // Triangles [0, 2, 1] and [1, 2, 3] share the diagonal 1–2.
    let hinge = topo.bend_candidates[0];
    let mut shared = hinge.edge;
    shared.sort();
    assert_eq!(shared, [1, 2]);

    let mut opposite = hinge.opposite;
    opposite.sort();
    assert_eq!(opposite, [0, 3]);
}

#[test]
fn single_quad_boundary() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&mesh).unwrap();
    assert_eq!(topo.boundary_edge_count(), 4);
    assert_eq!(topo.nonmanifold_edge_count(), 0);
    assert!(!topo.is_closed());
}

#[test]
fn single_triangle_has_no_hinges() {
    let topo = Topology::extract(&[0, 1, 2], 3).unwrap();
    assert_eq!(topo.edge_count(), 3);
    assert_eq!(topo.bend_count(), 0);
}

#[test]
fn grid_edge_and_hinge_counts() {
    // cols × rows grid: horizontal + vertical + diagonal edges
    let (cols, rows) = (4, 3);
    let mesh = quad_grid(cols, rows, 1.0, 1.0);
    let topo = Topology::build(&mesh).unwrap();

    let expected_edges = cols * (rows + 1) + rows * (cols + 1) + cols * rows;
    let boundary = 2 * (cols + rows);
    assert_eq!(topo.edge_count(), expected_edges);
    assert_eq!(topo.boundary_edge_count(), boundary);
    assert_eq!(topo.bend_count(), expected_edges - boundary);
}

#[test]
fn edges_are_unique() {
    let mesh = quad_grid(5, 5, 1.0, 1.0);
    let topo = Topology::build(&mesh).unwrap();
    let keys: HashSet<(u32, u32)> = topo.edges.iter().map(Edge::key).collect();
    assert_eq!(keys.len(), topo.edge_count());
}

#[test]
fn hinge_opposites_lie_off_the_shared_edge() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh).unwrap();
    for hinge in &topo.bend_candidates {
        for o in hinge.opposite {
            assert!(!hinge.edge.contains(&o));
        }
        assert_ne!(hinge.opposite[0], hinge.opposite[1]);
    }
}

#[test]
fn extraction_is_deterministic() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let a = Topology::build(&mesh).unwrap();
    let b = Topology::build(&mesh).unwrap();
    assert_eq!(a.stretch_pairs(), b.stretch_pairs());
    assert_eq!(a.bend_candidates, b.bend_candidates);
}

#[test]
fn tetrahedron_is_closed() {
    let indices = [0, 1, 2, 0, 3, 1, 1, 3, 2, 2, 3, 0];
    let topo = Topology::extract(&indices, 4).unwrap();
    assert_eq!(topo.edge_count(), 6);
    assert_eq!(topo.bend_count(), 6);
    assert!(topo.is_closed());
}

#[test]
fn nonmanifold_edge_is_reported_not_rejected() {
    // Three triangles fanned around edge 0–1
    let indices = [0, 1, 2, 1, 0, 3, 0, 1, 4];
    let topo = Topology::extract(&indices, 5).unwrap();
    assert_eq!(topo.nonmanifold_edge_count(), 1);
    assert_eq!(topo.bend_count(), 2);
}

#[test]
fn extract_rejects_out_of_range_index() {
    assert!(Topology::extract(&[0, 1, 5], 3).is_err());
}

#[test]
fn extract_rejects_partial_triangle() {
    assert!(Topology::extract(&[0, 1, 2, 0], 3).is_err());
}

#[test]
fn extract_rejects_duplicated_triangle_in_either_winding() {
    let same_winding = [0, 1, 2, 1, 0, 3, 1, 2, 0];
    let flipped = [0, 1, 2, 1, 0, 3, 0, 2, 1];
    for indices in [same_winding, flipped] {
        let result = Topology::extract(&indices, 4);
        assert!(
            matches!(result, Err(DrapeError::InvalidMesh(_))),
            "{indices:?} accepted"
        );
    }
}
