//! Procedural quad-grid meshes for tests and scenarios.
//!
//! Vertex order is row-major starting at the top-left corner, so the
//! first `cols + 1` vertices are always the edge a hanging sheet is
//! pinned by.

use crate::mesh::TriangleMesh;
use crate::normals::compute_vertex_normals;

/// A flat `cols × rows` quad grid in the XY plane, centered on the origin.
///
/// Spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y;
/// row 0 is at `y = +height/2`. Each quad is split along its
/// top-right/bottom-left diagonal into `[tl, bl, tr]` and `[tr, bl, br]`,
/// which gives every face a `+Z` normal.
///
/// ```
/// use drape_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.triangle_count(), 8);
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: f32, height: f32) -> TriangleMesh {
    let stride = cols + 1;
    let mut mesh = TriangleMesh::with_capacity(stride * (rows + 1), cols * rows * 2);

    let du = width / cols.max(1) as f32;
    let dv = height / rows.max(1) as f32;
    for row in 0..=rows {
        for col in 0..=cols {
            mesh.pos_x.push(col as f32 * du - width * 0.5);
            mesh.pos_y.push(height * 0.5 - row as f32 * dv);
            mesh.pos_z.push(0.0);
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let tl = (row * stride + col) as u32;
            let tr = tl + 1;
            let bl = tl + stride as u32;
            let br = bl + 1;
            mesh.indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }

    compute_vertex_normals(&mut mesh);
    mesh
}

/// The same grid laid flat in the XZ plane at height `elevation`.
///
/// Grid row 0 ends up at `z = +depth/2`. Normals face `-Y` with the
/// inherited winding.
pub fn horizontal_quad_grid(
    cols: usize,
    rows: usize,
    width: f32,
    depth: f32,
    elevation: f32,
) -> TriangleMesh {
    let mut mesh = quad_grid(cols, rows, width, depth);
    let heights = vec![elevation; mesh.vertex_count()];
    mesh.pos_z = std::mem::replace(&mut mesh.pos_y, heights);
    compute_vertex_normals(&mut mesh);
    mesh
}
