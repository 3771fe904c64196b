//! Area-weighted vertex normals.

use drape_math::Vec3;

use crate::mesh::TriangleMesh;

/// Recomputes the mesh's vertex normals in place.
///
/// Each face's unnormalized normal (length = twice its area) is added to
/// its three vertices and the sums are normalized, so larger faces weigh
/// more. A vertex touched only by zero-area faces gets a zero normal.
pub fn compute_vertex_normals(mesh: &mut TriangleMesh) {
    let mut acc = vec![Vec3::ZERO; mesh.vertex_count()];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = mesh.position_vec3(a);
        let face = (mesh.position_vec3(b) - pa).cross(mesh.position_vec3(c) - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    let normals = acc.into_iter().map(|n| n.normalize_or_zero());
    mesh.normal_x.clear();
    mesh.normal_y.clear();
    mesh.normal_z.clear();
    for n in normals {
        mesh.normal_x.push(n.x);
        mesh.normal_y.push(n.y);
        mesh.normal_z.push(n.z);
    }
}
