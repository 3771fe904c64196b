//! Edge topology extraction.
//!
//! Walks the triangle index buffer once and derives everything the solver
//! builds constraints from: the unique undirected edges (one stretch
//! constraint each) and the hinges formed by two triangles sharing an edge
//! (one bend constraint each).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use drape_types::DrapeResult;

use crate::mesh::{validate_indices, TriangleMesh};

/// An undirected mesh edge annotated with the opposite vertex of the
/// triangle that produced it.
///
/// Equality and hashing only look at the unordered endpoint pair, so
/// `(a, b)` and `(b, a)` are the same edge whatever their winding or
/// opposite vertex.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// First endpoint as seen in the producing triangle.
    pub a: u32,
    /// Second endpoint as seen in the producing triangle.
    pub b: u32,
    /// The vertex of the producing triangle not on this edge.
    pub opposite: u32,
}

impl Edge {
    pub fn new(a: u32, b: u32, opposite: u32) -> Self {
        Self { a, b, opposite }
    }

    /// Canonical `(min, max)` endpoint pair.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        if self.a < self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    /// Endpoints in the order they were first seen.
    #[inline]
    pub fn endpoints(&self) -> [u32; 2] {
        [self.a, self.b]
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Two triangles hinged on a shared edge.
///
/// ```text
///        x2
///       /  \
///     x0 ── x1
///       \  /
///        x3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BendCandidate {
    /// Shared edge endpoints `[x0, x1]`.
    pub edge: [u32; 2],
    /// Opposite vertices `[x2, x3]`: the later triangle's first, then the
    /// one stored with the edge's first sighting.
    pub opposite: [u32; 2],
}

impl BendCandidate {
    /// The four hinge vertices in `[x0, x1, x2, x3]` order.
    #[inline]
    pub fn vertices(&self) -> [u32; 4] {
        [self.edge[0], self.edge[1], self.opposite[0], self.opposite[1]]
    }
}

/// Edge topology of a triangle mesh.
///
/// Built once when a body is initialized. Output order is deterministic:
/// edges appear in first-sighting order, hinges in the order their second
/// triangle was visited.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Unique edges, each carrying the opposite vertex of its first triangle.
    pub edges: Vec<Edge>,

    /// How many triangles referenced each edge (parallel to `edges`).
    /// Boundary edges have 1, interior manifold edges 2.
    pub edge_sightings: Vec<u32>,

    /// One hinge per repeated edge sighting.
    pub bend_candidates: Vec<BendCandidate>,

    /// Number of vertices the index buffer was validated against.
    pub vertex_count: usize,
}

impl Topology {
    /// Extract edges and hinges from a flat triangle index buffer.
    ///
    /// Fails with [`DrapeError::InvalidMesh`](drape_types::DrapeError::InvalidMesh)
    /// if the buffer is malformed. Manifoldness is not enforced: an edge
    /// shared by three or more triangles yields one hinge per extra
    /// triangle, each paired with the first triangle's opposite vertex.
    pub fn extract(indices: &[u32], vertex_count: usize) -> DrapeResult<Self> {
        validate_indices(indices, vertex_count)?;

        let mut lookup: HashMap<Edge, usize> = HashMap::with_capacity(indices.len());
        let mut edges: Vec<Edge> = Vec::with_capacity(indices.len());
        let mut edge_sightings: Vec<u32> = Vec::with_capacity(indices.len());
        let mut bend_candidates: Vec<BendCandidate> = Vec::new();

        for tri in indices.chunks_exact(3) {
            for j in 0..3 {
                let edge = Edge::new(tri[j], tri[(j + 1) % 3], tri[(j + 2) % 3]);

                match lookup.entry(edge) {
                    Entry::Vacant(slot) => {
                        slot.insert(edges.len());
                        edges.push(edge);
                        edge_sightings.push(1);
                    }
                    Entry::Occupied(slot) => {
                        let first = *slot.get();
                        edge_sightings[first] += 1;
                        bend_candidates.push(BendCandidate {
                            edge: edge.endpoints(),
                            opposite: [edge.opposite, edges[first].opposite],
                        });
                    }
                }
            }
        }

        let topology = Self {
            edges,
            edge_sightings,
            bend_candidates,
            vertex_count,
        };

        let nonmanifold = topology.nonmanifold_edge_count();
        if nonmanifold > 0 {
            tracing::warn!(
                edges = nonmanifold,
                "mesh has edges shared by more than two triangles"
            );
        }

        Ok(topology)
    }

    /// Extract the topology of a mesh.
    pub fn build(mesh: &TriangleMesh) -> DrapeResult<Self> {
        Self::extract(&mesh.indices, mesh.vertex_count())
    }

    /// Number of unique edges (= number of stretch constraints).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of hinges (= number of bend constraints).
    pub fn bend_count(&self) -> usize {
        self.bend_candidates.len()
    }

    /// Endpoint pairs of every unique edge, in edge order.
    pub fn stretch_pairs(&self) -> Vec<[u32; 2]> {
        self.edges.iter().map(Edge::endpoints).collect()
    }

    /// Returns the number of boundary edges (edges with only 1 adjacent triangle).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_sightings.iter().filter(|&&s| s == 1).count()
    }

    /// Returns the number of edges referenced by more than two triangles.
    pub fn nonmanifold_edge_count(&self) -> usize {
        self.edge_sightings.iter().filter(|&&s| s > 2).count()
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}
