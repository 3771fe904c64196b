//! # drape-mesh
//!
//! Triangle mesh representation with Structure-of-Arrays (SoA) layout,
//! plus the edge topology the solver builds its constraints from.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`]: Positions, normals and the triangle index buffer.
//!   Also the render-facing object a body writes its state into.
//! - [`Topology`]: Unique edges, bend hinges and boundary queries.
//! - Procedural generators for test and scenario meshes (quad grids).

pub mod generators;
pub mod mesh;
pub mod normals;
pub mod topology;

pub use mesh::TriangleMesh;
pub use topology::{BendCandidate, Edge, Topology};
