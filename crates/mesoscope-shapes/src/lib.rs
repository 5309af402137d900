//! Procedural convex-body meshes for mesoscope-rs.
//!
//! Every supported particle shape is generated as a latitude/longitude grid
//! of points derived from a sampled unit sphere:
//! - [`sampler`] builds, mirrors and rolls spherical grids
//! - [`shape`] holds the closed catalog of particle shapes
//! - [`triangulate`] turns a grid into a flat [`Mesh`]
//! - [`ComplexityTable`] maps a level of detail to a sample count

// Graphics code intentionally uses casts for indices and sample counts
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod complexity;
pub mod grid;
pub mod mesh;
pub mod sampler;
pub mod shape;
pub mod triangulate;

pub use complexity::ComplexityTable;
pub use grid::{NormalGrid, VertexGrid};
pub use mesh::{Mesh, MeshVertex};
pub use shape::{Shape, ShapeGeometry, ShapeKind, ShapeSpec};
pub use triangulate::{geometric_normals, triangulate, weld, WeldedMesh};
