//! # hemesh
//!
//! A half-edge polygon mesh kernel with topology-preserving local editing
//! operators.
//!
//! hemesh stores a polygon mesh as vertex and face records plus a map from
//! every directed edge to the face that owns it. On top of that store it
//! provides read-only adjacency queries and a set of local operators (edge
//! swap, split and collapse, vertex insertion, face split and merge, vertex
//! substitution, welding and unwelding) that either apply completely or leave
//! the mesh untouched.
//!
//! ## Features
//!
//! - **Stable identifiers**: vertex and face ids are never reused
//! - **Polygon faces**: faces are loops of three or more vertices
//! - **Atomic edits**: every operator validates its whole edit before applying it
//! - **Attributes**: string-keyed attributes on vertices, faces, edges and the mesh
//! - **JSON documents**: lossless round trip including the id high-water marks
//!
//! ## Quick Start
//!
//! ```
//! use hemesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = build_from_triangles(&vertices, &[[0, 1, 3], [1, 2, 3]]).unwrap();
//!
//! // Query adjacency
//! let (u, v) = (VertexId::new(1), VertexId::new(3));
//! assert!(!mesh.is_boundary_edge(u, v));
//! assert_eq!(mesh.opposite_vertex(u, v).unwrap(), VertexId::new(0));
//!
//! // Swap the shared edge
//! let swapped = swap_edge(&mut mesh, (u, v), &SwapOptions::default()).unwrap();
//! assert!(swapped.is_some());
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Operator Results
//!
//! Operators return `Result<Option<T>>`. An `Err` reports a malformed call,
//! such as an unknown vertex. `Ok(None)` means the edit is not legal on the
//! current mesh and nothing was changed.
//!
//! ```
//! use hemesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! let result = swap_edge(&mut mesh, (VertexId::new(0), VertexId::new(1)), &SwapOptions::default());
//! assert!(matches!(result, Ok(None)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;
pub mod ops;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use hemesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, AttrValue, Attributes, Face,
        FaceId, HalfEdgeMesh, TopologyEdit, Vertex, VertexId,
    };
    pub use crate::ops::{
        collapse_edge, split_edge, swap_edge, trimesh_split_edge, CollapseOptions, SplitOptions,
        SwapOptions,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
