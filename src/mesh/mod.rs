//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and related types
//! for representing and editing polygon meshes.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which stores faces as vertex loops
//! and records, for every directed edge `(u, v)`, the face that owns it. This
//! gives constant-time lookup of the face on either side of an edge, which is
//! all the local editing operators in [`crate::ops`] need.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//!
//! Identifiers come from a per-mesh [`IdAllocator`] and are never reused.
//!
//! # Construction
//!
//! ```
//! use hemesh::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod allocator;
mod attributes;
mod builder;
mod edit;
mod halfedge;
mod index;
mod query;

pub use allocator::{IdAllocator, MAX_ID};
pub use attributes::{AttrValue, Attributes};
pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex};
pub use edit::TopologyEdit;
pub use halfedge::{Face, HalfEdgeMesh, Vertex};
pub use index::{FaceId, VertexId};
pub use query::VertexFaceIter;

pub(crate) use halfedge::{edge_key, loop_halfedges};
