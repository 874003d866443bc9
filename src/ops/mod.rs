//! Local editing operators.
//!
//! Each operator inspects the mesh through the query layer, decides whether
//! the edit is legal, and commits it as a single [`TopologyEdit`]. Results
//! follow one convention:
//!
//! - `Err(_)`: the call was malformed (unknown vertex, face or edge, or a bad
//!   parameter),
//! - `Ok(None)`: the edit is not legal on this mesh and was not performed,
//! - `Ok(Some(_))`: the edit was applied.
//!
//! A call that does not return `Ok(Some(_))` leaves the mesh unchanged.
//!
//! # Example
//!
//! ```
//! use hemesh::prelude::*;
//! use hemesh::ops::{swap_edge, SwapOptions};
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
//! let (a, b) = swap_edge(&mut mesh, (VertexId::new(1), VertexId::new(3)), &SwapOptions::default())
//!     .unwrap()
//!     .expect("interior edge between two triangles");
//! assert_eq!(mesh.face_vertices(a).unwrap().len(), 3);
//! assert!(mesh.has_edge(VertexId::new(0), VertexId::new(2)));
//! # let _ = b;
//! ```

mod collapse;
mod flip;
mod insert;
mod merge;
mod split;
mod substitute;
mod swap;
mod unweld;
mod weld;

pub use collapse::{collapse_edge, CollapseOptions};
pub use flip::flip_cycles;
pub use insert::{add_vertex_to_face_edge, split_face};
pub use merge::merge_faces;
pub use split::{insert_vertex_on_edge, split_edge, trimesh_split_edge, SplitOptions};
pub use substitute::substitute_vertex_in_faces;
pub use swap::{swap_edge, SwapOptions};
pub use unweld::{unweld_edges, unweld_vertices};
pub use weld::{delete_duplicate_vertices, MAX_PRECISION};

use crate::error::{MeshError, Result};
use crate::mesh::{Attributes, FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

/// Log a legality failure and report "not performed".
pub(crate) fn rejected<T>(op: &str, why: impl std::fmt::Display) -> Result<Option<T>> {
    log::debug!("{}: not performed, {}", op, why);
    Ok(None)
}

/// Apply an edit, turning loop conflicts into "not performed".
pub(crate) fn commit(
    mesh: &mut HalfEdgeMesh,
    edit: TopologyEdit,
    op: &str,
) -> Result<Option<Vec<FaceId>>> {
    match mesh.check(&edit) {
        Ok(()) => {}
        Err(MeshError::InvalidLoop { reason }) => return rejected(op, reason),
        Err(e) => return Err(e),
    }
    mesh.apply(edit).map(Some)
}

/// Ensure an interpolation parameter lies in `[0, 1]`.
pub(crate) fn check_unit_parameter(name: &'static str, t: f64) -> Result<()> {
    if (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(MeshError::invalid_param(name, t, "must be in [0, 1]"))
    }
}

/// Ensure `{u, v}` is an edge between existing vertices.
pub(crate) fn ensure_edge(mesh: &HalfEdgeMesh, u: VertexId, v: VertexId) -> Result<()> {
    mesh.ensure_vertex(u)?;
    mesh.ensure_vertex(v)?;
    if mesh.has_edge(u, v) {
        Ok(())
    } else {
        Err(MeshError::UnknownEdge { u, v })
    }
}

/// Attributes for a vertex placed at parameter `t` along `u -> v`.
pub(crate) fn edge_vertex_attributes(mesh: &HalfEdgeMesh, u: VertexId, v: VertexId, t: f64) -> Attributes {
    mesh.edge_point(u, v, t)
        .map(|p| Attributes::from_point(&p))
        .unwrap_or_default()
}

/// Insert `w` right after `after` in a loop.
pub(crate) fn insert_after(vertices: &[VertexId], after: VertexId, w: VertexId) -> Vec<VertexId> {
    let mut out = Vec::with_capacity(vertices.len() + 1);
    for &x in vertices {
        out.push(x);
        if x == after {
            out.push(w);
        }
    }
    out
}
