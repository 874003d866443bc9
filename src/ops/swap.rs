//! Edge swap (flip) for triangle pairs.

use crate::error::Result;
use crate::mesh::{Attributes, FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{commit, ensure_edge, rejected};

/// Options for [`swap_edge`].
#[derive(Debug, Clone)]
pub struct SwapOptions {
    /// Whether edges touching the boundary may be swapped.
    pub allow_boundary: bool,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            allow_boundary: true,
        }
    }
}

impl SwapOptions {
    /// Set whether edges touching the boundary may be swapped.
    pub fn with_allow_boundary(mut self, allow: bool) -> Self {
        self.allow_boundary = allow;
        self
    }
}

/// Replace the edge `{u, v}` shared by two triangles with the edge between
/// their opposite vertices.
///
/// With `o_uv` the apex of the face owning `(u, v)` and `o_vu` the apex of the
/// face owning `(v, u)`, the two faces are removed and
/// `(o_uv, o_vu, v)` and `(o_vu, o_uv, u)` are added, in that order. Returns
/// the identifiers of the two new faces.
///
/// The swap is not performed when:
/// - the edge lies on the boundary (both endpoints are boundary vertices and
///   only one side of the edge has a face),
/// - `allow_boundary` is false and either endpoint is a boundary vertex,
/// - the two apexes coincide or are already joined by an edge,
/// - either face is not a triangle.
///
/// # Errors
/// [`MeshError::UnknownVertex`](crate::error::MeshError::UnknownVertex) or
/// [`MeshError::UnknownEdge`](crate::error::MeshError::UnknownEdge) if the
/// edge does not exist.
pub fn swap_edge(
    mesh: &mut HalfEdgeMesh,
    (u, v): (VertexId, VertexId),
    options: &SwapOptions,
) -> Result<Option<(FaceId, FaceId)>> {
    const OP: &str = "swap_edge";
    ensure_edge(mesh, u, v)?;

    let u_on_boundary = mesh.is_boundary_vertex(u);
    let v_on_boundary = mesh.is_boundary_vertex(v);
    let (face_uv, face_vu) = mesh.edge_faces(u, v);

    if u_on_boundary && v_on_boundary && (face_uv.is_none() || face_vu.is_none()) {
        return rejected(OP, format_args!("({:?}, {:?}) is a boundary edge", u, v));
    }
    if !options.allow_boundary && (u_on_boundary || v_on_boundary) {
        return rejected(OP, format_args!("({:?}, {:?}) touches the boundary", u, v));
    }
    let (Some(face_uv), Some(face_vu)) = (face_uv, face_vu) else {
        return rejected(OP, format_args!("({:?}, {:?}) has a single face", u, v));
    };

    let o_uv = mesh.opposite_vertex(u, v)?;
    let o_vu = mesh.opposite_vertex(v, u)?;
    if o_uv == o_vu || mesh.has_edge(o_uv, o_vu) {
        return rejected(OP, format_args!("{:?} and {:?} are already connected", o_uv, o_vu));
    }
    if mesh.face_degree(face_uv) != Some(3) || mesh.face_degree(face_vu) != Some(3) {
        return rejected(OP, format_args!("{:?} or {:?} is not a triangle", face_uv, face_vu));
    }

    let mut edit = TopologyEdit::new(mesh);
    edit.remove_face(face_uv)
        .remove_face(face_vu)
        .add_face(vec![o_uv, o_vu, v], Attributes::new())
        .add_face(vec![o_vu, o_uv, u], Attributes::new());

    let Some(added) = commit(mesh, edit, OP)? else {
        return Ok(None);
    };
    log::debug!("{}: ({:?}, {:?}) -> ({:?}, {:?})", OP, u, v, o_uv, o_vu);
    Ok(Some((added[0], added[1])))
}
