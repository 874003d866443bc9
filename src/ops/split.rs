//! Edge splitting.

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, TopologyEdit, VertexId};

use super::{check_unit_parameter, commit, edge_vertex_attributes, ensure_edge, insert_after, rejected};

/// Options for [`split_edge`] and [`trimesh_split_edge`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Position of the new vertex along the edge, from `u` (0) to `v` (1).
    pub t: f64,

    /// Whether boundary edges may be split.
    pub allow_boundary: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            t: 0.5,
            allow_boundary: false,
        }
    }
}

impl SplitOptions {
    /// Set the split parameter.
    pub fn with_t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Set whether boundary edges may be split.
    pub fn with_allow_boundary(mut self, allow: bool) -> Self {
        self.allow_boundary = allow;
        self
    }
}

fn check_split(mesh: &HalfEdgeMesh, u: VertexId, v: VertexId, options: &SplitOptions) -> Result<bool> {
    check_unit_parameter("t", options.t)?;
    ensure_edge(mesh, u, v)?;
    Ok(options.allow_boundary || !mesh.is_boundary_edge(u, v))
}

/// Split the edge `{u, v}` by inserting a new vertex into the loops of the
/// faces on both sides. Faces keep their identifiers and grow by one vertex.
///
/// The new vertex is placed at `edge_point(u, v, t)` when both endpoints have
/// coordinates. Boundary edges are only split when `allow_boundary` is set.
///
/// Returns the new vertex.
pub fn split_edge(
    mesh: &mut HalfEdgeMesh,
    u: VertexId,
    v: VertexId,
    options: &SplitOptions,
) -> Result<Option<VertexId>> {
    const OP: &str = "split_edge";
    if !check_split(mesh, u, v, options)? {
        return rejected(OP, format_args!("({:?}, {:?}) is a boundary edge", u, v));
    }

    let mut edit = TopologyEdit::new(mesh);
    let w = edit.new_vertex(edge_vertex_attributes(mesh, u, v, options.t));
    for (a, b) in [(u, v), (v, u)] {
        if let Some(f) = mesh.face_of_halfedge(a, b) {
            let vertices = mesh.face_ref(f)?.vertices.as_slice();
            edit.replace_face(f, insert_after(vertices, a, w));
        }
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: ({:?}, {:?}) at t={} -> {:?}", OP, u, v, options.t, w);
    Ok(Some(w))
}

/// Split the edge `{u, v}` of a triangle mesh.
///
/// Each triangle `(u, v, o)` beside the edge is replaced by `(u, w, o)`, which
/// keeps the identifier and attributes, and a new triangle `(w, v, o)`. Faces
/// beside the edge that are not triangles make the split not performed.
///
/// Returns the new vertex.
pub fn trimesh_split_edge(
    mesh: &mut HalfEdgeMesh,
    u: VertexId,
    v: VertexId,
    options: &SplitOptions,
) -> Result<Option<VertexId>> {
    const OP: &str = "trimesh_split_edge";
    if !check_split(mesh, u, v, options)? {
        return rejected(OP, format_args!("({:?}, {:?}) is a boundary edge", u, v));
    }

    let mut edit = TopologyEdit::new(mesh);
    let w = edit.new_vertex(edge_vertex_attributes(mesh, u, v, options.t));
    for (a, b) in [(u, v), (v, u)] {
        let Some(f) = mesh.face_of_halfedge(a, b) else {
            continue;
        };
        let face = mesh.face_ref(f)?;
        if face.degree() != 3 {
            return rejected(OP, format_args!("{:?} is not a triangle", f));
        }
        let o = mesh.opposite_vertex(a, b)?;
        edit.replace_face(f, vec![a, w, o]);
        edit.add_face(vec![w, b, o], face.attributes.clone());
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: ({:?}, {:?}) at t={} -> {:?}", OP, u, v, options.t, w);
    Ok(Some(w))
}

/// Insert a vertex into both faces of the edge `{u, v}`.
///
/// Without `w`, a new vertex is created at the midpoint of the edge. A given
/// `w` must exist; it is typically isolated. Unlike [`split_edge`] there is no
/// boundary policy. Returns the inserted vertex.
pub fn insert_vertex_on_edge(
    mesh: &mut HalfEdgeMesh,
    u: VertexId,
    v: VertexId,
    w: Option<VertexId>,
) -> Result<Option<VertexId>> {
    const OP: &str = "insert_vertex_on_edge";
    ensure_edge(mesh, u, v)?;

    let mut edit = TopologyEdit::new(mesh);
    let w = match w {
        Some(w) => {
            mesh.ensure_vertex(w)?;
            w
        }
        None => edit.new_vertex(edge_vertex_attributes(mesh, u, v, 0.5)),
    };
    for (a, b) in [(u, v), (v, u)] {
        if let Some(f) = mesh.face_of_halfedge(a, b) {
            let vertices = mesh.face_ref(f)?.vertices.as_slice();
            edit.replace_face(f, insert_after(vertices, a, w));
        }
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: {:?} on ({:?}, {:?})", OP, w, u, v);
    Ok(Some(w))
}
