//! Edge collapse.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::mesh::{edge_key, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{check_unit_parameter, commit, ensure_edge, rejected};

/// Options for [`collapse_edge`].
#[derive(Debug, Clone)]
pub struct CollapseOptions {
    /// Where the surviving vertex ends up along the edge, from `u` (0) to `v` (1).
    pub t: f64,

    /// Whether edges touching the boundary may be collapsed.
    pub allow_boundary: bool,

    /// Vertices that must not be moved or removed.
    pub fixed: BTreeSet<VertexId>,
}

impl Default for CollapseOptions {
    fn default() -> Self {
        Self {
            t: 0.5,
            allow_boundary: false,
            fixed: BTreeSet::new(),
        }
    }
}

impl CollapseOptions {
    /// Set the collapse parameter.
    pub fn with_t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Set whether edges touching the boundary may be collapsed.
    pub fn with_allow_boundary(mut self, allow: bool) -> Self {
        self.allow_boundary = allow;
        self
    }

    /// Mark vertices as fixed.
    pub fn with_fixed<I: IntoIterator<Item = VertexId>>(mut self, fixed: I) -> Self {
        self.fixed.extend(fixed);
        self
    }
}

/// Edges of the link of `x`: loop edges of the faces around `x` that avoid
/// `x`, skipping faces that also contain `other`.
fn link_edges(mesh: &HalfEdgeMesh, x: VertexId, other: VertexId) -> BTreeSet<(VertexId, VertexId)> {
    let mut edges = BTreeSet::new();
    for f in mesh.vertex_faces(x) {
        let Some(face) = mesh.face(f) else {
            continue;
        };
        if face.position_of(other).is_some() {
            continue;
        }
        edges.extend(
            face.halfedges()
                .filter(|&(a, b)| a != x && b != x)
                .map(|(a, b)| edge_key(a, b)),
        );
    }
    edges
}

/// Check the link condition: the links of `u` and `v` may only meet in the
/// link of the edge. Every common neighbor must be a vertex of a face
/// containing the edge, and no edge may lie in both links, otherwise the
/// collapse would pinch the surface or fold two faces onto each other.
fn link_condition(mesh: &HalfEdgeMesh, u: VertexId, v: VertexId) -> bool {
    let u_ring: BTreeSet<VertexId> = mesh.neighbors(u).collect();
    let mut edge_face_vertices = BTreeSet::new();
    for f in [mesh.face_of_halfedge(u, v), mesh.face_of_halfedge(v, u)]
        .into_iter()
        .flatten()
    {
        if let Some(vertices) = mesh.face_vertices(f) {
            edge_face_vertices.extend(vertices.iter().copied());
        }
    }
    let vertices_ok = mesh
        .neighbors(v)
        .filter(|w| u_ring.contains(w))
        .all(|w| edge_face_vertices.contains(&w));
    vertices_ok && link_edges(mesh, u, v).is_disjoint(&link_edges(mesh, v, u))
}

/// Collapse the edge `{u, v}` by merging `v` into `u`.
///
/// Triangles containing the edge disappear, larger faces containing it lose
/// `v`, and every other face around `v` is rewired to `u`. `v` is removed.
/// When both vertices have coordinates, `u` moves to `edge_point(u, v, t)`,
/// or stays put when it lies on the boundary. Returns `u`.
///
/// Checks, in order:
/// 1. `t` outside `[0, 1]` is an error,
/// 2. `v` on the boundary while `u` is interior: not performed (collapse the
///    reverse edge instead),
/// 3. `allow_boundary` false and either endpoint on the boundary: not performed,
/// 4. `u` or `v` fixed: not performed,
/// 5. link condition violated: not performed,
/// 6. the rewired faces conflict with the rest of the mesh: not performed.
pub fn collapse_edge(
    mesh: &mut HalfEdgeMesh,
    u: VertexId,
    v: VertexId,
    options: &CollapseOptions,
) -> Result<Option<VertexId>> {
    const OP: &str = "collapse_edge";
    check_unit_parameter("t", options.t)?;
    ensure_edge(mesh, u, v)?;

    let u_on_boundary = mesh.is_boundary_vertex(u);
    let v_on_boundary = mesh.is_boundary_vertex(v);
    if v_on_boundary && !u_on_boundary {
        return rejected(OP, format_args!("{:?} is on the boundary but {:?} is not", v, u));
    }
    if !options.allow_boundary && (u_on_boundary || v_on_boundary) {
        return rejected(OP, format_args!("({:?}, {:?}) touches the boundary", u, v));
    }
    if options.fixed.contains(&u) || options.fixed.contains(&v) {
        return rejected(OP, format_args!("({:?}, {:?}) has a fixed endpoint", u, v));
    }
    if !link_condition(mesh, u, v) {
        return rejected(OP, format_args!("({:?}, {:?}) fails the link condition", u, v));
    }

    let mut loops: BTreeSet<BTreeSet<VertexId>> = BTreeSet::new();
    for f in mesh.vertex_faces(u) {
        let face = mesh.face_ref(f)?;
        if face.position_of(v).is_none() {
            loops.insert(face.vertices.iter().copied().collect());
        }
    }

    let mut edit = TopologyEdit::new(mesh);
    for f in mesh.vertex_faces(v) {
        let face = mesh.face_ref(f)?;
        let vertices: Vec<VertexId> = if face.position_of(u).is_some() {
            if face.next_of(u) != Some(v) && face.prev_of(u) != Some(v) {
                return rejected(OP, format_args!("{:?} contains {:?} and {:?} apart", f, u, v));
            }
            face.vertices.iter().copied().filter(|&x| x != v).collect()
        } else {
            face.vertices
                .iter()
                .map(|&x| if x == v { u } else { x })
                .collect()
        };
        if vertices.len() < 3 {
            edit.remove_face(f);
            continue;
        }
        if !loops.insert(vertices.iter().copied().collect()) {
            return rejected(OP, format_args!("{:?} would duplicate another face", f));
        }
        edit.replace_face(f, vertices);
    }
    edit.remove_vertex(v);

    let position = if u_on_boundary {
        mesh.vertex_coordinates(u)
    } else {
        mesh.edge_point(u, v, options.t)
    };

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    if let Some(p) = position {
        mesh.set_vertex_coordinates(u, &p)?;
    }
    log::debug!("{}: {:?} into {:?}", OP, v, u);
    Ok(Some(u))
}
