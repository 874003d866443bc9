//! Single-face loop edits.

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{commit, rejected};

/// Insert the existing vertex `w` into the loop of face `f`, right before
/// loop vertex `v`. Only `f` changes, so the face on the other side of the
/// edge ending at `v` no longer matches it; the operator is meant for
/// stitching faces together one at a time.
///
/// Returns `f`. Not performed when the new loop conflicts with existing
/// half-edges or would repeat `w`.
pub fn add_vertex_to_face_edge(
    mesh: &mut HalfEdgeMesh,
    w: VertexId,
    f: FaceId,
    v: VertexId,
) -> Result<Option<FaceId>> {
    const OP: &str = "add_vertex_to_face_edge";
    mesh.ensure_vertex(w)?;
    let face = mesh.face_ref(f)?;
    let Some(i) = face.position_of(v) else {
        return Err(MeshError::VertexNotInFace { vertex: v, face: f });
    };

    let mut vertices = face.vertices.clone();
    vertices.insert(i, w);
    let mut edit = TopologyEdit::new(mesh);
    edit.replace_face(f, vertices);

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: {:?} before {:?} in {:?}", OP, w, v, f);
    Ok(Some(f))
}

/// Split face `f` along the diagonal from `u` to `v`.
///
/// The face is replaced by two new faces `(u, .., v)` and `(v, .., u)`, both
/// carrying the attributes of `f`. Returns the new faces in that order.
///
/// Not performed when `u` and `v` are the same or adjacent in the loop, or
/// when they are already joined by an edge elsewhere.
///
/// # Errors
/// [`MeshError::VertexNotInFace`] if `u` or `v` is not part of `f`.
pub fn split_face(
    mesh: &mut HalfEdgeMesh,
    f: FaceId,
    u: VertexId,
    v: VertexId,
) -> Result<Option<(FaceId, FaceId)>> {
    const OP: &str = "split_face";
    let face = mesh.face_ref(f)?;
    let i = face
        .position_of(u)
        .ok_or(MeshError::VertexNotInFace { vertex: u, face: f })?;
    let j = face
        .position_of(v)
        .ok_or(MeshError::VertexNotInFace { vertex: v, face: f })?;

    if face.next_of(u) == Some(v) || face.prev_of(u) == Some(v) || u == v {
        return rejected(OP, format_args!("{:?} and {:?} are adjacent in {:?}", u, v, f));
    }
    if mesh.has_edge(u, v) {
        return rejected(OP, format_args!("{:?} and {:?} are already connected", u, v));
    }

    let n = face.degree();
    let walk = |from: usize, to: usize| -> Vec<VertexId> {
        let len = (to + n - from) % n + 1;
        (0..len).map(|k| face.vertices[(from + k) % n]).collect()
    };
    let first = walk(i, j);
    let second = walk(j, i);
    let attributes = face.attributes.clone();

    let mut edit = TopologyEdit::new(mesh);
    edit.remove_face(f)
        .add_face(first, attributes.clone())
        .add_face(second, attributes);

    let Some(added) = commit(mesh, edit, OP)? else {
        return Ok(None);
    };
    log::debug!("{}: {:?} along ({:?}, {:?})", OP, f, u, v);
    Ok(Some((added[0], added[1])))
}
