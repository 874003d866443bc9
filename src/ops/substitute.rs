//! Vertex substitution in face loops.

use crate::error::Result;
use crate::mesh::{FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{commit, rejected};

/// Replace `old` by `new` in the loops of the given faces, or of every face
/// around `old` when `faces` is `None`. Faces keep their identifiers.
///
/// Listed faces that do not contain `old` are left alone. Returns the faces
/// that changed. Not performed when a loop would repeat `new` or claim a
/// half-edge owned by another face.
pub fn substitute_vertex_in_faces(
    mesh: &mut HalfEdgeMesh,
    old: VertexId,
    new: VertexId,
    faces: Option<&[FaceId]>,
) -> Result<Option<Vec<FaceId>>> {
    const OP: &str = "substitute_vertex_in_faces";
    mesh.ensure_vertex(old)?;
    mesh.ensure_vertex(new)?;
    if old == new {
        return rejected(OP, format_args!("{:?} substituted by itself", old));
    }

    let faces: Vec<FaceId> = match faces {
        Some(faces) => faces.to_vec(),
        None => mesh.vertex_faces(old).collect(),
    };

    let mut edit = TopologyEdit::new(mesh);
    let mut changed = Vec::new();
    for f in faces {
        let face = mesh.face_ref(f)?;
        if face.position_of(old).is_none() {
            continue;
        }
        let vertices = face
            .vertices
            .iter()
            .map(|&x| if x == old { new } else { x })
            .collect();
        edit.replace_face(f, vertices);
        changed.push(f);
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: {:?} -> {:?} in {} faces", OP, old, new, changed.len());
    Ok(Some(changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Attributes;
    use crate::ops::fixtures::{two_triangles, vid};

    #[test]
    fn test_substitute_all_faces() {
        let mut mesh = two_triangles();
        let w = mesh.add_vertex(Attributes::new());
        let changed = substitute_vertex_in_faces(&mut mesh, vid(3), w, None)
            .unwrap()
            .unwrap();

        assert_eq!(changed, vec![FaceId::new(0), FaceId::new(1)]);
        assert_eq!(mesh.vertex_degree(vid(3)), 0);
        assert!(mesh.has_edge(vid(1), w));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_substitute_selected_face() {
        let mut mesh = two_triangles();
        let w = mesh.add_vertex(Attributes::new());
        let changed = substitute_vertex_in_faces(&mut mesh, vid(3), w, Some(&[FaceId::new(1)]))
            .unwrap()
            .unwrap();

        assert_eq!(changed, vec![FaceId::new(1)]);
        assert_eq!(mesh.face_vertices(FaceId::new(1)), Some(&[vid(1), vid(2), w][..]));
        // The faces no longer share the edge (1, 3).
        assert!(mesh.is_boundary_edge(vid(1), vid(3)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_substitute_repeating_vertex_not_performed() {
        let mut mesh = two_triangles();
        let before = mesh.clone();
        assert!(substitute_vertex_in_faces(&mut mesh, vid(3), vid(1), None)
            .unwrap()
            .is_none());
        assert!(substitute_vertex_in_faces(&mut mesh, vid(3), vid(3), None)
            .unwrap()
            .is_none());
        assert_eq!(mesh, before);
    }
}
