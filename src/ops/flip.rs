//! Orientation reversal.

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, TopologyEdit};

/// Reverse the orientation of every face.
///
/// Face identifiers, attributes and edges are kept; only the direction of
/// every loop changes.
pub fn flip_cycles(mesh: &mut HalfEdgeMesh) -> Result<()> {
    let mut edit = TopologyEdit::new(mesh);
    for (f, face) in mesh.faces() {
        let mut vertices = face.vertices.clone();
        vertices.reverse();
        edit.replace_face(f, vertices);
    }
    mesh.apply(edit)?;
    log::debug!("flip_cycles: {} faces", mesh.num_faces());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;
    use crate::ops::fixtures::{two_triangles, vid};

    #[test]
    fn test_flip_cycles() {
        let mut mesh = two_triangles();
        let owner = mesh.face_of_halfedge(vid(0), vid(1));
        mesh.set_edge_attribute(vid(1), vid(3), "crease", true).unwrap();

        flip_cycles(&mut mesh).unwrap();
        assert_eq!(mesh.face_of_halfedge(vid(1), vid(0)), owner);
        assert_eq!(mesh.face_of_halfedge(vid(0), vid(1)), None);
        assert_eq!(
            mesh.face_vertices(FaceId::new(0)),
            Some(&[vid(3), vid(1), vid(0)][..])
        );
        assert!(mesh.edge_attribute(vid(1), vid(3), "crease").is_some());
        assert!(mesh.is_valid());

        flip_cycles(&mut mesh).unwrap();
        assert_eq!(mesh, two_triangles_with_crease());
    }

    fn two_triangles_with_crease() -> HalfEdgeMesh {
        let mut mesh = two_triangles();
        mesh.set_edge_attribute(vid(1), vid(3), "crease", true).unwrap();
        mesh
    }
}
