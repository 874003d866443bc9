//! Face merging.

use std::collections::BTreeSet;

use crate::error::{MeshError, Result};
use crate::mesh::{loop_halfedges, FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{commit, rejected};

/// Join two loops across the chain of edges they share.
///
/// Returns `None` unless the shared edges form one contiguous chain that does
/// not cover either loop entirely.
fn join_loops(a: &[VertexId], b: &[VertexId]) -> Option<Vec<VertexId>> {
    let b_edges: BTreeSet<(VertexId, VertexId)> = loop_halfedges(b).collect();
    let n = a.len();
    let shared: Vec<bool> = loop_halfedges(a)
        .map(|(x, y)| b_edges.contains(&(y, x)))
        .collect();
    let count = shared.iter().filter(|&&s| s).count();
    if count == 0 || count >= n || count >= b.len() {
        return None;
    }

    // First shared edge of the chain: shared, with its predecessor not shared.
    let start = (0..n).find(|&i| shared[i] && !shared[(i + n - 1) % n])?;
    if (0..count).any(|k| !shared[(start + k) % n]) {
        return None;
    }

    // The chain runs a[start] -> .. -> a[start + count]. Keep a from the chain
    // end around to the chain start, then b from the chain start to its end.
    let chain_start = a[start];
    let chain_end = a[(start + count) % n];
    let mut merged: Vec<VertexId> = (0..=n - count)
        .map(|k| a[(start + count + k) % n])
        .collect();

    let m = b.len();
    let j = b.iter().position(|&x| x == chain_start)?;
    let mut k = 1;
    while b[(j + k) % m] != chain_end {
        merged.push(b[(j + k) % m]);
        k += 1;
        if k > m {
            return None;
        }
    }
    Some(merged)
}

/// Merge faces into one.
///
/// Faces are absorbed one at a time into the growing loop, each time picking
/// the next listed face that shares a contiguous chain of edges with it.
/// Vertices inside a shared chain are dropped from the loop and left in the
/// mesh. The merged face gets a fresh identifier and the attributes of the
/// first face.
///
/// Not performed when some face cannot be attached, or when the merged loop
/// would repeat a vertex.
///
/// # Errors
/// [`MeshError::UnknownFace`] for an unknown face and
/// [`MeshError::InvalidParameter`] for fewer than two or repeated faces.
pub fn merge_faces(mesh: &mut HalfEdgeMesh, faces: &[FaceId]) -> Result<Option<FaceId>> {
    const OP: &str = "merge_faces";
    let distinct: BTreeSet<FaceId> = faces.iter().copied().collect();
    if faces.len() < 2 || distinct.len() != faces.len() {
        return Err(MeshError::invalid_param(
            "faces",
            faces.len(),
            "need at least two distinct faces",
        ));
    }
    for &f in faces {
        mesh.face_ref(f)?;
    }

    let first = mesh.face_ref(faces[0])?;
    let attributes = first.attributes.clone();
    let mut merged = first.vertices.clone();
    let mut pending: Vec<FaceId> = faces[1..].to_vec();

    while !pending.is_empty() {
        let mut attached = None;
        for (i, &f) in pending.iter().enumerate() {
            if let Some(joined) = join_loops(&merged, &mesh.face_ref(f)?.vertices) {
                attached = Some((i, joined));
                break;
            }
        }
        let Some((i, joined)) = attached else {
            return rejected(OP, format_args!("{:?} do not share a single edge chain", pending));
        };
        pending.remove(i);
        merged = joined;
    }

    let mut edit = TopologyEdit::new(mesh);
    for &f in faces {
        edit.remove_face(f);
    }
    edit.add_face(merged, attributes);

    let Some(added) = commit(mesh, edit, OP)? else {
        return Ok(None);
    };
    log::debug!("{}: {:?} -> {:?}", OP, faces, added[0]);
    Ok(Some(added[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{quad_grid, two_triangles, vid};

    #[test]
    fn test_merge_two_triangles() {
        let mut mesh = two_triangles();
        let f = merge_faces(&mut mesh, &[FaceId::new(0), FaceId::new(1)])
            .unwrap()
            .unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_vertices(f), Some(&[vid(3), vid(0), vid(1), vid(2)][..]));
        assert!(!mesh.has_edge(vid(1), vid(3)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_merge_quad_row() {
        let mut mesh = quad_grid(2);
        let f = merge_faces(&mut mesh, &[FaceId::new(0), FaceId::new(1)])
            .unwrap()
            .unwrap();
        assert_eq!(mesh.face_degree(f), Some(6));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_merge_ring_drops_chain_vertex() {
        // All four quads around the center vertex: the last merge shares two edges.
        let mut mesh = quad_grid(2);
        let faces: Vec<FaceId> = (0..4).map(FaceId::new).collect();
        let f = merge_faces(&mut mesh, &faces).unwrap().unwrap();

        assert_eq!(mesh.face_degree(f), Some(8));
        assert!(!mesh.face(f).unwrap().vertices.contains(&vid(4)));
        assert_eq!(mesh.vertex_degree(vid(4)), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_merge_disjoint_not_performed() {
        let mut mesh = quad_grid(2);
        let before = mesh.clone();
        // Diagonal quads only share a vertex.
        assert!(merge_faces(&mut mesh, &[FaceId::new(0), FaceId::new(3)])
            .unwrap()
            .is_none());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_merge_bad_input() {
        let mut mesh = quad_grid(2);
        assert!(merge_faces(&mut mesh, &[FaceId::new(0)]).is_err());
        assert!(merge_faces(&mut mesh, &[FaceId::new(0), FaceId::new(0)]).is_err());
        assert!(matches!(
            merge_faces(&mut mesh, &[FaceId::new(0), FaceId::new(9)]),
            Err(MeshError::UnknownFace(_))
        ));
    }

    #[test]
    fn test_join_loops_chain() {
        let v = |i: usize| VertexId::new(i);
        // Two quads sharing the chain 1 -> 2 -> 3 (reversed in the second).
        let a = [v(0), v(1), v(2), v(3)];
        let b = [v(3), v(2), v(1), v(4)];
        assert_eq!(join_loops(&a, &b), Some(vec![v(3), v(0), v(1), v(4)]));
        assert_eq!(join_loops(&a, &[v(5), v(6), v(7)]), None);
    }
}
