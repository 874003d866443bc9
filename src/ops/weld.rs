//! Welding coincident vertices.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, TopologyEdit, VertexId};

use super::commit;

/// Largest number of decimals compared by [`delete_duplicate_vertices`].
pub const MAX_PRECISION: usize = 17;

/// Format one coordinate to `precision` decimals, without a sign on zero.
fn format_coordinate(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_owned(),
        _ => s,
    }
}

/// Key under which points that agree to `precision` decimals coincide.
pub(crate) fn geometric_key(p: &Point3<f64>, precision: usize) -> String {
    format!(
        "{},{},{}",
        format_coordinate(p.x, precision),
        format_coordinate(p.y, precision),
        format_coordinate(p.z, precision)
    )
}

/// Merge vertices whose coordinates agree to `precision` decimal digits.
///
/// Each group of coincident vertices is represented by its lowest identifier.
/// Face loops are rewired to the representatives and drop repeated vertices;
/// faces left with fewer than three vertices are removed. The duplicates are
/// removed from the mesh. Vertices without coordinates are never merged.
///
/// Returns the number of vertices removed. Not performed when a rewired loop
/// conflicts with the half-edges of another face.
///
/// # Errors
/// [`MeshError::InvalidParameter`] if `precision` exceeds [`MAX_PRECISION`].
pub fn delete_duplicate_vertices(mesh: &mut HalfEdgeMesh, precision: usize) -> Result<Option<usize>> {
    const OP: &str = "delete_duplicate_vertices";
    if precision > MAX_PRECISION {
        return Err(MeshError::invalid_param(
            "precision",
            precision,
            "at most 17 decimal digits",
        ));
    }
    let mut representative: BTreeMap<String, VertexId> = BTreeMap::new();
    let mut replace: BTreeMap<VertexId, VertexId> = BTreeMap::new();
    for v in mesh.vertex_ids() {
        let Some(p) = mesh.vertex_coordinates(v) else {
            continue;
        };
        let rep = *representative.entry(geometric_key(&p, precision)).or_insert(v);
        if rep != v {
            replace.insert(v, rep);
        }
    }
    if replace.is_empty() {
        return Ok(Some(0));
    }

    let mut edit = TopologyEdit::new(mesh);
    let affected: BTreeSet<_> = replace.keys().flat_map(|&v| mesh.vertex_faces(v)).collect();
    for f in affected {
        let face = mesh.face_ref(f)?;
        let mut seen = BTreeSet::new();
        let vertices: Vec<VertexId> = face
            .vertices
            .iter()
            .map(|v| replace.get(v).copied().unwrap_or(*v))
            .filter(|&v| seen.insert(v))
            .collect();
        if vertices.len() < 3 {
            edit.remove_face(f);
        } else {
            edit.replace_face(f, vertices);
        }
    }
    for &v in replace.keys() {
        edit.remove_vertex(v);
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: removed {} vertices", OP, replace.len());
    Ok(Some(replace.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, Attributes, FaceId};

    #[test]
    fn test_geometric_key() {
        let p = Point3::new(1.00004, -0.00001, 2.5);
        assert_eq!(geometric_key(&p, 3), "1.000,0.000,2.500");
        assert_eq!(geometric_key(&Point3::new(-1.0, 0.0, 0.0), 1), "-1.0,0.0,0.0");
    }

    #[test]
    fn test_weld_two_separate_triangles() {
        // Two triangles sharing an edge, but with their own vertex copies.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.00001, 0.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![3, 4, 5]];
        let mut mesh = build_from_polygons(&vertices, &faces).unwrap();
        assert!(mesh.face_neighbors(FaceId::new(0)).is_empty());

        let removed = delete_duplicate_vertices(&mut mesh, 3).unwrap().unwrap();
        assert_eq!(removed, 2);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.face_neighbors(FaceId::new(0)), vec![FaceId::new(1)]);
        assert_eq!(
            mesh.face_vertices(FaceId::new(1)),
            Some(&[VertexId::new(1), VertexId::new(4), VertexId::new(2)][..])
        );
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_weld_drops_degenerate_faces() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let mut mesh = build_from_polygons(&vertices, &[vec![0, 1, 2]]).unwrap();
        assert_eq!(delete_duplicate_vertices(&mut mesh, 3).unwrap(), Some(1));
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_weld_conflict_not_performed() {
        // Same orientation on the shared edge once welded.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let mut mesh = build_from_polygons(&vertices, &[vec![0, 1, 2], vec![3, 4, 5]]).unwrap();
        let before = mesh.clone();
        assert_eq!(delete_duplicate_vertices(&mut mesh, 3).unwrap(), None);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_weld_precision_limit() {
        let mut mesh = build_from_polygons(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            &[vec![0, 1, 2]],
        )
        .unwrap();
        let before = mesh.clone();
        assert!(matches!(
            delete_duplicate_vertices(&mut mesh, usize::MAX),
            Err(MeshError::InvalidParameter { name: "precision", .. })
        ));
        assert_eq!(mesh, before);
        assert_eq!(delete_duplicate_vertices(&mut mesh, MAX_PRECISION).unwrap(), Some(0));
    }

    #[test]
    fn test_weld_ignores_vertices_without_coordinates() {
        let mut mesh = HalfEdgeMesh::new();
        mesh.add_vertex(Attributes::new());
        mesh.add_vertex(Attributes::new());
        assert_eq!(delete_duplicate_vertices(&mut mesh, 3).unwrap(), Some(0));
        assert_eq!(mesh.num_vertices(), 2);
    }
}
