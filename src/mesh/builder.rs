//! Mesh construction utilities.
//!
//! This module provides functions for building half-edge meshes from
//! face-vertex lists, and for flattening a mesh back into one. Vertex `i` of
//! the input list becomes `VertexId(i)` and face `j` becomes `FaceId(j)`.

use std::collections::BTreeMap;

use nalgebra::Point3;

use super::attributes::Attributes;
use super::halfedge::HalfEdgeMesh;
use super::index::VertexId;
use crate::error::Result;

/// Build a half-edge mesh from vertex positions and polygon faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each as a loop of vertex indices
///
/// # Returns
/// A half-edge mesh, or an error if a face is invalid. Faces are added in
/// order and the first invalid one is reported.
///
/// # Example
/// ```
/// use hemesh::mesh::build_from_polygons;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_polygons(vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<HalfEdgeMesh> {
    let attributes: Vec<Attributes> = vertices.iter().map(Attributes::from_point).collect();
    HalfEdgeMesh::from_vertices_and_faces(&attributes, faces)
}

/// Build a half-edge mesh from vertex positions and triangle faces.
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<HalfEdgeMesh> {
    let faces: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &faces)
}

/// Convert a half-edge mesh back to face-vertex representation.
///
/// Vertices are renumbered densely in identifier order. Vertices without
/// coordinates are placed at the origin.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let (_, faces) = mesh.to_vertices_and_faces();
    let positions = mesh
        .vertex_ids()
        .map(|v| mesh.vertex_coordinates(v).unwrap_or_else(Point3::origin))
        .collect();
    (positions, faces)
}

impl HalfEdgeMesh {
    /// Build a mesh from per-vertex attributes and face loops given as indices
    /// into the vertex list.
    pub fn from_vertices_and_faces(vertices: &[Attributes], faces: &[Vec<usize>]) -> Result<Self> {
        let mut mesh = Self::new();
        let ids: Vec<VertexId> = vertices.iter().map(|a| mesh.add_vertex(a.clone())).collect();

        for face in faces {
            let loop_: Vec<VertexId> = face
                .iter()
                .map(|&i| ids.get(i).copied().unwrap_or(VertexId::new(i)))
                .collect();
            mesh.add_face(&loop_, Attributes::new())?;
        }
        Ok(mesh)
    }

    /// Build a mesh from vertex positions and face loops.
    pub fn from_polygons(vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<Self> {
        build_from_polygons(vertices, faces)
    }

    /// Flatten the mesh into vertex attributes and index loops, renumbering
    /// vertices densely in identifier order.
    pub fn to_vertices_and_faces(&self) -> (Vec<Attributes>, Vec<Vec<usize>>) {
        let index: BTreeMap<VertexId, usize> =
            self.vertex_ids().enumerate().map(|(i, v)| (v, i)).collect();
        let vertices = self.vertices().map(|(_, v)| v.attributes.clone()).collect();
        let faces = self
            .faces()
            .map(|(_, f)| f.vertices.iter().map(|v| index[v]).collect())
            .collect();
        (vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Two triangles sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert!(mesh.is_valid());

        // All vertices should be on boundary
        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        // 6 owned half-edges, one interior edge and four boundary edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(out_faces, vec![vec![0, 1, 2], vec![1, 0, 3]]);

        // Positions should match
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_renumbers_after_removal() {
        let (vertices, faces) = two_triangles();
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        mesh.delete_vertex(VertexId::new(2)).unwrap();

        let (out_verts, out_faces) = mesh.to_vertices_and_faces();
        assert_eq!(out_verts.len(), 3);
        assert_eq!(out_faces, vec![vec![1, 0, 2]]);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::UnknownVertex(_))));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 1, 1]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::InvalidLoop { .. })));
    }

    #[test]
    fn test_inconsistent_orientation() {
        let (vertices, _) = two_triangles();
        // Both faces traverse 0 -> 1.
        let faces = vec![[0, 1, 2], [0, 1, 3]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::InvalidLoop { .. })));
    }
}
