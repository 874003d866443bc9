//! Half-edge mesh data structure.
//!
//! This module provides the adjacency store for polygon meshes. Faces are
//! stored as cyclic vertex loops; half-edges are not separate records but the
//! directed pairs `(u, v)` of consecutive loop vertices.
//!
//! # Structure
//!
//! - Each vertex has an attribute map and a row in the half-edge map
//! - Each face has an ordered vertex loop and an attribute map
//! - The half-edge map stores, for every edge `{u, v}`, two slots `u -> v` and
//!   `v -> u`. A slot holds the face owning that directed half-edge, or `None`
//!   when that side of the edge is open
//!
//! # Boundary Handling
//!
//! An edge with both slots owned is interior; an edge with one open slot is a
//! boundary edge. When the last owner of an edge goes away, both slots are
//! dropped, so every recorded edge has at least one owning face.
//!
//! # Invariants
//!
//! After every public call:
//!
//! 1. every face owns each half-edge of its loop,
//! 2. no half-edge is owned by two faces,
//! 3. every edge is interior (two owners) or boundary (one owner),
//! 4. every loop vertex exists,
//! 5. loops have at least three distinct vertices.
//!
//! [`HalfEdgeMesh::validate`] audits all five.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Point3;

use super::allocator::IdAllocator;
use super::attributes::{AttrValue, Attributes};
use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    /// Explicitly set attributes.
    pub attributes: Attributes,
}

impl Vertex {
    /// Create a vertex with the given attributes.
    pub fn new(attributes: Attributes) -> Self {
        Self { attributes }
    }

    /// Create a vertex at the given coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Attributes::from_point(&Point3::new(x, y, z)))
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// The boundary loop. Treated as circular.
    pub vertices: Vec<VertexId>,

    /// Explicitly set attributes.
    pub attributes: Attributes,
}

impl Face {
    /// Create a face from a loop and attributes.
    pub fn new(vertices: Vec<VertexId>, attributes: Attributes) -> Self {
        Self {
            vertices,
            attributes,
        }
    }

    /// Number of vertices in the loop.
    #[inline]
    pub fn degree(&self) -> usize {
        self.vertices.len()
    }

    /// Position of `v` in the loop.
    #[inline]
    pub fn position_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }

    /// The loop vertex preceding `v`.
    pub fn prev_of(&self, v: VertexId) -> Option<VertexId> {
        let i = self.position_of(v)?;
        let n = self.vertices.len();
        Some(self.vertices[(i + n - 1) % n])
    }

    /// The loop vertex following `v`.
    pub fn next_of(&self, v: VertexId) -> Option<VertexId> {
        let i = self.position_of(v)?;
        Some(self.vertices[(i + 1) % self.vertices.len()])
    }

    /// Iterate over the directed half-edges of the loop.
    pub fn halfedges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        loop_halfedges(&self.vertices)
    }
}

/// Iterate over the directed half-edges `(v[i], v[i + 1 mod n])` of a loop.
pub(crate) fn loop_halfedges(
    vertices: &[VertexId],
) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Canonical key of an undirected edge.
#[inline]
pub(crate) fn edge_key(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// A half-edge mesh for polygon meshes.
///
/// The mesh exclusively owns all vertex, face and adjacency records. Outside
/// the crate it can only be changed through the methods below and the
/// editing operators in [`crate::ops`], which keep the invariants listed in
/// the [module documentation](self).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalfEdgeMesh {
    /// All vertices, by identifier.
    pub(crate) vertices: BTreeMap<VertexId, Vertex>,

    /// All faces, by identifier.
    pub(crate) faces: BTreeMap<FaceId, Face>,

    /// Half-edge ownership, `halfedge[u][v]` is the owner of `(u, v)`.
    pub(crate) halfedge: BTreeMap<VertexId, BTreeMap<VertexId, Option<FaceId>>>,

    /// Attributes of undirected edges, keyed by [`edge_key`].
    pub(crate) edge_data: BTreeMap<(VertexId, VertexId), Attributes>,

    /// Mesh-level attributes.
    pub(crate) attributes: Attributes,

    /// Defaults returned for vertex attributes that were never set.
    pub(crate) default_vertex_attributes: Attributes,

    /// Defaults returned for face attributes that were never set.
    pub(crate) default_face_attributes: Attributes,

    /// Defaults returned for edge attributes that were never set.
    pub(crate) default_edge_attributes: Attributes,

    pub(crate) allocator: IdAllocator,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty mesh whose vertices default to the origin.
    pub fn with_default_coordinates() -> Self {
        let mut mesh = Self::new();
        mesh.default_vertex_attributes
            .set_point(&Point3::new(0.0, 0.0, 0.0));
        mesh
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of owned half-edges.
    pub fn num_halfedges(&self) -> usize {
        self.halfedge
            .values()
            .map(|row| row.values().filter(|slot| slot.is_some()).count())
            .sum()
    }

    /// Get the number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.halfedge.values().map(|row| row.len()).sum::<usize>() / 2
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(&id)
    }

    /// Whether the vertex exists.
    #[inline]
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Whether the face exists.
    #[inline]
    pub fn has_face(&self, id: FaceId) -> bool {
        self.faces.contains_key(&id)
    }

    /// The identifier allocator of this mesh.
    #[inline]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    pub(crate) fn face_ref(&self, id: FaceId) -> Result<&Face> {
        self.faces.get(&id).ok_or(MeshError::UnknownFace(id))
    }

    pub(crate) fn ensure_vertex(&self, id: VertexId) -> Result<()> {
        if self.has_vertex(id) {
            Ok(())
        } else {
            Err(MeshError::UnknownVertex(id))
        }
    }

    // ==================== Attributes ====================

    /// Mesh-level attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Set a mesh-level attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.set(key, value);
    }

    /// All mesh-level attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Defaults for vertex attributes.
    pub fn default_vertex_attributes(&self) -> &Attributes {
        &self.default_vertex_attributes
    }

    /// Defaults for face attributes.
    pub fn default_face_attributes(&self) -> &Attributes {
        &self.default_face_attributes
    }

    /// Defaults for edge attributes.
    pub fn default_edge_attributes(&self) -> &Attributes {
        &self.default_edge_attributes
    }

    /// Set a default vertex attribute.
    pub fn set_default_vertex_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.default_vertex_attributes.set(key, value);
    }

    /// Set a default face attribute.
    pub fn set_default_face_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.default_face_attributes.set(key, value);
    }

    /// Set a default edge attribute.
    pub fn set_default_edge_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.default_edge_attributes.set(key, value);
    }

    /// Vertex attribute, falling back to the vertex defaults.
    pub fn vertex_attribute(&self, v: VertexId, key: &str) -> Option<&AttrValue> {
        let vertex = self.vertices.get(&v)?;
        vertex
            .attributes
            .get(key)
            .or_else(|| self.default_vertex_attributes.get(key))
    }

    /// Set a vertex attribute.
    pub fn set_vertex_attribute(
        &mut self,
        v: VertexId,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let vertex = self.vertices.get_mut(&v).ok_or(MeshError::UnknownVertex(v))?;
        vertex.attributes.set(key, value);
        Ok(())
    }

    /// Face attribute, falling back to the face defaults.
    pub fn face_attribute(&self, f: FaceId, key: &str) -> Option<&AttrValue> {
        let face = self.faces.get(&f)?;
        face.attributes
            .get(key)
            .or_else(|| self.default_face_attributes.get(key))
    }

    /// Set a face attribute.
    pub fn set_face_attribute(
        &mut self,
        f: FaceId,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let face = self.faces.get_mut(&f).ok_or(MeshError::UnknownFace(f))?;
        face.attributes.set(key, value);
        Ok(())
    }

    /// Edge attribute, falling back to the edge defaults.
    pub fn edge_attribute(&self, u: VertexId, v: VertexId, key: &str) -> Option<&AttrValue> {
        if !self.has_edge(u, v) {
            return None;
        }
        self.edge_data
            .get(&edge_key(u, v))
            .and_then(|attrs| attrs.get(key))
            .or_else(|| self.default_edge_attributes.get(key))
    }

    /// Set an edge attribute. Edge attributes are dropped when the edge
    /// disappears from the mesh.
    pub fn set_edge_attribute(
        &mut self,
        u: VertexId,
        v: VertexId,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        if !self.has_edge(u, v) {
            return Err(MeshError::UnknownEdge { u, v });
        }
        self.edge_data
            .entry(edge_key(u, v))
            .or_default()
            .set(key, value);
        Ok(())
    }

    /// Get the coordinates of a vertex from its `x`, `y`, `z` attributes.
    pub fn vertex_coordinates(&self, v: VertexId) -> Option<Point3<f64>> {
        let x = self.vertex_attribute(v, "x")?.as_f64()?;
        let y = self.vertex_attribute(v, "y")?.as_f64()?;
        let z = self.vertex_attribute(v, "z")?.as_f64()?;
        Some(Point3::new(x, y, z))
    }

    /// Set the coordinates of a vertex.
    pub fn set_vertex_coordinates(&mut self, v: VertexId, p: &Point3<f64>) -> Result<()> {
        let vertex = self.vertices.get_mut(&v).ok_or(MeshError::UnknownVertex(v))?;
        vertex.attributes.set_point(p);
        Ok(())
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, attributes: Attributes) -> VertexId {
        let id = self.allocator.next_vertex_id();
        self.insert_vertex_record(id, attributes);
        id
    }

    /// Add a new vertex at the given position.
    pub fn add_vertex_at(&mut self, position: Point3<f64>) -> VertexId {
        self.add_vertex(Attributes::from_point(&position))
    }

    /// Add a vertex under an explicit identifier.
    pub(crate) fn add_vertex_with_id(&mut self, id: VertexId, attributes: Attributes) -> Result<()> {
        if self.has_vertex(id) {
            return Err(MeshError::InvalidData(format!("duplicate vertex {}", id)));
        }
        self.allocator.observe_vertex(id)?;
        self.insert_vertex_record(id, attributes);
        Ok(())
    }

    pub(crate) fn insert_vertex_record(&mut self, id: VertexId, attributes: Attributes) {
        self.vertices.insert(id, Vertex::new(attributes));
        self.halfedge.entry(id).or_default();
    }

    /// Add a face with the given loop and return its ID.
    ///
    /// Fails with [`MeshError::InvalidLoop`] if the loop has fewer than three
    /// vertices, repeats a vertex, or contains a half-edge already owned by
    /// another face, and with [`MeshError::UnknownVertex`] if a loop vertex
    /// does not exist. Nothing is changed on failure.
    pub fn add_face(&mut self, vertices: &[VertexId], attributes: Attributes) -> Result<FaceId> {
        self.check_loop(vertices)?;
        let id = self.allocator.next_face_id();
        self.insert_face_record(id, vertices.to_vec(), attributes);
        Ok(id)
    }

    /// Add a face under an explicit identifier.
    pub(crate) fn add_face_with_id(
        &mut self,
        id: FaceId,
        vertices: &[VertexId],
        attributes: Attributes,
    ) -> Result<()> {
        if self.has_face(id) {
            return Err(MeshError::InvalidData(format!("duplicate face {}", id)));
        }
        self.check_loop(vertices)?;
        self.allocator.observe_face(id)?;
        self.insert_face_record(id, vertices.to_vec(), attributes);
        Ok(())
    }

    pub(crate) fn insert_face_record(&mut self, id: FaceId, vertices: Vec<VertexId>, attributes: Attributes) {
        for (u, v) in loop_halfedges(&vertices) {
            self.set_edge_owner(u, v, Some(id));
        }
        self.faces.insert(id, Face::new(vertices, attributes));
    }

    /// Check that a loop could be added as a new face.
    pub fn check_loop(&self, vertices: &[VertexId]) -> Result<()> {
        if vertices.len() < 3 {
            return Err(MeshError::invalid_loop(format!(
                "loop has {} vertices, at least 3 required",
                vertices.len()
            )));
        }
        let mut seen = BTreeSet::new();
        for &v in vertices {
            self.ensure_vertex(v)?;
            if !seen.insert(v) {
                return Err(MeshError::invalid_loop(format!("vertex {:?} appears twice", v)));
            }
        }
        for (u, v) in loop_halfedges(vertices) {
            if let Some(owner) = self.face_of_halfedge(u, v) {
                return Err(MeshError::invalid_loop(format!(
                    "half-edge ({:?}, {:?}) already belongs to {:?}",
                    u, v, owner
                )));
            }
        }
        Ok(())
    }

    /// Assign or retract ownership of the directed half-edge `(u, v)`.
    ///
    /// Callers must restore the invariants before returning to user code.
    pub(crate) fn set_edge_owner(&mut self, u: VertexId, v: VertexId, owner: Option<FaceId>) {
        match owner {
            Some(f) => {
                self.halfedge.entry(u).or_default().insert(v, Some(f));
                self.halfedge.entry(v).or_default().entry(u).or_insert(None);
            }
            None => {
                let Some(slot) = self.halfedge.get_mut(&u).and_then(|row| row.get_mut(&v)) else {
                    return;
                };
                *slot = None;
                if self.face_of_halfedge(v, u).is_none() {
                    if let Some(row) = self.halfedge.get_mut(&u) {
                        row.remove(&v);
                    }
                    if let Some(row) = self.halfedge.get_mut(&v) {
                        row.remove(&u);
                    }
                }
            }
        }
    }

    /// Drop edge attributes of candidate edges that no longer exist.
    pub(crate) fn prune_edge_data<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        if self.edge_data.is_empty() {
            return;
        }
        for (u, v) in candidates {
            if !self.has_edge(u, v) {
                self.edge_data.remove(&edge_key(u, v));
            }
        }
    }

    // ==================== Removal ====================

    /// Remove a face, retracting ownership of its half-edges.
    ///
    /// The vertices of the face are left in place, possibly isolated.
    pub fn remove_face(&mut self, f: FaceId) -> Result<()> {
        let face = self.faces.remove(&f).ok_or(MeshError::UnknownFace(f))?;
        for (u, v) in face.halfedges() {
            self.set_edge_owner(u, v, None);
        }
        self.prune_edge_data(face.halfedges());
        Ok(())
    }

    /// Remove a vertex that no face references.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        self.ensure_vertex(v)?;
        if let Some(face) = self.vertex_face(v) {
            return Err(MeshError::VertexInUse { vertex: v, face });
        }
        self.vertices.remove(&v);
        self.halfedge.remove(&v);
        Ok(())
    }

    /// Remove a vertex together with every face around it.
    pub fn delete_vertex(&mut self, v: VertexId) -> Result<()> {
        self.ensure_vertex(v)?;
        let faces: BTreeSet<FaceId> = self.vertex_faces(v).collect();
        for f in faces {
            self.remove_face(f)?;
        }
        self.remove_vertex(v)
    }

    /// Remove every vertex that no face references. Returns how many were removed.
    pub fn cull_vertices(&mut self) -> usize {
        let isolated: Vec<VertexId> = self
            .vertex_ids()
            .filter(|&v| self.vertex_face(v).is_none())
            .collect();
        for &v in &isolated {
            self.vertices.remove(&v);
            self.halfedge.remove(&v);
        }
        isolated.len()
    }

    /// Some face referencing `v`, if any.
    pub(crate) fn vertex_face(&self, v: VertexId) -> Option<FaceId> {
        // a face through v always owns the half-edge leaving v
        self.halfedge.get(&v)?.values().flatten().next().copied()
    }

    /// Every face referencing `v`, in ascending order.
    pub(crate) fn vertex_faces(&self, v: VertexId) -> impl Iterator<Item = FaceId> + '_ {
        self.halfedge
            .get(&v)
            .into_iter()
            .flat_map(|row| row.values().flatten().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    // ==================== Validation ====================

    /// Check all structural invariants, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        for (&fid, face) in &self.faces {
            if face.vertices.len() < 3 {
                return Err(MeshError::invalid_loop(format!("{:?} has fewer than 3 vertices", fid)));
            }
            let distinct: BTreeSet<_> = face.vertices.iter().collect();
            if distinct.len() != face.vertices.len() {
                return Err(MeshError::invalid_loop(format!("{:?} repeats a vertex", fid)));
            }
            for &v in &face.vertices {
                if !self.has_vertex(v) {
                    return Err(MeshError::UnknownVertex(v));
                }
            }
            for (u, v) in face.halfedges() {
                if self.face_of_halfedge(u, v) != Some(fid) {
                    return Err(MeshError::invalid_loop(format!(
                        "half-edge ({:?}, {:?}) of {:?} is not registered to it",
                        u, v, fid
                    )));
                }
            }
        }

        let mut owned = 0;
        for (&u, row) in &self.halfedge {
            if !self.has_vertex(u) {
                return Err(MeshError::UnknownVertex(u));
            }
            for (&v, &slot) in row {
                let reverse = self
                    .halfedge
                    .get(&v)
                    .and_then(|r| r.get(&u))
                    .ok_or(MeshError::UnknownEdge { u: v, v: u })?;
                if slot.is_none() && reverse.is_none() {
                    return Err(MeshError::BoundaryEdge { u, v });
                }
                if let (Some(a), Some(b)) = (slot, *reverse) {
                    if a == b {
                        return Err(MeshError::invalid_loop(format!(
                            "{:?} owns both directions of ({:?}, {:?})",
                            a, u, v
                        )));
                    }
                }
                if let Some(f) = slot {
                    let face = self.face_ref(f)?;
                    if face.next_of(u) != Some(v) {
                        return Err(MeshError::invalid_loop(format!(
                            "({:?}, {:?}) is registered to {:?} but not in its loop",
                            u, v, f
                        )));
                    }
                    owned += 1;
                }
            }
        }

        let expected: usize = self.faces.values().map(Face::degree).sum();
        if owned != expected {
            return Err(MeshError::invalid_loop(format!(
                "{} half-edges registered, faces account for {}",
                owned, expected
            )));
        }
        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(mesh: &mut HalfEdgeMesh, n: usize) -> Vec<VertexId> {
        (0..n).map(|_| mesh.add_vertex(Attributes::new())).collect()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = HalfEdgeMesh::new();
        let v0 = mesh.add_vertex_at(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex_at(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert_eq!(mesh.vertex_coordinates(v1), Some(Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_add_face_registers_halfedges() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 3);
        let f = mesh.add_face(&v, Attributes::new()).unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.face_of_halfedge(v[0], v[1]), Some(f));
        assert_eq!(mesh.face_of_halfedge(v[1], v[0]), None);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_face_rejects_short_loop() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 2);
        let err = mesh.add_face(&v, Attributes::new()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidLoop { .. }));
    }

    #[test]
    fn test_add_face_rejects_repeated_vertex() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 3);
        let err = mesh.add_face(&[v[0], v[1], v[0], v[2]], Attributes::new()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidLoop { .. }));
    }

    #[test]
    fn test_add_face_rejects_owned_halfedge() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 4);
        mesh.add_face(&[v[0], v[1], v[2]], Attributes::new()).unwrap();
        let before = mesh.clone();

        let err = mesh.add_face(&[v[0], v[1], v[3]], Attributes::new()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidLoop { .. }));
        assert_eq!(mesh, before);

        // The opposite orientation is fine.
        mesh.add_face(&[v[1], v[0], v[3]], Attributes::new()).unwrap();
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_face_rejects_unknown_vertex() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 2);
        let err = mesh
            .add_face(&[v[0], v[1], VertexId::new(99)], Attributes::new())
            .unwrap_err();
        assert!(matches!(err, MeshError::UnknownVertex(id) if id == VertexId::new(99)));
    }

    #[test]
    fn test_remove_face_retracts_edges() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 4);
        let f0 = mesh.add_face(&[v[0], v[1], v[2]], Attributes::new()).unwrap();
        let f1 = mesh.add_face(&[v[1], v[0], v[3]], Attributes::new()).unwrap();
        assert_eq!(mesh.num_edges(), 5);

        mesh.remove_face(f0).unwrap();
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.face_of_halfedge(v[1], v[0]), Some(f1));
        assert!(!mesh.has_edge(v[1], v[2]));
        assert!(mesh.is_valid());

        assert!(matches!(mesh.remove_face(f0), Err(MeshError::UnknownFace(_))));
        // The vertex stays, isolated.
        assert!(mesh.has_vertex(v[2]));
    }

    #[test]
    fn test_remove_vertex_in_use() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 3);
        let f = mesh.add_face(&v, Attributes::new()).unwrap();

        let err = mesh.remove_vertex(v[0]).unwrap_err();
        assert!(matches!(err, MeshError::VertexInUse { face, .. } if face == f));

        mesh.remove_face(f).unwrap();
        mesh.remove_vertex(v[0]).unwrap();
        assert!(!mesh.has_vertex(v[0]));
        assert!(matches!(mesh.remove_vertex(v[0]), Err(MeshError::UnknownVertex(_))));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 3);
        let f = mesh.add_face(&v, Attributes::new()).unwrap();
        mesh.remove_face(f).unwrap();
        let g = mesh.add_face(&v, Attributes::new()).unwrap();
        assert!(g > f);

        mesh.remove_face(g).unwrap();
        mesh.remove_vertex(v[2]).unwrap();
        let w = mesh.add_vertex(Attributes::new());
        assert!(w > v[2]);
    }

    #[test]
    fn test_delete_vertex_and_cull() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 4);
        mesh.add_face(&[v[0], v[1], v[2]], Attributes::new()).unwrap();
        mesh.add_face(&[v[1], v[0], v[3]], Attributes::new()).unwrap();

        mesh.delete_vertex(v[0]).unwrap();
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.cull_vertices(), 3);
        assert_eq!(mesh.num_vertices(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_attribute_defaults() {
        let mut mesh = HalfEdgeMesh::with_default_coordinates();
        let v = mesh.add_vertex(Attributes::new());
        assert_eq!(mesh.vertex_coordinates(v), Some(Point3::origin()));

        mesh.set_vertex_attribute(v, "x", 2.0).unwrap();
        assert_eq!(mesh.vertex_coordinates(v), Some(Point3::new(2.0, 0.0, 0.0)));
        assert!(mesh.vertex_attribute(v, "missing").is_none());
        assert!(mesh.set_vertex_attribute(VertexId::new(9), "x", 1.0).is_err());
    }

    #[test]
    fn test_edge_attributes_follow_edge() {
        let mut mesh = HalfEdgeMesh::new();
        let v = vertices(&mut mesh, 3);
        let f = mesh.add_face(&v, Attributes::new()).unwrap();

        mesh.set_edge_attribute(v[1], v[0], "crease", true).unwrap();
        assert_eq!(
            mesh.edge_attribute(v[0], v[1], "crease"),
            Some(&AttrValue::Bool(true))
        );

        mesh.remove_face(f).unwrap();
        assert!(mesh.edge_attribute(v[0], v[1], "crease").is_none());
        assert!(mesh.edge_data.is_empty());
    }
}
