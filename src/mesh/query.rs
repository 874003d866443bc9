//! Read-only adjacency queries.
//!
//! Everything here borrows the mesh immutably. Editing operators decide
//! legality through these queries before touching the store.

use std::collections::BTreeSet;

use nalgebra::Point3;

use super::halfedge::{loop_halfedges, Face, HalfEdgeMesh, Vertex};
use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

impl HalfEdgeMesh {
    // ==================== Iteration ====================

    /// Iterate over all vertex IDs in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().map(|(&id, v)| (id, v))
    }

    /// Iterate over all face IDs in ascending order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter().map(|(&id, f)| (id, f))
    }

    /// Iterate over all owned half-edges.
    pub fn halfedges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.halfedge.iter().flat_map(|(&u, row)| {
            row.iter()
                .filter(|(_, slot)| slot.is_some())
                .map(move |(&v, _)| (u, v))
        })
    }

    /// Iterate over all undirected edges, each once.
    ///
    /// Boundary edges are reported in their owned direction, interior edges
    /// as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.halfedges()
            .filter(move |&(u, v)| u < v || self.face_of_halfedge(v, u).is_none())
    }

    // ==================== Topology Queries ====================

    /// Whether `u` and `v` are joined by an edge, in either direction.
    #[inline]
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.halfedge.get(&u).map_or(false, |row| row.contains_key(&v))
    }

    /// Whether the directed half-edge `(u, v)` is owned by a face.
    #[inline]
    pub fn has_halfedge(&self, u: VertexId, v: VertexId) -> bool {
        self.face_of_halfedge(u, v).is_some()
    }

    /// The face owning the half-edge `(u, v)`.
    #[inline]
    pub fn face_of_halfedge(&self, u: VertexId, v: VertexId) -> Option<FaceId> {
        self.halfedge.get(&u)?.get(&v).copied().flatten()
    }

    /// Both faces of the edge `{u, v}`: the owner of `(u, v)` and of `(v, u)`.
    pub fn edge_faces(&self, u: VertexId, v: VertexId) -> (Option<FaceId>, Option<FaceId>) {
        (self.face_of_halfedge(u, v), self.face_of_halfedge(v, u))
    }

    /// Iterate over the vertices adjacent to `v` (the set of neighbors, in
    /// ascending order). Unknown vertices have no neighbors.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.halfedge
            .get(&v)
            .into_iter()
            .flat_map(|row| row.keys().copied())
    }

    /// Number of edges incident to `v`.
    pub fn vertex_degree(&self, v: VertexId) -> usize {
        self.halfedge.get(&v).map_or(0, |row| row.len())
    }

    /// Number of vertices of a face.
    pub fn face_degree(&self, f: FaceId) -> Option<usize> {
        self.faces.get(&f).map(Face::degree)
    }

    /// The loop of a face.
    pub fn face_vertices(&self, f: FaceId) -> Option<&[VertexId]> {
        self.faces.get(&f).map(|face| face.vertices.as_slice())
    }

    /// Iterate over the half-edges of a face.
    pub fn face_halfedges(&self, f: FaceId) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.face_vertices(f).into_iter().flat_map(loop_halfedges)
    }

    /// Faces sharing an edge with `f`.
    pub fn face_neighbors(&self, f: FaceId) -> Vec<FaceId> {
        let mut seen = BTreeSet::new();
        self.face_halfedges(f)
            .filter_map(|(u, v)| self.face_of_halfedge(v, u))
            .filter(|&g| seen.insert(g))
            .collect()
    }

    /// Check if an edge is on the boundary (exactly one direction owned).
    pub fn is_boundary_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.has_halfedge(u, v) != self.has_halfedge(v, u)
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Isolated vertices have no incident edges and are not boundary vertices.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.neighbors(v).any(|w| self.is_boundary_edge(v, w))
    }

    /// Whether the mesh has no boundary edges.
    pub fn is_closed(&self) -> bool {
        self.edges().all(|(u, v)| !self.is_boundary_edge(u, v))
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.values().all(|f| f.degree() == 3)
    }

    /// Whether the faces around `v` form a single fan.
    pub fn is_manifold_vertex(&self, v: VertexId) -> bool {
        self.vertex_fans(v).len() <= 1
    }

    /// The vertex preceding `u` in the face owning `(u, v)`.
    ///
    /// Fails with [`MeshError::BoundaryEdge`] if `{u, v}` is an edge but
    /// `(u, v)` has no owner, and [`MeshError::UnknownEdge`] if there is no
    /// such edge at all.
    pub fn opposite_vertex(&self, u: VertexId, v: VertexId) -> Result<VertexId> {
        self.ensure_vertex(u)?;
        self.ensure_vertex(v)?;
        if !self.has_edge(u, v) {
            return Err(MeshError::UnknownEdge { u, v });
        }
        let f = self
            .face_of_halfedge(u, v)
            .ok_or(MeshError::BoundaryEdge { u, v })?;
        self.face_ref(f)?
            .prev_of(u)
            .ok_or(MeshError::VertexNotInFace { vertex: u, face: f })
    }

    /// The half-edge following `(u, v)` in its face.
    pub fn halfedge_after(&self, u: VertexId, v: VertexId) -> Option<(VertexId, VertexId)> {
        let f = self.face_of_halfedge(u, v)?;
        let w = self.faces.get(&f)?.next_of(v)?;
        Some((v, w))
    }

    /// The half-edge preceding `(u, v)` in its face.
    pub fn halfedge_before(&self, u: VertexId, v: VertexId) -> Option<(VertexId, VertexId)> {
        let f = self.face_of_halfedge(u, v)?;
        let w = self.faces.get(&f)?.prev_of(u)?;
        Some((w, u))
    }

    /// Iterate over the faces around a vertex in traversal order.
    ///
    /// Consecutive faces share an edge incident to `v`. On the boundary the
    /// walk starts at the face whose leading edge is open; around an interior
    /// vertex it starts at the face owning the half-edge towards the smallest
    /// neighbor. Non-manifold vertices yield one fan after the other. The
    /// iterator is lazy and can be cloned to restart from the same point.
    pub fn faces_around_vertex(&self, v: VertexId) -> VertexFaceIter<'_> {
        VertexFaceIter::new(self, v)
    }

    /// The faces around `v`, grouped into fans.
    pub fn vertex_fans(&self, v: VertexId) -> Vec<Vec<FaceId>> {
        let mut fans: Vec<Vec<FaceId>> = Vec::new();
        let mut iter = self.faces_around_vertex(v);
        let mut fan_count = 0;
        while let Some(f) = iter.next() {
            if iter.fans_started() != fan_count {
                fan_count = iter.fans_started();
                fans.push(Vec::new());
            }
            if let Some(fan) = fans.last_mut() {
                fan.push(f);
            }
        }
        fans
    }

    /// Boundary loops, each as a cycle of vertices.
    ///
    /// A loop follows the open sides of boundary edges, so it runs against the
    /// orientation of the adjacent faces.
    pub fn boundaries(&self) -> Vec<Vec<VertexId>> {
        let mut open: BTreeSet<(VertexId, VertexId)> = BTreeSet::new();
        for (u, row) in &self.halfedge {
            for (v, slot) in row {
                if slot.is_none() {
                    open.insert((*u, *v));
                }
            }
        }

        let mut loops = Vec::new();
        while let Some(&(start, mut next)) = open.iter().next() {
            open.remove(&(start, next));
            let mut cycle = vec![start];
            while next != start {
                cycle.push(next);
                let step = open.range((next, VertexId::new(0))..).next().copied();
                match step {
                    Some((a, b)) if a == next => {
                        open.remove(&(a, b));
                        next = b;
                    }
                    _ => break,
                }
            }
            loops.push(cycle);
        }
        loops
    }

    // ==================== Geometry ====================

    /// Point at parameter `t` along the edge from `u` to `v`.
    pub fn edge_point(&self, u: VertexId, v: VertexId, t: f64) -> Option<Point3<f64>> {
        let a = self.vertex_coordinates(u)?;
        let b = self.vertex_coordinates(v)?;
        Some(a + (b - a) * t)
    }

    /// Midpoint of the edge `{u, v}`.
    pub fn edge_midpoint(&self, u: VertexId, v: VertexId) -> Option<Point3<f64>> {
        self.edge_point(u, v, 0.5)
    }

    /// Average of the vertex positions of a face.
    pub fn face_centroid(&self, f: FaceId) -> Option<Point3<f64>> {
        let loop_ = self.face_vertices(f)?;
        let mut sum = Point3::origin().coords;
        for &v in loop_ {
            sum += self.vertex_coordinates(v)?.coords;
        }
        Some(Point3::from(sum / loop_.len() as f64))
    }
}

/// Iterator over the faces around a vertex.
#[derive(Clone)]
pub struct VertexFaceIter<'a> {
    mesh: &'a HalfEdgeMesh,
    center: VertexId,
    current: Option<VertexId>,
    visited: BTreeSet<FaceId>,
    fans: usize,
}

impl<'a> VertexFaceIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, center: VertexId) -> Self {
        Self {
            mesh,
            center,
            current: None,
            visited: BTreeSet::new(),
            fans: 0,
        }
    }

    /// Number of fans entered so far.
    pub fn fans_started(&self) -> usize {
        self.fans
    }

    /// Pick the leading neighbor of the next unvisited fan.
    fn next_fan_start(&self) -> Option<VertexId> {
        let unvisited = |&w: &VertexId| {
            self.mesh
                .face_of_halfedge(self.center, w)
                .map_or(false, |f| !self.visited.contains(&f))
        };
        let mut candidates = self.mesh.neighbors(self.center).filter(unvisited);
        let first = candidates.next()?;
        if !self.mesh.has_halfedge(first, self.center) {
            return Some(first);
        }
        Some(
            self.mesh
                .neighbors(self.center)
                .filter(unvisited)
                .find(|&w| !self.mesh.has_halfedge(w, self.center))
                .unwrap_or(first),
        )
    }
}

impl<'a> Iterator for VertexFaceIter<'a> {
    type Item = FaceId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(w) = self.current {
                // The face owning (center, w) also owns (p, center); the next
                // face around the vertex is the owner of (center, p).
                let face = self
                    .mesh
                    .face_of_halfedge(self.center, w)
                    .filter(|f| !self.visited.contains(f));
                if let Some(f) = face {
                    self.visited.insert(f);
                    self.current = self.mesh.faces.get(&f).and_then(|face| face.prev_of(self.center));
                    return Some(f);
                }
                self.current = None;
            }
            self.current = Some(self.next_fan_start()?);
            self.fans += 1;
        }
    }
}
