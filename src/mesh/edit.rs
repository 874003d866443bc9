//! Atomic topology edits.
//!
//! Every editing operator describes its change as a [`TopologyEdit`]: faces to
//! retire, loops to install and vertices to create or drop. The edit is
//! validated against the current mesh as a whole before any record is
//! touched, so a rejected edit leaves the mesh exactly as it was.

use std::collections::BTreeSet;

use super::attributes::Attributes;
use super::halfedge::{loop_halfedges, HalfEdgeMesh};
use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// A batch of structural changes applied in one step.
///
/// Vertex identifiers for new vertices are reserved from the mesh allocator
/// when the edit is planned, so new loops can reference them. An edit must be
/// applied to the mesh it was planned against, before any other vertex is
/// added.
#[derive(Debug, Clone)]
pub struct TopologyEdit {
    first_vertex: VertexId,
    add_vertices: Vec<(VertexId, Attributes)>,
    remove_faces: Vec<FaceId>,
    replace_faces: Vec<(FaceId, Vec<VertexId>)>,
    add_faces: Vec<(Vec<VertexId>, Attributes)>,
    remove_vertices: Vec<VertexId>,
}

impl TopologyEdit {
    /// Start an empty edit for `mesh`.
    pub fn new(mesh: &HalfEdgeMesh) -> Self {
        Self {
            first_vertex: mesh.allocator.peek_vertex_id(),
            add_vertices: Vec::new(),
            remove_faces: Vec::new(),
            replace_faces: Vec::new(),
            add_faces: Vec::new(),
            remove_vertices: Vec::new(),
        }
    }

    /// Plan a new vertex and return the identifier it will receive.
    pub fn new_vertex(&mut self, attributes: Attributes) -> VertexId {
        let id = VertexId::new(self.first_vertex.index() + self.add_vertices.len());
        self.add_vertices.push((id, attributes));
        id
    }

    /// Remove a face.
    pub fn remove_face(&mut self, f: FaceId) -> &mut Self {
        self.remove_faces.push(f);
        self
    }

    /// Give an existing face a new loop, keeping its identifier and attributes.
    pub fn replace_face(&mut self, f: FaceId, vertices: Vec<VertexId>) -> &mut Self {
        self.replace_faces.push((f, vertices));
        self
    }

    /// Add a face. New faces receive identifiers in the order they were added.
    pub fn add_face(&mut self, vertices: Vec<VertexId>, attributes: Attributes) -> &mut Self {
        self.add_faces.push((vertices, attributes));
        self
    }

    /// Remove a vertex. It must be unreferenced once the edit is applied.
    pub fn remove_vertex(&mut self, v: VertexId) -> &mut Self {
        self.remove_vertices.push(v);
        self
    }

    /// Whether the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.add_vertices.is_empty()
            && self.remove_faces.is_empty()
            && self.replace_faces.is_empty()
            && self.add_faces.is_empty()
            && self.remove_vertices.is_empty()
    }

    /// Faces retired by the edit, removed or replaced.
    fn retired(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.remove_faces
            .iter()
            .copied()
            .chain(self.replace_faces.iter().map(|(f, _)| *f))
    }

    /// Every loop the edit installs.
    fn new_loops(&self) -> impl Iterator<Item = &[VertexId]> + '_ {
        self.replace_faces
            .iter()
            .map(|(_, l)| l.as_slice())
            .chain(self.add_faces.iter().map(|(l, _)| l.as_slice()))
    }
}

impl HalfEdgeMesh {
    /// Validate an edit against this mesh without applying it.
    ///
    /// Identifiers that do not exist are reported as such; loops that would
    /// break the half-edge invariants are reported as
    /// [`MeshError::InvalidLoop`].
    pub fn check(&self, edit: &TopologyEdit) -> Result<()> {
        if !edit.add_vertices.is_empty() && edit.first_vertex != self.allocator.peek_vertex_id() {
            return Err(MeshError::InvalidData(format!(
                "edit reserved vertex ids from {} but the next id is {}",
                edit.first_vertex,
                self.allocator.peek_vertex_id()
            )));
        }

        let mut retired = BTreeSet::new();
        for f in edit.retired() {
            self.face_ref(f)?;
            if !retired.insert(f) {
                return Err(MeshError::invalid_loop(format!("{:?} is retired twice", f)));
            }
        }

        let pending: BTreeSet<VertexId> = edit.add_vertices.iter().map(|(v, _)| *v).collect();
        let dropped: BTreeSet<VertexId> = edit.remove_vertices.iter().copied().collect();

        let mut claimed = BTreeSet::new();
        for vertices in edit.new_loops() {
            if vertices.len() < 3 {
                return Err(MeshError::invalid_loop(format!(
                    "loop has {} vertices, at least 3 required",
                    vertices.len()
                )));
            }
            let mut seen = BTreeSet::new();
            for &v in vertices {
                if !pending.contains(&v) {
                    self.ensure_vertex(v)?;
                }
                if dropped.contains(&v) {
                    return Err(MeshError::invalid_loop(format!(
                        "vertex {:?} is removed by the same edit",
                        v
                    )));
                }
                if !seen.insert(v) {
                    return Err(MeshError::invalid_loop(format!("vertex {:?} appears twice", v)));
                }
            }
            for (u, v) in loop_halfedges(vertices) {
                if !claimed.insert((u, v)) {
                    return Err(MeshError::invalid_loop(format!(
                        "half-edge ({:?}, {:?}) is claimed twice",
                        u, v
                    )));
                }
                if let Some(owner) = self.face_of_halfedge(u, v) {
                    if !retired.contains(&owner) {
                        return Err(MeshError::invalid_loop(format!(
                            "half-edge ({:?}, {:?}) already belongs to {:?}",
                            u, v, owner
                        )));
                    }
                }
            }
        }

        for &v in &dropped {
            self.ensure_vertex(v)?;
            if let Some(face) = self.vertex_faces(v).find(|f| !retired.contains(f)) {
                return Err(MeshError::VertexInUse { vertex: v, face });
            }
        }
        Ok(())
    }

    /// Apply an edit atomically, returning the identifiers of the added faces.
    ///
    /// On error nothing is changed.
    pub fn apply(&mut self, edit: TopologyEdit) -> Result<Vec<FaceId>> {
        self.check(&edit)?;
        log::trace!(
            "apply edit: +{}v -{}f ~{}f +{}f -{}v",
            edit.add_vertices.len(),
            edit.remove_faces.len(),
            edit.replace_faces.len(),
            edit.add_faces.len(),
            edit.remove_vertices.len()
        );

        let TopologyEdit {
            add_vertices,
            remove_faces,
            replace_faces,
            add_faces,
            remove_vertices,
            ..
        } = edit;

        for (id, attributes) in add_vertices {
            let issued = self.allocator.next_vertex_id();
            debug_assert_eq!(issued, id);
            self.insert_vertex_record(issued, attributes);
        }

        let mut touched = Vec::new();
        for f in remove_faces {
            if let Some(face) = self.faces.remove(&f) {
                for (u, v) in face.halfedges() {
                    self.set_edge_owner(u, v, None);
                    touched.push((u, v));
                }
            }
        }
        for (f, _) in &replace_faces {
            let old: Vec<(VertexId, VertexId)> = self.face_halfedges(*f).collect();
            for &(u, v) in &old {
                self.set_edge_owner(u, v, None);
            }
            touched.extend(old);
        }

        for (f, vertices) in replace_faces {
            for (u, v) in loop_halfedges(&vertices) {
                self.set_edge_owner(u, v, Some(f));
            }
            if let Some(face) = self.faces.get_mut(&f) {
                face.vertices = vertices;
            }
        }

        let mut added = Vec::with_capacity(add_faces.len());
        for (vertices, attributes) in add_faces {
            let id = self.allocator.next_face_id();
            self.insert_face_record(id, vertices, attributes);
            added.push(id);
        }

        for v in remove_vertices {
            self.vertices.remove(&v);
            self.halfedge.remove(&v);
        }

        self.prune_edge_data(touched);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing the edge (1, 3).
    fn quad() -> (HalfEdgeMesh, Vec<VertexId>, Vec<FaceId>) {
        let mut mesh = HalfEdgeMesh::new();
        let v: Vec<VertexId> = (0..4).map(|_| mesh.add_vertex(Attributes::new())).collect();
        let f0 = mesh.add_face(&[v[0], v[1], v[3]], Attributes::new()).unwrap();
        let f1 = mesh.add_face(&[v[1], v[2], v[3]], Attributes::new()).unwrap();
        (mesh, v, vec![f0, f1])
    }

    #[test]
    fn test_retire_and_rebuild() {
        let (mut mesh, v, f) = quad();
        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[0])
            .remove_face(f[1])
            .add_face(vec![v[0], v[2], v[3]], Attributes::new())
            .add_face(vec![v[2], v[0], v[1]], Attributes::new());

        let added = mesh.apply(edit).unwrap();
        assert_eq!(added, vec![FaceId::new(2), FaceId::new(3)]);
        assert!(!mesh.has_edge(v[1], v[3]));
        assert!(mesh.has_halfedge(v[0], v[2]) && mesh.has_halfedge(v[2], v[0]));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_conflicting_loop_leaves_mesh_untouched() {
        let (mut mesh, v, f) = quad();
        let before = mesh.clone();

        // (1, 3) stays owned by face 0, which is not retired.
        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[1]).add_face(vec![v[1], v[3], v[2]], Attributes::new());
        let err = mesh.apply(edit).unwrap_err();
        assert!(matches!(err, MeshError::InvalidLoop { .. }));
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_halfedge_claimed_twice() {
        let (mesh, v, f) = quad();
        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[0])
            .remove_face(f[1])
            .add_face(vec![v[0], v[1], v[2]], Attributes::new())
            .add_face(vec![v[0], v[1], v[3]], Attributes::new());
        assert!(matches!(mesh.check(&edit), Err(MeshError::InvalidLoop { .. })));
    }

    #[test]
    fn test_new_vertex_in_replaced_loop() {
        let (mut mesh, v, f) = quad();
        mesh.set_face_attribute(f[0], "name", "left").unwrap();

        let mut edit = TopologyEdit::new(&mesh);
        let w = edit.new_vertex(Attributes::new());
        edit.replace_face(f[0], vec![v[0], v[1], w, v[3]])
            .replace_face(f[1], vec![v[1], v[2], v[3], w]);
        mesh.apply(edit).unwrap();

        assert_eq!(w, VertexId::new(4));
        assert!(mesh.has_vertex(w));
        assert_eq!(mesh.face_vertices(f[0]), Some(&[v[0], v[1], w, v[3]][..]));
        assert_eq!(
            mesh.face_attribute(f[0], "name").and_then(|a| a.as_str()),
            Some("left")
        );
        assert!(!mesh.has_edge(v[1], v[3]));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_stale_edit_rejected() {
        let (mut mesh, v, f) = quad();
        let mut edit = TopologyEdit::new(&mesh);
        let w = edit.new_vertex(Attributes::new());
        edit.replace_face(f[0], vec![v[0], v[1], w, v[3]]);

        mesh.add_vertex(Attributes::new());
        assert!(matches!(mesh.check(&edit), Err(MeshError::InvalidData(_))));
    }

    #[test]
    fn test_remove_vertex_must_end_unreferenced() {
        let (mut mesh, v, f) = quad();
        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[1]).remove_vertex(v[3]);
        assert!(matches!(
            mesh.check(&edit),
            Err(MeshError::VertexInUse { face, .. }) if face == f[0]
        ));

        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[1]).remove_vertex(v[2]);
        mesh.apply(edit).unwrap();
        assert!(!mesh.has_vertex(v[2]));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_unknown_face() {
        let (mesh, _, _) = quad();
        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(FaceId::new(7));
        assert!(matches!(mesh.check(&edit), Err(MeshError::UnknownFace(_))));
        assert!(!edit.is_empty());
        assert!(TopologyEdit::new(&mesh).is_empty());
    }

    #[test]
    fn test_edge_data_pruned_with_edge() {
        let (mut mesh, v, f) = quad();
        mesh.set_edge_attribute(v[1], v[3], "crease", true).unwrap();
        mesh.set_edge_attribute(v[0], v[1], "crease", false).unwrap();

        let mut edit = TopologyEdit::new(&mesh);
        edit.remove_face(f[0])
            .remove_face(f[1])
            .add_face(vec![v[0], v[2], v[3]], Attributes::new())
            .add_face(vec![v[2], v[0], v[1]], Attributes::new());
        mesh.apply(edit).unwrap();

        assert_eq!(mesh.edge_data.len(), 1);
        assert!(mesh.edge_attribute(v[0], v[1], "crease").is_some());
    }
}
