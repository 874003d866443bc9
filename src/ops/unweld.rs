//! Unwelding: detaching faces from each other by duplicating vertices.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MeshError, Result};
use crate::mesh::{edge_key, FaceId, HalfEdgeMesh, TopologyEdit, VertexId};

use super::{commit, ensure_edge};

/// Give face `f` its own copies of its vertices, or of the listed ones.
///
/// Copies carry the attributes of the original vertex. The originals stay
/// in place and may end up isolated. Returns the new vertices, in the order
/// of the vertices they replace.
///
/// # Errors
/// [`MeshError::VertexNotInFace`] if a listed vertex is not part of `f`.
pub fn unweld_vertices(
    mesh: &mut HalfEdgeMesh,
    f: FaceId,
    vertices: Option<&[VertexId]>,
) -> Result<Option<Vec<VertexId>>> {
    const OP: &str = "unweld_vertices";
    let face = mesh.face_ref(f)?;
    let targets: Vec<VertexId> = match vertices {
        Some(vs) => {
            for &v in vs {
                if face.position_of(v).is_none() {
                    return Err(MeshError::VertexNotInFace { vertex: v, face: f });
                }
            }
            vs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
        }
        None => face.vertices.clone(),
    };

    let mut edit = TopologyEdit::new(mesh);
    let mut copies = BTreeMap::new();
    let mut created = Vec::with_capacity(targets.len());
    for &v in &targets {
        let attributes = mesh.vertex(v).map(|x| x.attributes.clone()).unwrap_or_default();
        let w = edit.new_vertex(attributes);
        copies.insert(v, w);
        created.push(w);
    }
    let vertices = face
        .vertices
        .iter()
        .map(|v| copies.get(v).copied().unwrap_or(*v))
        .collect();
    edit.replace_face(f, vertices);

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: {:?} got {} new vertices", OP, f, created.len());
    Ok(Some(created))
}

/// Split the fans around `x` into sectors separated by cut edges.
///
/// Each sector is a run of consecutive faces around `x`. Fans without a cut
/// edge form a single sector.
fn fan_sectors(
    mesh: &HalfEdgeMesh,
    x: VertexId,
    cuts: &BTreeSet<(VertexId, VertexId)>,
) -> Vec<Vec<FaceId>> {
    let mut sectors = Vec::new();
    for fan in mesh.vertex_fans(x) {
        // The face after fan[i] shares the edge from x to the vertex before x in fan[i].
        let trailing = |f: FaceId| mesh.face(f).and_then(|face| face.prev_of(x));
        let closed = fan
            .last()
            .and_then(|&f| trailing(f))
            .and_then(|p| mesh.face_of_halfedge(x, p))
            == fan.first().copied();

        let mut groups: Vec<Vec<FaceId>> = vec![Vec::new()];
        for (i, &f) in fan.iter().enumerate() {
            if i > 0 {
                let cut = trailing(fan[i - 1]).map_or(false, |p| cuts.contains(&edge_key(x, p)));
                if cut {
                    groups.push(Vec::new());
                }
            }
            if let Some(group) = groups.last_mut() {
                group.push(f);
            }
        }

        let wrap_cut = fan
            .last()
            .and_then(|&f| trailing(f))
            .map_or(false, |p| cuts.contains(&edge_key(x, p)));
        if closed && !wrap_cut && groups.len() > 1 {
            if let Some(mut tail) = groups.pop() {
                tail.append(&mut groups[0]);
                groups[0] = tail;
            }
        }
        sectors.extend(groups);
    }
    sectors
}

/// Cut the mesh open along the given edges.
///
/// Around every endpoint of a cut edge, the faces are grouped into sectors
/// separated by cut edges. The first sector keeps the vertex; every further
/// sector gets a fresh copy of it. A single interior cut edge does not
/// separate anything at its endpoints, so cutting a closed path needs at least
/// two edges through each vertex. Returns the number of vertices created.
pub fn unweld_edges(mesh: &mut HalfEdgeMesh, edges: &[(VertexId, VertexId)]) -> Result<Option<usize>> {
    const OP: &str = "unweld_edges";
    let mut cuts = BTreeSet::new();
    for &(u, v) in edges {
        ensure_edge(mesh, u, v)?;
        cuts.insert(edge_key(u, v));
    }
    let endpoints: BTreeSet<VertexId> = cuts.iter().flat_map(|&(u, v)| [u, v]).collect();

    let mut edit = TopologyEdit::new(mesh);
    let mut loops: BTreeMap<FaceId, Vec<VertexId>> = BTreeMap::new();
    let mut created = 0;
    for &x in &endpoints {
        let sectors = fan_sectors(mesh, x, &cuts);
        for sector in sectors.iter().skip(1) {
            let attributes = mesh.vertex(x).map(|v| v.attributes.clone()).unwrap_or_default();
            let copy = edit.new_vertex(attributes);
            created += 1;
            for &f in sector {
                let vertices = match loops.entry(f) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => e.insert(mesh.face_ref(f)?.vertices.clone()),
                };
                for v in vertices.iter_mut() {
                    if *v == x {
                        *v = copy;
                    }
                }
            }
        }
    }
    for (f, vertices) in loops {
        edit.replace_face(f, vertices);
    }

    if commit(mesh, edit, OP)?.is_none() {
        return Ok(None);
    }
    log::debug!("{}: {} edges cut, {} vertices created", OP, cuts.len(), created);
    Ok(Some(created))
}
