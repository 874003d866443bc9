//! The serialized mesh document.
//!
//! Identifiers are written as decimal strings because JSON object keys are
//! strings. Undirected edge keys are written as `"(u,v)"` with `u <= v`.
//! The allocator high-water marks are written as `-1` when nothing has been
//! issued yet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::mesh::{edge_key, Attributes, FaceId, HalfEdgeMesh, IdAllocator, VertexId};

fn nothing_issued() -> i64 {
    -1
}

/// Plain data form of a [`HalfEdgeMesh`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh-level attributes.
    #[serde(default)]
    pub attributes: Attributes,
    /// Default vertex attributes.
    #[serde(default)]
    pub dva: Attributes,
    /// Default edge attributes.
    #[serde(default)]
    pub dea: Attributes,
    /// Default face attributes.
    #[serde(default)]
    pub dfa: Attributes,
    /// Vertex attributes by vertex id.
    pub vertex: BTreeMap<String, Attributes>,
    /// Face loops by face id.
    pub face: BTreeMap<String, Vec<usize>>,
    /// Face attributes by face id. Faces without attributes may be omitted.
    #[serde(default)]
    pub facedata: BTreeMap<String, Attributes>,
    /// Edge attributes by `"(u,v)"` key.
    #[serde(default)]
    pub edgedata: BTreeMap<String, Attributes>,
    /// Largest vertex id issued, `-1` for none.
    #[serde(default = "nothing_issued")]
    pub max_vertex: i64,
    /// Largest face id issued, `-1` for none.
    #[serde(default = "nothing_issued")]
    pub max_face: i64,
}

fn parse_id(key: &str) -> Result<usize> {
    key.trim()
        .parse()
        .map_err(|_| MeshError::InvalidData(format!("invalid identifier key {:?}", key)))
}

fn parse_edge_key(key: &str) -> Result<(usize, usize)> {
    let invalid = || MeshError::InvalidData(format!("invalid edge key {:?}", key));
    let inner = key
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (a, b) = inner.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse().map_err(|_| invalid())?;
    let b = b.trim().parse().map_err(|_| invalid())?;
    Ok((a, b))
}

fn high_water(name: &str, value: i64) -> Result<Option<usize>> {
    match value {
        -1 => Ok(None),
        v if v >= 0 => Ok(Some(v as usize)),
        v => Err(MeshError::InvalidData(format!("{} must be at least -1, got {}", name, v))),
    }
}

fn to_high_water(value: Option<usize>) -> i64 {
    value.map_or(-1, |v| v as i64)
}

impl HalfEdgeMesh {
    /// Convert the mesh to its serializable form.
    pub fn to_data(&self) -> MeshData {
        let vertex = self
            .vertices()
            .map(|(id, v)| (id.to_string(), v.attributes.clone()))
            .collect();
        let face = self
            .faces()
            .map(|(id, f)| (id.to_string(), f.vertices.iter().map(|v| v.index()).collect()))
            .collect();
        let facedata = self
            .faces()
            .filter(|(_, f)| !f.attributes.is_empty())
            .map(|(id, f)| (id.to_string(), f.attributes.clone()))
            .collect();
        let edgedata = self
            .edge_data
            .iter()
            .map(|((u, v), attrs)| (format!("({},{})", u, v), attrs.clone()))
            .collect();

        MeshData {
            attributes: self.attributes.clone(),
            dva: self.default_vertex_attributes.clone(),
            dea: self.default_edge_attributes.clone(),
            dfa: self.default_face_attributes.clone(),
            vertex,
            face,
            facedata,
            edgedata,
            max_vertex: to_high_water(self.allocator.max_vertex()),
            max_face: to_high_water(self.allocator.max_face()),
        }
    }

    /// Rebuild a mesh from its serializable form.
    ///
    /// Identifiers are preserved. The allocator continues after the larger of
    /// the recorded high-water mark and the largest identifier present.
    pub fn from_data(data: &MeshData) -> Result<Self> {
        let mut mesh = Self::new();
        mesh.allocator = IdAllocator::with_high_water(
            high_water("max_vertex", data.max_vertex)?,
            high_water("max_face", data.max_face)?,
        )?;
        mesh.attributes = data.attributes.clone();
        mesh.default_vertex_attributes = data.dva.clone();
        mesh.default_edge_attributes = data.dea.clone();
        mesh.default_face_attributes = data.dfa.clone();

        for (key, attrs) in &data.vertex {
            mesh.add_vertex_with_id(VertexId::new(parse_id(key)?), attrs.clone())?;
        }

        let mut faces = BTreeMap::new();
        for (key, vertices) in &data.face {
            let id = FaceId::new(parse_id(key)?);
            if faces.insert(id, vertices).is_some() {
                return Err(MeshError::InvalidData(format!("duplicate face {}", id)));
            }
        }
        for (&id, vertices) in &faces {
            let attrs = match data.facedata.get(&id.to_string()) {
                Some(attrs) => attrs.clone(),
                None => Attributes::new(),
            };
            let loop_: Vec<VertexId> = vertices.iter().map(|&v| VertexId::new(v)).collect();
            mesh.add_face_with_id(id, &loop_, attrs)?;
        }
        for key in data.facedata.keys() {
            if !faces.contains_key(&FaceId::new(parse_id(key)?)) {
                return Err(MeshError::InvalidData(format!("facedata for unknown face {}", key)));
            }
        }

        for (key, attrs) in &data.edgedata {
            let (u, v) = parse_edge_key(key)?;
            let (u, v) = (VertexId::new(u), VertexId::new(v));
            if !mesh.has_edge(u, v) {
                return Err(MeshError::InvalidData(format!("edgedata for unknown edge {}", key)));
            }
            mesh.edge_data.insert(edge_key(u, v), attrs.clone());
        }

        Ok(mesh)
    }
}
