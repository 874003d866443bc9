//! JSON mesh documents.

use std::fs;
use std::path::Path;

use super::data::MeshData;
use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

/// Load a mesh from a JSON file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    from_json_str(&text).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Save a mesh to a JSON file.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    fs::write(path, to_json_string(mesh)?)?;
    Ok(())
}

/// Encode a mesh as a pretty-printed JSON document.
pub fn to_json_string(mesh: &HalfEdgeMesh) -> Result<String> {
    Ok(serde_json::to_string_pretty(&mesh.to_data())?)
}

/// Decode a mesh from a JSON document.
pub fn from_json_str(text: &str) -> Result<HalfEdgeMesh> {
    let data: MeshData = serde_json::from_str(text)?;
    HalfEdgeMesh::from_data(&data)
}
