//! Mesh document I/O.
//!
//! Meshes are stored as JSON documents holding vertex attributes, face loops,
//! face and edge attributes and the allocator high-water marks, so that a
//! loaded mesh keeps its identifiers and continues numbering where the saved
//! one stopped.
//!
//! # Usage
//!
//! ```no_run
//! use hemesh::io::{load, save};
//!
//! let mesh = load("model.json").unwrap();
//! save(&mesh, "output.json").unwrap();
//! ```

mod data;
pub mod json;

pub use data::MeshData;
pub use json::{from_json_str, to_json_string};

use std::path::Path;

use crate::error::Result;
use crate::mesh::HalfEdgeMesh;

/// Load a mesh from a JSON document on disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    json::load(path)
}

/// Save a mesh as a JSON document.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    json::save(mesh, path)
}
