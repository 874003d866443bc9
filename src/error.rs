//! Error types for hemesh.
//!
//! Every fallible operation returns [`Result`]. These errors signal misuse
//! (unknown identifiers, malformed loops, bad parameters). An editing operator
//! that is simply not applicable to the current mesh does not fail; it returns
//! `Ok(None)` instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::{FaceId, VertexId};

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face loop is degenerate, repeats a vertex, or conflicts with
    /// existing half-edge ownership.
    #[error("invalid face loop: {reason}")]
    InvalidLoop {
        /// Why the loop was rejected.
        reason: String,
    },

    /// A vertex identifier does not exist in the mesh.
    #[error("unknown vertex {0:?}")]
    UnknownVertex(VertexId),

    /// A face identifier does not exist in the mesh.
    #[error("unknown face {0:?}")]
    UnknownFace(FaceId),

    /// The two vertices are not connected by an edge.
    #[error("no edge between {u:?} and {v:?}")]
    UnknownEdge {
        /// First vertex.
        u: VertexId,
        /// Second vertex.
        v: VertexId,
    },

    /// A vertex cannot be removed while a face loop references it.
    #[error("vertex {vertex:?} is still referenced by face {face:?}")]
    VertexInUse {
        /// The vertex that was to be removed.
        vertex: VertexId,
        /// One face referencing it.
        face: FaceId,
    },

    /// An interior half-edge was required, but `(u, v)` has no owning face.
    #[error("half-edge ({u:?}, {v:?}) is on the boundary")]
    BoundaryEdge {
        /// Origin of the half-edge.
        u: VertexId,
        /// Destination of the half-edge.
        v: VertexId,
    },

    /// A vertex was expected in the loop of a face.
    #[error("vertex {vertex:?} is not part of face {face:?}")]
    VertexNotInFace {
        /// The vertex.
        vertex: VertexId,
        /// The face.
        face: FaceId,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// A serialized mesh document is malformed.
    #[error("invalid mesh data: {0}")]
    InvalidData(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invalid loop error.
    pub(crate) fn invalid_loop(reason: impl Into<String>) -> Self {
        MeshError::InvalidLoop {
            reason: reason.into(),
        }
    }
}
