//! Monotonic identifier allocation.

use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// Largest identifier a mesh can hold. High-water marks are written to mesh
/// documents as signed 64-bit integers, and an identifier is only accepted
/// when its successor is still below this bound.
pub const MAX_ID: usize = i64::MAX as usize;

fn check_observed(kind: &str, id: usize) -> Result<()> {
    if id < MAX_ID {
        Ok(())
    } else {
        Err(MeshError::InvalidData(format!("{} id {} is out of range", kind, id)))
    }
}

/// Per-mesh counters handing out fresh vertex and face identifiers.
///
/// Every identifier returned by [`next_vertex_id`](Self::next_vertex_id) is
/// strictly greater than any vertex identifier issued or observed before it,
/// and likewise for faces. Deleting elements never rewinds the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    max_vertex: Option<usize>,
    max_face: Option<usize>,
}

impl IdAllocator {
    /// Create an allocator that has not issued anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator continuing from the given high-water marks.
    ///
    /// Fails with [`MeshError::InvalidData`] for a mark of [`MAX_ID`] or more.
    pub fn with_high_water(max_vertex: Option<usize>, max_face: Option<usize>) -> Result<Self> {
        if let Some(m) = max_vertex {
            check_observed("vertex", m)?;
        }
        if let Some(m) = max_face {
            check_observed("face", m)?;
        }
        Ok(Self {
            max_vertex,
            max_face,
        })
    }

    /// The largest vertex identifier issued so far.
    #[inline]
    pub fn max_vertex(&self) -> Option<usize> {
        self.max_vertex
    }

    /// The largest face identifier issued so far.
    #[inline]
    pub fn max_face(&self) -> Option<usize> {
        self.max_face
    }

    /// The identifier the next call to `next_vertex_id` will return.
    #[inline]
    pub fn peek_vertex_id(&self) -> VertexId {
        VertexId::new(self.max_vertex.map_or(0, |m| m.saturating_add(1)))
    }

    /// The identifier the next call to `next_face_id` will return.
    #[inline]
    pub fn peek_face_id(&self) -> FaceId {
        FaceId::new(self.max_face.map_or(0, |m| m.saturating_add(1)))
    }

    /// Issue a fresh vertex identifier.
    pub fn next_vertex_id(&mut self) -> VertexId {
        let id = self.peek_vertex_id();
        self.max_vertex = Some(id.index());
        id
    }

    /// Issue a fresh face identifier.
    pub fn next_face_id(&mut self) -> FaceId {
        let id = self.peek_face_id();
        self.max_face = Some(id.index());
        id
    }

    /// Record a vertex identifier that was assigned explicitly.
    ///
    /// Fails with [`MeshError::InvalidData`] for identifiers of [`MAX_ID`] or more.
    pub fn observe_vertex(&mut self, id: VertexId) -> Result<()> {
        check_observed("vertex", id.index())?;
        if self.max_vertex.map_or(true, |m| id.index() > m) {
            self.max_vertex = Some(id.index());
        }
        Ok(())
    }

    /// Record a face identifier that was assigned explicitly.
    ///
    /// Fails with [`MeshError::InvalidData`] for identifiers of [`MAX_ID`] or more.
    pub fn observe_face(&mut self, id: FaceId) -> Result<()> {
        check_observed("face", id.index())?;
        if self.max_face.map_or(true, |m| id.index() > m) {
            self.max_face = Some(id.index());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.max_vertex(), None);
        assert_eq!(alloc.next_vertex_id(), VertexId::new(0));
        assert_eq!(alloc.next_vertex_id(), VertexId::new(1));
        assert_eq!(alloc.next_face_id(), FaceId::new(0));
        assert_eq!(alloc.max_vertex(), Some(1));
        assert_eq!(alloc.max_face(), Some(0));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut alloc = IdAllocator::new();
        let peeked = alloc.peek_face_id();
        assert_eq!(alloc.peek_face_id(), peeked);
        assert_eq!(alloc.next_face_id(), peeked);
        assert!(alloc.peek_face_id() > peeked);
    }

    #[test]
    fn test_observe_advances_only_forward() {
        let mut alloc = IdAllocator::new();
        alloc.observe_vertex(VertexId::new(10)).unwrap();
        alloc.observe_vertex(VertexId::new(4)).unwrap();
        assert_eq!(alloc.max_vertex(), Some(10));
        assert_eq!(alloc.next_vertex_id(), VertexId::new(11));
    }

    #[test]
    fn test_continue_from_high_water() {
        let mut alloc = IdAllocator::with_high_water(None, Some(1000)).unwrap();
        assert_eq!(alloc.next_vertex_id(), VertexId::new(0));
        assert_eq!(alloc.next_face_id(), FaceId::new(1001));
    }

    #[test]
    fn test_rejects_ids_without_successor() {
        let mut alloc = IdAllocator::new();
        assert!(alloc.observe_vertex(VertexId::new(usize::MAX)).is_err());
        assert!(alloc.observe_face(FaceId::new(MAX_ID)).is_err());
        assert_eq!(alloc, IdAllocator::new());

        alloc.observe_vertex(VertexId::new(MAX_ID - 1)).unwrap();
        assert_eq!(alloc.next_vertex_id(), VertexId::new(MAX_ID));

        assert!(IdAllocator::with_high_water(Some(usize::MAX), None).is_err());
        assert!(IdAllocator::with_high_water(None, Some(MAX_ID)).is_err());
    }
}
