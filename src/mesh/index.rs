//! Index types for mesh elements.
//!
//! Vertices and faces are identified by type-safe wrappers around an opaque
//! integer. Identifiers are handed out by the mesh's
//! [`IdAllocator`](super::IdAllocator) and are never reused, so an identifier
//! held outside the mesh can never silently refer to a different, later
//! element.

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// A type-safe vertex identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VertexId(usize);

/// A type-safe face identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct FaceId(usize);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create an identifier from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw identifier value.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");
