//! Vertex identities, bases and simplex views

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a vertex. Unique per distinct vertex in a complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexIndex(pub i64);

impl VertexIndex {
    pub fn new(index: i64) -> Self {
        Self(index)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for VertexIndex {
    fn from(index: i64) -> Self {
        Self(index)
    }
}

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One declared grouping of vertices.
///
/// A base is a set: duplicates are ignored and the canonical form is sorted
/// ascending. Its dimension is `len() - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<VertexIndex>", into = "Vec<VertexIndex>")]
pub struct Base(Vec<VertexIndex>);

impl Base {
    pub fn new<I, V>(vertices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexIndex>,
    {
        let mut vertices: Vec<VertexIndex> = vertices.into_iter().map(Into::into).collect();
        vertices.sort_unstable();
        vertices.dedup();
        Self(vertices)
    }

    pub fn vertices(&self) -> &[VertexIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dimension of the simplex this base spans, `None` for the empty base
    pub fn dim(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn contains(&self, vertex: VertexIndex) -> bool {
        self.0.binary_search(&vertex).is_ok()
    }
}

impl From<Vec<VertexIndex>> for Base {
    fn from(vertices: Vec<VertexIndex>) -> Self {
        Base::new(vertices)
    }
}

impl From<Base> for Vec<VertexIndex> {
    fn from(base: Base) -> Self {
        base.0
    }
}

impl<V: Into<VertexIndex>> FromIterator<V> for Base {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Base::new(iter)
    }
}

/// A simplex of a built complex, borrowed from it.
///
/// Identified by `(dim, index)`; `index` is the per-dimension index assigned in
/// first-discovery order and is only meaningful for the complex it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Simplex<'a> {
    pub dim: usize,
    pub index: usize,
    pub base: &'a [VertexIndex],
}

impl<'a> Simplex<'a> {
    /// Whether every vertex of `self` is a vertex of `other`
    pub fn is_face_of(&self, other: &Simplex<'_>) -> bool {
        is_subset(self.base, other.base)
    }

    /// The vertex this simplex is, if it is 0-dimensional
    pub fn as_vertex(&self) -> Option<VertexIndex> {
        if self.dim == 0 {
            self.base.first().copied()
        } else {
            None
        }
    }
}

impl fmt::Display for Simplex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-simplex #{} {{", self.dim, self.index)?;
        for (i, v) in self.base.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}}")
    }
}

/// Subset test over two ascending vertex slices
pub(crate) fn is_subset(small: &[VertexIndex], large: &[VertexIndex]) -> bool {
    if small.len() > large.len() {
        return false;
    }
    let mut rest = large.iter();
    small.iter().all(|v| rest.by_ref().any(|w| w == v))
}
