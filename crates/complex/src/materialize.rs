//! Vertex materialization - binding each vertex to one external resource
//!
//! Construction is split in two phases. [`Skeleton::from_bases`] is pure; this
//! pass then walks the vertices once, in index order (which is the order they
//! were first discovered), and calls the binder exactly once per vertex. The
//! binder usually creates a real resource, so calling it twice for the same
//! vertex would be a bug, not a slowdown.

use std::fmt;

use crate::simplex::{Simplex, VertexIndex};
use crate::skeleton::{ChainGroup, Skeleton};
use crate::{Result, TopologyError};

/// Binds a vertex to its payload, typically by creating a resource
pub trait VertexMaterializer<P> {
    type Error;

    fn bind(&mut self, vertex: VertexIndex) -> std::result::Result<P, Self::Error>;
}

impl<P, E, F> VertexMaterializer<P> for F
where
    F: FnMut(VertexIndex) -> std::result::Result<P, E>,
{
    type Error = E;

    fn bind(&mut self, vertex: VertexIndex) -> std::result::Result<P, E> {
        self(vertex)
    }
}

/// The binder failed; construction stopped at `vertex`.
///
/// Resources bound before the failure are not rolled back. Their names follow
/// the naming contract so an external cleanup pass can find them.
#[derive(Debug, thiserror::Error)]
#[error("Failed to materialize vertex {vertex} after binding {bound} vertices: {source}")]
pub struct MaterializeError<E>
where
    E: std::error::Error + 'static,
{
    pub vertex: VertexIndex,
    pub bound: usize,
    #[source]
    pub source: E,
}

/// A complex whose vertices each carry one materialized payload.
///
/// The payload table is filled once, during materialization, and read-only
/// afterwards.
#[derive(Clone)]
pub struct Complex<P> {
    skeleton: Skeleton,
    payloads: Vec<P>,
}

impl<P: fmt::Debug> fmt::Debug for Complex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Complex")
            .field("dimension", &self.skeleton.dimension())
            .field("simplices", &self.skeleton.total_simplices())
            .field("payloads", &self.payloads)
            .finish()
    }
}

impl Skeleton {
    /// Bind every vertex through `binder`, stopping at the first failure
    pub fn materialize<P, M>(self, mut binder: M) -> std::result::Result<Complex<P>, MaterializeError<M::Error>>
    where
        M: VertexMaterializer<P>,
        M::Error: std::error::Error + 'static,
    {
        let mut payloads = Vec::with_capacity(self.vertex_count());

        for vertex in self.vertices() {
            match binder.bind(vertex) {
                Ok(payload) => payloads.push(payload),
                Err(source) => {
                    tracing::warn!(
                        vertex = vertex.get(),
                        bound = payloads.len(),
                        "Vertex binding failed, aborting construction"
                    );
                    return Err(MaterializeError {
                        vertex,
                        bound: payloads.len(),
                        source,
                    });
                }
            }
        }

        tracing::debug!(vertices = payloads.len(), "Materialized all vertices");
        Ok(Complex {
            skeleton: self,
            payloads,
        })
    }
}

impl<P> Complex<P> {
    /// Pair a skeleton with payloads bound elsewhere, one per vertex in index order
    pub fn from_parts(skeleton: Skeleton, payloads: Vec<P>) -> Result<Self> {
        if payloads.len() != skeleton.vertex_count() {
            return Err(TopologyError::PayloadCount {
                expected: skeleton.vertex_count(),
                actual: payloads.len(),
            });
        }
        Ok(Self { skeleton, payloads })
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn into_parts(self) -> (Skeleton, Vec<P>) {
        (self.skeleton, self.payloads)
    }

    /// Payload of the vertex at per-dimension index `index`
    pub fn payload_at(&self, index: usize) -> Option<&P> {
        self.payloads.get(index)
    }

    /// Payload bound to `vertex`
    pub fn payload(&self, vertex: VertexIndex) -> Option<&P> {
        self.payload_at(self.skeleton.vertex_position(vertex)?)
    }

    /// Vertices with their payloads, in index order
    pub fn vertices(&self) -> impl Iterator<Item = (Simplex<'_>, &P)> {
        self.skeleton
            .chain_group(0)
            .into_simplices()
            .into_iter()
            .zip(self.payloads.iter())
    }

    pub fn chain_group(&self, dim: usize) -> ChainGroup<'_> {
        self.skeleton.chain_group(dim)
    }

    pub fn principal_simplices(&self) -> Vec<Simplex<'_>> {
        self.skeleton.principal_simplices()
    }

    /// Every `k`-face of `simplex`, see [`Skeleton::faces`]
    pub fn faces(&self, simplex: &Simplex<'_>, k: usize) -> Vec<Simplex<'_>> {
        self.skeleton.faces(simplex, k)
    }

    /// The 0-faces of `simplex` with their payloads, in index order
    pub fn vertex_faces(&self, simplex: &Simplex<'_>) -> Vec<(Simplex<'_>, &P)> {
        self.skeleton
            .faces(simplex, 0)
            .into_iter()
            .filter_map(|v| Some((v, self.payloads.get(v.index)?)))
            .collect()
    }
}
