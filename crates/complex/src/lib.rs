//! # complex - simplicial topology over declared groupings
//!
//! Treats every declared grouping of vertices (containers) as a simplex and
//! reasons about the abstract simplicial complex they generate.
//!
//! ## Core Capabilities
//!
//! - **Construction**: closure of the declared bases, deduplicated, with
//!   deterministic per-dimension indices ([`Skeleton`])
//! - **Materialization**: binding each vertex to one external resource, exactly
//!   once ([`Skeleton::materialize`], [`Complex`])
//! - **Queries**: faces, chain groups and principal simplices
//! - **Homology**: Betti numbers and a minimal cycle basis of H_1 over GF(2)
//!   ([`HomologyEngine`])
//! - **Diagnostics**: a serializable summary of the topology ([`TopologyReport`])

pub mod homology;
pub mod materialize;
pub mod report;
pub mod simplex;
pub mod skeleton;

pub use homology::{BoundaryMatrix, Cycle, Gf2Vector, HomologyEngine};
pub use materialize::{Complex, MaterializeError, VertexMaterializer};
pub use report::{HoleCount, TopologyReport};
pub use simplex::{Base, Simplex, VertexIndex};
pub use skeleton::{ChainGroup, Skeleton};

/// Error types for complex operations
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Payload count mismatch: expected {expected} vertices, got {actual} payloads")]
    PayloadCount { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TopologyError>;
