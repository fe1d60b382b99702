//! # orchestrator - container networks shaped by a simplicial complex
//!
//! Turns a declared complex into an ordered list of resource actions and runs
//! them against a pluggable backend.
//!
//! ## Flow
//!
//! - **Configuration**: declarative records resolved into bases and immutable
//!   per-vertex attributes ([`conf`])
//! - **Planning**: principal simplices become networks, vertices are attached,
//!   optionally cut from the default network, then started ([`Planner`])
//! - **Execution**: actions applied in order, stopping at the first failure
//!   ([`execute`])
//! - **Analysis**: live network memberships read back into a topology report
//!   ([`analyze()`])

pub mod analyze;
pub mod backend;
pub mod conf;
pub mod deploy;
pub mod executor;
pub mod naming;
pub mod plan;

pub use analyze::{analyze, Membership, NameIndex};
pub use backend::{BackendError, DryRunBackend, RecordedCall, ResourceBackend};
pub use conf::{ComplexConf, ContainerConf, NetworkConf, VertexAttributes, VertexSpec};
pub use deploy::{deploy, deploy_with, DeployOptions, Deployment};
pub use executor::{execute, ExecutionSummary};
pub use naming::ResourcePatterns;
pub use plan::{Action, AttributePredicate, NetworkAttributes, Plan, Planner};

use complex::VertexIndex;

/// Main error types for orchestration
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid resource pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to create resource for vertex {vertex} after {bound} succeeded: {source}")]
    Materialize {
        vertex: VertexIndex,
        bound: usize,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Topology(#[from] complex::TopologyError),

    #[error("Network {0} was attached to before it was created")]
    UnknownNetwork(String),

    #[error("Step {step} ({action}) failed: {source}")]
    Execution {
        step: usize,
        action: String,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
