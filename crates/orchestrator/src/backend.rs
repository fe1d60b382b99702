//! Resource backend seam
//!
//! The planner and executor only ever talk to a [`ResourceBackend`]. A real
//! container runtime implements it out of tree; [`DryRunBackend`] records the
//! calls it receives and is what the CLI and the tests run against.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::conf::VertexSpec;
use crate::plan::NetworkAttributes;

#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: &'static str, reason: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Operations the orchestrator needs from a container runtime.
///
/// Identifiers are opaque strings chosen by the backend.
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Create (but do not start) the resource for one vertex
    async fn create_resource(&self, name: &str, spec: &VertexSpec) -> BackendResult<String>;

    /// The network every new resource is attached to by default
    async fn default_network(&self) -> BackendResult<String>;

    async fn create_network(&self, name: &str, attributes: &NetworkAttributes) -> BackendResult<String>;

    async fn connect(&self, network: &str, resource: &str) -> BackendResult<()>;

    async fn disconnect(&self, network: &str, resource: &str, force: bool) -> BackendResult<()>;

    async fn start(&self, resource: &str) -> BackendResult<()>;
}

/// One call received by a [`DryRunBackend`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RecordedCall {
    CreateResource { name: String, image: String },
    DefaultNetwork,
    CreateNetwork { name: String, internal: bool },
    Connect { network: String, resource: String },
    Disconnect { network: String, resource: String, force: bool },
    Start { resource: String },
}

/// In-memory backend that records every call.
///
/// Identifiers are the requested names, so recorded calls read like the plan.
/// `fail_at(n)` makes the `n`-th call (zero-based) fail.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    fail_at: Option<usize>,
}

pub const DRY_RUN_DEFAULT_NETWORK: &str = "bridge";

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Calls received so far, in order
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, operation: &'static str, call: RecordedCall) -> BackendResult<()> {
        let mut calls = self.calls.lock().await;
        if self.fail_at == Some(calls.len()) {
            return Err(BackendError::Rejected {
                operation,
                reason: format!("injected failure at call {}", calls.len()),
            });
        }
        calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl ResourceBackend for DryRunBackend {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn create_resource(&self, name: &str, spec: &VertexSpec) -> BackendResult<String> {
        self.record(
            "create_resource",
            RecordedCall::CreateResource {
                name: name.to_string(),
                image: spec.image.clone(),
            },
        )
        .await?;
        Ok(name.to_string())
    }

    async fn default_network(&self) -> BackendResult<String> {
        self.record("default_network", RecordedCall::DefaultNetwork).await?;
        Ok(DRY_RUN_DEFAULT_NETWORK.to_string())
    }

    async fn create_network(&self, name: &str, attributes: &NetworkAttributes) -> BackendResult<String> {
        self.record(
            "create_network",
            RecordedCall::CreateNetwork {
                name: name.to_string(),
                internal: attributes.internal,
            },
        )
        .await?;
        Ok(name.to_string())
    }

    async fn connect(&self, network: &str, resource: &str) -> BackendResult<()> {
        self.record(
            "connect",
            RecordedCall::Connect {
                network: network.to_string(),
                resource: resource.to_string(),
            },
        )
        .await
    }

    async fn disconnect(&self, network: &str, resource: &str, force: bool) -> BackendResult<()> {
        self.record(
            "disconnect",
            RecordedCall::Disconnect {
                network: network.to_string(),
                resource: resource.to_string(),
                force,
            },
        )
        .await
    }

    async fn start(&self, resource: &str) -> BackendResult<()> {
        self.record(
            "start",
            RecordedCall::Start {
                resource: resource.to_string(),
            },
        )
        .await
    }
}
