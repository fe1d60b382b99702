//! End-to-end deployment of one declared complex

use complex::{Complex, Skeleton, TopologyReport};
use serde::Serialize;
use tracing::{info, warn};

use crate::backend::ResourceBackend;
use crate::conf::{ComplexConf, VertexAttributes};
use crate::executor::{execute, ExecutionSummary};
use crate::plan::{Plan, Planner};
use crate::{OrchestratorError, Result};

/// Everything a deployment produced
#[derive(Debug)]
pub struct Deployment {
    pub complex: Complex<String>,
    pub plan: Plan<String>,
    pub summary: ExecutionSummary,
    pub report: TopologyReport,
}

/// Serializable view of a [`Deployment`]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutput<'a> {
    pub plan: &'a Plan<String>,
    pub summary: &'a ExecutionSummary,
    pub report: &'a TopologyReport,
}

impl Deployment {
    pub fn output(&self) -> DeploymentOutput<'_> {
        DeploymentOutput {
            plan: &self.plan,
            summary: &self.summary,
            report: &self.report,
        }
    }
}

/// Create one resource per vertex, in vertex index order.
///
/// Stops at the first failure. Resources created before it are left in place
/// under their contract names.
pub async fn materialize<B>(
    conf: &ComplexConf,
    skeleton: Skeleton,
    attributes: &VertexAttributes,
    backend: &B,
) -> Result<Complex<String>>
where
    B: ResourceBackend + ?Sized,
{
    let mut ids = Vec::with_capacity(skeleton.vertex_count());

    for vertex in skeleton.vertices() {
        let spec = attributes
            .get(vertex)
            .cloned()
            .unwrap_or_else(|| conf.resolve_vertex(vertex));
        match backend.create_resource(&spec.name, &spec).await {
            Ok(id) => ids.push(id),
            Err(source) => {
                warn!(vertex = vertex.get(), bound = ids.len(), "Resource creation failed");
                return Err(OrchestratorError::Materialize {
                    vertex,
                    bound: ids.len(),
                    source,
                });
            }
        }
    }

    Ok(Complex::from_parts(skeleton, ids)?)
}

/// Knobs that are not part of a declaration
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Prefix for interfaces created inside attached resources
    pub interface_prefix: Option<String>,
}

/// Build, materialize, plan and execute `conf` against `backend`
pub async fn deploy<B>(conf: &ComplexConf, backend: &B) -> Result<Deployment>
where
    B: ResourceBackend + ?Sized,
{
    deploy_with(conf, backend, &DeployOptions::default()).await
}

pub async fn deploy_with<B>(conf: &ComplexConf, backend: &B, options: &DeployOptions) -> Result<Deployment>
where
    B: ResourceBackend + ?Sized,
{
    conf.validate()?;

    let skeleton = Skeleton::from_bases(conf.bases());
    let attributes = conf.resolve(&skeleton);
    let report = TopologyReport::new(&skeleton);
    info!(
        complex = %conf.name,
        vertices = skeleton.vertex_count(),
        dimension = ?skeleton.dimension(),
        "Deploying complex"
    );

    let complex = materialize(conf, skeleton, &attributes, backend).await?;
    let default_network = backend.default_network().await?;
    let mut planner = Planner::new(conf.name.clone(), default_network);
    if let Some(prefix) = &options.interface_prefix {
        planner = planner.with_interface_prefix(prefix.clone());
    }
    let plan = planner.plan(&complex, &conf.networks, &attributes);
    let summary = execute(&plan, backend).await?;

    Ok(Deployment {
        complex,
        plan,
        summary,
        report,
    })
}
