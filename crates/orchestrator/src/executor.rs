//! Sequential plan execution

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::ResourceBackend;
use crate::plan::{Action, Plan};
use crate::{OrchestratorError, Result};

/// What an execution did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    /// Created networks by name, in creation order, with their backend ids
    pub networks: IndexMap<String, String>,
    pub attached: usize,
    pub disconnected: usize,
    pub started: usize,
}

impl ExecutionSummary {
    pub fn steps(&self) -> usize {
        self.networks.len() + self.attached + self.disconnected + self.started
    }
}

/// Apply `plan` in order, stopping at the first failing action.
///
/// Nothing already applied is undone; the error carries the zero-based step.
pub async fn execute<B>(plan: &Plan<String>, backend: &B) -> Result<ExecutionSummary>
where
    B: ResourceBackend + ?Sized,
{
    let mut summary = ExecutionSummary::default();
    info!(
        complex = %plan.complex_name,
        backend = backend.name(),
        actions = plan.len(),
        "Executing plan"
    );

    for (step, action) in plan.iter().enumerate() {
        debug!(step, %action, "Applying action");
        let outcome = match action {
            Action::CreateNetwork { name, attributes } => backend
                .create_network(name, attributes)
                .await
                .map(|id| {
                    summary.networks.insert(name.clone(), id);
                }),
            Action::Attach { network, resource } => {
                let id = summary
                    .networks
                    .get(network)
                    .ok_or_else(|| OrchestratorError::UnknownNetwork(network.clone()))?
                    .clone();
                backend.connect(&id, resource).await.map(|()| summary.attached += 1)
            }
            Action::DisconnectDefault {
                network,
                resource,
                force,
            } => backend
                .disconnect(network, resource, *force)
                .await
                .map(|()| summary.disconnected += 1),
            Action::Start { resource } => backend.start(resource).await.map(|()| summary.started += 1),
        };

        if let Err(source) = outcome {
            warn!(step, %action, error = %source, "Action failed, aborting plan");
            return Err(OrchestratorError::Execution {
                step,
                action: action.to_string(),
                source,
            });
        }
    }

    info!(
        networks = summary.networks.len(),
        started = summary.started,
        "Plan executed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DryRunBackend, RecordedCall};
    use crate::plan::NetworkAttributes;
    use std::collections::BTreeMap;

    fn attributes() -> NetworkAttributes {
        NetworkAttributes {
            internal: true,
            attachable: true,
            enable_ipv6: false,
            driver: None,
            options: BTreeMap::new(),
        }
    }

    fn plan() -> Plan<String> {
        Plan {
            complex_name: "t".to_string(),
            actions: vec![
                Action::CreateNetwork {
                    name: "t_1-simplex_0".to_string(),
                    attributes: attributes(),
                },
                Action::Attach {
                    network: "t_1-simplex_0".to_string(),
                    resource: "t_0".to_string(),
                },
                Action::Attach {
                    network: "t_1-simplex_0".to_string(),
                    resource: "t_1".to_string(),
                },
                Action::DisconnectDefault {
                    network: "bridge".to_string(),
                    resource: "t_0".to_string(),
                    force: true,
                },
                Action::Start {
                    resource: "t_0".to_string(),
                },
                Action::Start {
                    resource: "t_1".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_execute_in_order() {
        let backend = DryRunBackend::new();
        let summary = execute(&plan(), &backend).await.unwrap();

        assert_eq!(summary.networks.get("t_1-simplex_0").map(String::as_str), Some("t_1-simplex_0"));
        assert_eq!(summary.attached, 2);
        assert_eq!(summary.disconnected, 1);
        assert_eq!(summary.started, 2);
        assert_eq!(summary.steps(), 6);

        let calls = backend.calls().await;
        assert_eq!(calls.len(), 6);
        assert!(matches!(calls[0], RecordedCall::CreateNetwork { internal: true, .. }));
        assert_eq!(
            calls[5],
            RecordedCall::Start {
                resource: "t_1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_execute_stops_at_first_failure() {
        let backend = DryRunBackend::new().fail_at(2);
        let err = execute(&plan(), &backend).await.unwrap_err();

        match err {
            OrchestratorError::Execution { step, action, .. } => {
                assert_eq!(step, 2);
                assert_eq!(action, "attach t_1 to t_1-simplex_0");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing after the failing step reaches the backend
        assert_eq!(backend.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_attach_to_unknown_network() {
        let plan = Plan {
            complex_name: "t".to_string(),
            actions: vec![Action::Attach {
                network: "missing".to_string(),
                resource: "t_0".to_string(),
            }],
        };
        let err = execute(&plan, &DryRunBackend::new()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownNetwork(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_execute_through_trait_object() {
        let backend: Box<dyn ResourceBackend> = Box::new(DryRunBackend::new());
        let summary = execute(&plan(), backend.as_ref()).await.unwrap();
        assert_eq!(summary.started, 2);
    }
}
