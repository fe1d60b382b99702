//! Orchestration planning
//!
//! Turns a materialized complex into an ordered, deterministic list of
//! resource actions. Nothing here touches a backend; see [`crate::executor`].

use std::collections::BTreeMap;
use std::fmt;

use complex::{Complex, VertexIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::conf::{NetworkConf, VertexAttributes};
use crate::naming;

/// Driver option naming the host-side bridge interface
pub const BRIDGE_NAME_OPTION: &str = "com.docker.network.bridge.name";
/// Driver option prefixing the interfaces created inside attached resources
pub const INTERFACE_PREFIX_OPTION: &str = "com.docker.network.container_interface_prefix";

const DEFAULT_INTERFACE_PREFIX: &str = "cx";

/// Chooses network attributes for the principal simplices it matches
pub trait AttributePredicate {
    /// Whether these attributes apply to the network over `base`
    fn matches(&self, base: &[VertexIndex]) -> bool;

    /// External networks keep outside connectivity
    fn external(&self) -> bool;

    fn enable_ipv6(&self) -> bool {
        false
    }

    fn driver(&self) -> Option<&str> {
        None
    }
}

impl AttributePredicate for NetworkConf {
    fn matches(&self, base: &[VertexIndex]) -> bool {
        self.applies_to_base(base)
    }

    fn external(&self) -> bool {
        self.external
    }

    fn enable_ipv6(&self) -> bool {
        self.enable_ipv6
    }

    fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }
}

/// Attributes a network is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttributes {
    pub internal: bool,
    pub attachable: bool,
    #[serde(default)]
    pub enable_ipv6: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// One step of a plan. `R` identifies existing resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action<R> {
    CreateNetwork {
        name: String,
        attributes: NetworkAttributes,
    },
    /// Attach a resource to a network created earlier in the same plan
    Attach { network: String, resource: R },
    DisconnectDefault { network: R, resource: R, force: bool },
    Start { resource: R },
}

impl<R> Action<R> {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateNetwork { .. } => "create_network",
            Action::Attach { .. } => "attach",
            Action::DisconnectDefault { .. } => "disconnect_default",
            Action::Start { .. } => "start",
        }
    }
}

impl<R: fmt::Display> fmt::Display for Action<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateNetwork { name, attributes } => {
                let scope = if attributes.internal { "internal" } else { "external" };
                write!(f, "create network {} ({})", name, scope)
            }
            Action::Attach { network, resource } => write!(f, "attach {} to {}", resource, network),
            Action::DisconnectDefault { network, resource, force } => {
                write!(f, "disconnect {} from {}", resource, network)?;
                if *force {
                    write!(f, " (forced)")?;
                }
                Ok(())
            }
            Action::Start { resource } => write!(f, "start {}", resource),
        }
    }
}

/// Ordered actions for one complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan<R> {
    pub complex_name: String,
    pub actions: Vec<Action<R>>,
}

impl<R> Plan<R> {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action<R>> {
        self.actions.iter()
    }

    pub fn network_count(&self) -> usize {
        self.count(|a| matches!(a, Action::CreateNetwork { .. }))
    }

    pub fn start_count(&self) -> usize {
        self.count(|a| matches!(a, Action::Start { .. }))
    }

    fn count(&self, pred: impl Fn(&Action<R>) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}

/// Builds plans for one named complex
#[derive(Debug, Clone)]
pub struct Planner<R> {
    complex_name: String,
    default_network: R,
    interface_prefix: String,
}

impl<R: Clone> Planner<R> {
    pub fn new(complex_name: impl Into<String>, default_network: R) -> Self {
        Self {
            complex_name: complex_name.into(),
            default_network,
            interface_prefix: DEFAULT_INTERFACE_PREFIX.to_string(),
        }
    }

    pub fn with_interface_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.interface_prefix = prefix.into();
        self
    }

    /// Plan the networks and resource lifecycle of `complex`.
    ///
    /// Every principal simplex of dimension at least one becomes a network;
    /// the first predicate matching its base decides whether the network is
    /// internal, and networks no predicate matches are not internal. Each
    /// vertex is attached to all networks containing it before it is started.
    pub fn plan<A>(&self, complex: &Complex<R>, predicates: &[A], attributes: &VertexAttributes) -> Plan<R>
    where
        A: AttributePredicate,
    {
        let mut actions = Vec::new();

        for simplex in complex.principal_simplices() {
            if simplex.dim == 0 {
                continue;
            }

            let name = naming::network_name(&self.complex_name, simplex.dim, simplex.index);
            let predicate = predicates.iter().find(|p| p.matches(simplex.base));
            if predicate.is_none() {
                debug!(network = %name, "No network declaration matches, creating as non-internal");
            }

            let mut options = BTreeMap::new();
            options.insert(INTERFACE_PREFIX_OPTION.to_string(), self.interface_prefix.clone());
            options.insert(
                BRIDGE_NAME_OPTION.to_string(),
                naming::bridge_interface_name(&self.complex_name, simplex.base.len(), simplex.index),
            );

            actions.push(Action::CreateNetwork {
                name: name.clone(),
                attributes: NetworkAttributes {
                    internal: predicate.is_some_and(|p| !p.external()),
                    attachable: true,
                    enable_ipv6: predicate.is_some_and(|p| p.enable_ipv6()),
                    driver: predicate.and_then(|p| p.driver()).map(str::to_string),
                    options,
                },
            });

            for (_, resource) in complex.vertex_faces(&simplex) {
                actions.push(Action::Attach {
                    network: name.clone(),
                    resource: resource.clone(),
                });
            }
        }

        for (vertex, resource) in complex.vertices() {
            let bridges = vertex
                .as_vertex()
                .is_some_and(|v| attributes.bridges(v));
            if !bridges {
                actions.push(Action::DisconnectDefault {
                    network: self.default_network.clone(),
                    resource: resource.clone(),
                    force: true,
                });
            }
            actions.push(Action::Start {
                resource: resource.clone(),
            });
        }

        let plan = Plan {
            complex_name: self.complex_name.clone(),
            actions,
        };
        info!(
            complex = %self.complex_name,
            networks = plan.network_count(),
            resources = plan.start_count(),
            actions = plan.len(),
            "Planned complex"
        );
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{ComplexConf, ContainerConf};
    use complex::{Base, Skeleton};

    fn materialize(conf: &ComplexConf) -> (Complex<String>, VertexAttributes) {
        let skeleton = Skeleton::from_bases(conf.bases());
        let attributes = conf.resolve(&skeleton);
        let complex = skeleton
            .materialize(|v: VertexIndex| Ok::<_, std::io::Error>(format!("id-{}", v)))
            .unwrap();
        (complex, attributes)
    }

    fn sample() -> ComplexConf {
        ComplexConf::new("net")
            .with_network(NetworkConf {
                containers: vec![0, 1, 2],
                ..Default::default()
            })
            .with_network(NetworkConf {
                containers: vec![2, 3],
                external: true,
                ..Default::default()
            })
            .with_container(ContainerConf {
                bridge: true,
                containers: vec![3],
                ..Default::default()
            })
    }

    #[test]
    fn test_plan_for_principal_example() {
        let conf = sample();
        let (complex, attributes) = materialize(&conf);
        let plan = Planner::new("net", "bridge".to_string()).plan(&complex, &conf.networks, &attributes);

        let networks: Vec<(&str, bool)> = plan
            .iter()
            .filter_map(|a| match a {
                Action::CreateNetwork { name, attributes } => Some((name.as_str(), attributes.internal)),
                _ => None,
            })
            .collect();
        // {2,3} is the fourth edge discovered, after the triangle's three
        assert_eq!(networks, vec![("net_1-simplex_3", false), ("net_2-simplex_0", true)]);
        assert_eq!(plan.start_count(), 4);

        let attaches: Vec<(&str, &str)> = plan
            .iter()
            .filter_map(|a| match a {
                Action::Attach { network, resource } => Some((network.as_str(), resource.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            attaches,
            vec![
                ("net_1-simplex_3", "id-2"),
                ("net_1-simplex_3", "id-3"),
                ("net_2-simplex_0", "id-0"),
                ("net_2-simplex_0", "id-1"),
                ("net_2-simplex_0", "id-2"),
            ]
        );
    }

    #[test]
    fn test_attach_precedes_start() {
        let conf = sample();
        let (complex, attributes) = materialize(&conf);
        let plan = Planner::new("net", "bridge".to_string()).plan(&complex, &conf.networks, &attributes);

        for (vertex, resource) in complex.vertices() {
            let start = plan
                .actions
                .iter()
                .position(|a| matches!(a, Action::Start { resource: r } if r == resource))
                .unwrap();
            for (i, action) in plan.actions.iter().enumerate() {
                if let Action::Attach { resource: r, .. } = action {
                    if r == resource {
                        assert!(i < start, "vertex {} attached after start", vertex);
                    }
                }
            }
        }
    }

    #[test]
    fn test_bridging_vertex_keeps_default_network() {
        let conf = sample();
        let (complex, attributes) = materialize(&conf);
        let plan = Planner::new("net", "bridge".to_string()).plan(&complex, &conf.networks, &attributes);

        let disconnected: Vec<&str> = plan
            .iter()
            .filter_map(|a| match a {
                Action::DisconnectDefault { network, resource, force } => {
                    assert_eq!(network, "bridge");
                    assert!(force);
                    Some(resource.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(disconnected, vec!["id-0", "id-1", "id-2"]);
    }

    #[test]
    fn test_unmatched_network_is_not_internal() {
        let conf = sample();
        let (complex, attributes) = materialize(&conf);
        let plan = Planner::new("net", "bridge".to_string()).plan::<NetworkConf>(&complex, &[], &attributes);

        assert!(plan.iter().all(|a| match a {
            Action::CreateNetwork { attributes, .. } => !attributes.internal && attributes.attachable,
            _ => true,
        }));
    }

    #[test]
    fn test_network_options() {
        let conf = sample();
        let (complex, attributes) = materialize(&conf);
        let plan = Planner::new("net", "bridge".to_string())
            .with_interface_prefix("eth")
            .plan(&complex, &conf.networks, &attributes);

        let Some(Action::CreateNetwork { attributes, .. }) = plan.actions.first() else {
            panic!("plan should open with a network");
        };
        assert_eq!(attributes.options.get(INTERFACE_PREFIX_OPTION).map(String::as_str), Some("eth"));
        assert_eq!(attributes.options.get(BRIDGE_NAME_OPTION).map(String::as_str), Some("net2i3"));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let conf = sample();
        let render = || {
            let (complex, attributes) = materialize(&conf);
            let plan = Planner::new("net", "bridge".to_string()).plan(&complex, &conf.networks, &attributes);
            serde_json::to_string(&plan).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_isolated_vertex_gets_no_network() {
        let skeleton = Skeleton::from_bases([Base::new([7])]);
        let complex = skeleton
            .materialize(|v: VertexIndex| Ok::<_, std::io::Error>(v.to_string()))
            .unwrap();
        let plan = Planner::new("solo", "bridge".to_string()).plan::<NetworkConf>(
            &complex,
            &[],
            &VertexAttributes::default(),
        );

        assert_eq!(plan.network_count(), 0);
        assert_eq!(
            plan.actions,
            vec![
                Action::DisconnectDefault {
                    network: "bridge".to_string(),
                    resource: "7".to_string(),
                    force: true,
                },
                Action::Start {
                    resource: "7".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_action_serializes_tagged() {
        let action: Action<String> = Action::Start {
            resource: "abc".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "start", "resource": "abc" }));
        assert_eq!(action.to_string(), "start abc");
    }
}
