//! Declarative configuration records and their resolution
//!
//! Parsing a file into these records is left to the caller (any serde format
//! works). Resolution turns the records into the bases of the complex and an
//! immutable per-vertex attribute record consumed by the planner.
//!
//! ```text
//! name = "torus"
//! image = "alpine"
//!
//! [[networks]]
//! containers = [0, 1, 2]
//! label = "big"
//!
//! [[networks]]
//! containers = [2, 3]
//! external = true
//!
//! [[containers]]
//! image = "busybox"
//! containers = [0, 1]
//!
//! [[containers]]
//! bridge = true
//! cmd = ["ash"]
//! network = ["big"]
//! ```

use std::collections::BTreeMap;

use complex::{Base, Skeleton, VertexIndex};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::naming;
use crate::{OrchestratorError, Result};

/// Label key carrying a container declaration's label onto the resource
pub const LABEL_KEY: &str = "simplexnet.label";

/// One declared network: a grouping of vertices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConf {
    #[serde(default)]
    pub containers: Vec<i64>,
    /// External networks keep outside connectivity; all others are internal
    #[serde(default)]
    pub external: bool,
    #[serde(default, rename = "enableIPV6", alias = "enableIpv6")]
    pub enable_ipv6: bool,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl NetworkConf {
    pub fn applies_to_vertex(&self, vertex: VertexIndex) -> bool {
        self.containers.contains(&vertex.get())
    }

    /// Whether every vertex of `base` belongs to this network
    pub fn applies_to_base(&self, base: &[VertexIndex]) -> bool {
        base.iter().all(|v| self.applies_to_vertex(*v))
    }

    pub fn base(&self) -> Base {
        Base::new(self.containers.iter().copied())
    }
}

/// Settings applied to the resources of some vertices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConf {
    #[serde(default)]
    pub image: Option<String>,
    /// Keep the resource attached to the default network
    #[serde(default)]
    pub bridge: bool,
    #[serde(default)]
    pub containers: Vec<i64>,
    /// Labels of networks whose members this declaration applies to
    #[serde(default, rename = "network", alias = "networks")]
    pub networks: Vec<String>,
    #[serde(default)]
    pub cmd: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl ContainerConf {
    fn applies_to_vertex(&self, vertex: VertexIndex) -> bool {
        self.containers.contains(&vertex.get())
    }

    fn applies_to_network(&self, label: &str) -> bool {
        self.networks.iter().any(|l| l == label)
    }
}

/// The full declaration of one complex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexConf {
    pub name: String,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default)]
    pub networks: Vec<NetworkConf>,
    #[serde(default)]
    pub containers: Vec<ContainerConf>,
}

fn default_image() -> String {
    "alpine".to_string()
}

/// Resolved settings for the resource of one vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexSpec {
    pub name: String,
    pub image: String,
    pub cmd: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub bridge: bool,
    pub tty: bool,
    pub open_stdin: bool,
}

/// Immutable per-vertex attributes, produced once by resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAttributes {
    specs: BTreeMap<VertexIndex, VertexSpec>,
}

impl VertexAttributes {
    pub fn new(specs: BTreeMap<VertexIndex, VertexSpec>) -> Self {
        Self { specs }
    }

    pub fn get(&self, vertex: VertexIndex) -> Option<&VertexSpec> {
        self.specs.get(&vertex)
    }

    /// Whether the vertex keeps its default-network connection; false when unknown
    pub fn bridges(&self, vertex: VertexIndex) -> bool {
        self.specs.get(&vertex).is_some_and(|s| s.bridge)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexIndex, &VertexSpec)> {
        self.specs.iter()
    }
}

impl ComplexConf {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: default_image(),
            networks: Vec::new(),
            containers: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_network(mut self, network: NetworkConf) -> Self {
        self.networks.push(network);
        self
    }

    pub fn with_container(mut self, container: ContainerConf) -> Self {
        self.containers.push(container);
        self
    }

    /// Check the complex name can prefix resource names
    pub fn validate(&self) -> Result<()> {
        let valid = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$")?;
        if !valid.is_match(&self.name) {
            return Err(OrchestratorError::Config(format!(
                "Invalid complex name {:?}: must start with a letter or digit and contain only [a-zA-Z0-9_.-]",
                self.name
            )));
        }
        if self.image.trim().is_empty() {
            return Err(OrchestratorError::Config("Default image must not be empty".to_string()));
        }
        Ok(())
    }

    /// One base per declared network, in declaration order
    pub fn bases(&self) -> Vec<Base> {
        self.networks.iter().map(NetworkConf::base).collect()
    }

    /// Resolve the settings for one vertex.
    ///
    /// Starts from the complex's default image. Every container declaration
    /// that lists the vertex, or lists the label of a network containing it,
    /// applies in declaration order: a non-empty image overrides, `cmd` is
    /// replaced, a non-empty label is set, and the bridge flag is overwritten.
    pub fn resolve_vertex(&self, vertex: VertexIndex) -> VertexSpec {
        let mut spec = VertexSpec {
            name: naming::vertex_name(&self.name, vertex),
            image: self.image.clone(),
            cmd: Vec::new(),
            labels: BTreeMap::new(),
            bridge: false,
            tty: true,
            open_stdin: true,
        };

        let network_labels: Vec<&str> = self
            .networks
            .iter()
            .filter(|n| n.applies_to_vertex(vertex))
            .filter_map(|n| n.label.as_deref())
            .filter(|l| !l.is_empty())
            .collect();

        for conf in &self.containers {
            let applies = conf.applies_to_vertex(vertex)
                || network_labels.iter().any(|l| conf.applies_to_network(l));
            if !applies {
                continue;
            }

            if let Some(image) = conf.image.as_deref().filter(|i| !i.is_empty()) {
                spec.image = image.to_string();
            }
            spec.cmd = conf.cmd.clone();
            if let Some(label) = conf.label.as_deref().filter(|l| !l.is_empty()) {
                spec.labels.insert(LABEL_KEY.to_string(), label.to_string());
            }
            spec.bridge = conf.bridge;
        }

        spec
    }

    /// Resolve every vertex of `skeleton`
    pub fn resolve(&self, skeleton: &Skeleton) -> VertexAttributes {
        let specs = skeleton
            .vertices()
            .map(|v| (v, self.resolve_vertex(v)))
            .collect();
        VertexAttributes::new(specs)
    }
}
