//! Deterministic resource naming
//!
//! External cleanup recovers resources by matching live names against these
//! patterns, so the formats here are a contract:
//!
//! - network: `{complex}_{dimension}-simplex_{index}`
//! - vertex resource: `{complex}_{vertex}`

use complex::VertexIndex;
use regex::Regex;

use crate::Result;

/// Name of the network created for a principal simplex
pub fn network_name(complex: &str, dim: usize, index: usize) -> String {
    format!("{}_{}-simplex_{}", complex, dim, index)
}

/// Name of the resource bound to a vertex
pub fn vertex_name(complex: &str, vertex: VertexIndex) -> String {
    format!("{}_{}", complex, vertex)
}

/// Host-side bridge interface name for a network: `{complex}{|base|}i{index}`
pub fn bridge_interface_name(complex: &str, base_len: usize, index: usize) -> String {
    format!("{}{}i{}", complex, base_len, index)
}

/// Anchored matchers for the names of one complex's resources
#[derive(Debug, Clone)]
pub struct ResourcePatterns {
    network: Regex,
    vertex: Regex,
}

impl ResourcePatterns {
    pub fn new(complex: &str) -> Result<Self> {
        let name = regex::escape(complex);
        Ok(Self {
            network: Regex::new(&format!(r"^{}_([0-9]+)-simplex_([0-9]+)$", name))?,
            // Runtimes may report resource names with a leading slash
            vertex: Regex::new(&format!(r"^/?{}_(-?[0-9]+)$", name))?,
        })
    }

    pub fn is_network(&self, name: &str) -> bool {
        self.network.is_match(name)
    }

    pub fn is_vertex(&self, name: &str) -> bool {
        self.vertex.is_match(name)
    }

    /// Recover `(dimension, index)` from a network name
    pub fn parse_network(&self, name: &str) -> Option<(usize, usize)> {
        let caps = self.network.captures(name)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }

    /// Recover the vertex from a resource name
    pub fn parse_vertex(&self, name: &str) -> Option<VertexIndex> {
        let caps = self.vertex.captures(name)?;
        caps[1].parse().ok().map(VertexIndex)
    }
}
