//! Diagnostic report over a built complex

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::homology::{Cycle, HomologyEngine};
use crate::simplex::VertexIndex;
use crate::skeleton::Skeleton;

/// Count of independent holes in one dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleCount {
    pub dim: usize,
    pub count: usize,
}

/// Structural summary of a topology: sizes, connectivity and holes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyReport {
    pub vertex_count: usize,
    /// Principal simplices, i.e. the groupings that are not implied by a larger one
    pub network_count: usize,
    pub components: usize,
    pub euler_characteristic: i64,
    pub betti_numbers: Vec<usize>,
    pub holes: Vec<HoleCount>,
    pub minimal_cycles: Vec<Cycle>,
    /// `minimal_cycles` rendered as `a->b->c->a`
    pub minimal_paths: Vec<String>,
}

impl TopologyReport {
    pub fn new(skeleton: &Skeleton) -> Self {
        Self::with_labels(skeleton, |v| v.to_string())
    }

    /// Build the report, rendering cycle paths with `label`
    pub fn with_labels<F>(skeleton: &Skeleton, mut label: F) -> Self
    where
        F: FnMut(VertexIndex) -> String,
    {
        let betti_numbers = HomologyEngine::betti_numbers(skeleton);
        let minimal_cycles = HomologyEngine::minimal_basis(skeleton);
        let minimal_paths = minimal_cycles
            .iter()
            .map(|cycle| cycle.render_with(&mut label))
            .collect();

        let holes = betti_numbers
            .iter()
            .enumerate()
            .skip(1)
            .map(|(dim, count)| HoleCount { dim, count: *count })
            .collect();

        Self {
            vertex_count: skeleton.vertex_count(),
            network_count: skeleton.principal_simplices().len(),
            components: betti_numbers.first().copied().unwrap_or(0),
            euler_characteristic: skeleton.euler_characteristic(),
            betti_numbers,
            holes,
            minimal_cycles,
            minimal_paths,
        }
    }

    /// Total number of holes across dimensions
    pub fn hole_total(&self) -> usize {
        self.holes.iter().map(|h| h.count).sum()
    }
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Container count: {}", self.vertex_count)?;
        writeln!(f, "Network count: {}", self.network_count)?;
        writeln!(f, "Connected networks count: {}", self.components)?;
        writeln!(f, "Euler characteristic: {}", self.euler_characteristic)?;
        if !self.holes.is_empty() {
            writeln!(f, "Hole count:")?;
            for hole in &self.holes {
                writeln!(f, "\t- {}D: {}", hole.dim, hole.count)?;
            }
        }
        if !self.minimal_paths.is_empty() {
            writeln!(f, "Minimal paths around 1-dimensional holes:")?;
            for path in &self.minimal_paths {
                writeln!(f, "\t- {}", path)?;
            }
        }
        Ok(())
    }
}
