//! Minimal cycle basis of the first homology group
//!
//! Candidates are the cycles closed by one non-tree edge in a breadth-first
//! shortest-path tree rooted at each vertex. That candidate set contains a
//! shortest basis of H_1, so a greedy pass over the candidates in
//! (length, vertex sequence) order, keeping those independent modulo the
//! boundaries of the 2-simplices, yields a minimal basis.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::boundary::betti_number;
use super::gf2::{EchelonBasis, Gf2Vector};
use crate::simplex::VertexIndex;
use crate::skeleton::Skeleton;

/// A closed edge walk in the 1-skeleton.
///
/// `vertices` is the canonical cyclic sequence: it starts at the smallest
/// vertex and continues toward the smaller of that vertex's two neighbours.
/// The walk closes from the last vertex back to the first. `edges` holds the
/// 1-simplex indices in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cycle {
    pub vertices: Vec<VertexIndex>,
    pub edges: Vec<usize>,
}

impl Cycle {
    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The closed walk, first vertex repeated at the end
    pub fn closed_walk(&self) -> Vec<VertexIndex> {
        let mut walk = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            walk.push(*first);
        }
        walk
    }

    /// Render as `a->b->c->a` with a custom vertex label
    pub fn render_with<F>(&self, mut label: F) -> String
    where
        F: FnMut(VertexIndex) -> String,
    {
        self.closed_walk()
            .into_iter()
            .map(&mut label)
            .collect::<Vec<_>>()
            .join("->")
    }

    /// Walk an edge set that forms one simple cycle into canonical order
    fn from_edge_set(skeleton: &Skeleton, edge_set: &[usize]) -> Option<Self> {
        let mut incident: Vec<(VertexIndex, VertexIndex, usize)> = Vec::with_capacity(edge_set.len());
        for &e in edge_set {
            let edge = skeleton.simplex(1, e)?;
            incident.push((edge.base[0], edge.base[1], e));
        }

        let start = incident.iter().map(|(a, _, _)| *a).min()?;
        let neighbours_of = |v: VertexIndex| {
            let mut out: Vec<(VertexIndex, usize)> = incident
                .iter()
                .filter_map(|&(a, b, e)| {
                    if a == v {
                        Some((b, e))
                    } else if b == v {
                        Some((a, e))
                    } else {
                        None
                    }
                })
                .collect();
            out.sort();
            out
        };

        let mut vertices = vec![start];
        let mut edges = Vec::with_capacity(edge_set.len());
        let mut current = start;
        let mut via: Option<usize> = None;

        loop {
            let (next, edge) = neighbours_of(current)
                .into_iter()
                .find(|(_, e)| Some(*e) != via)?;
            edges.push(edge);
            if next == start {
                break;
            }
            if edges.len() >= edge_set.len() {
                return None;
            }
            vertices.push(next);
            current = next;
            via = Some(edge);
        }

        if edges.len() != edge_set.len() {
            return None;
        }

        Some(Self { vertices, edges })
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with(|v| v.to_string()))
    }
}

/// 1-skeleton adjacency over vertex positions, neighbours in vertex order
struct Graph {
    adjacency: Vec<Vec<(usize, usize)>>,
    endpoints: Vec<(usize, usize)>,
}

impl Graph {
    fn new(skeleton: &Skeleton) -> Self {
        let mut adjacency = vec![Vec::new(); skeleton.vertex_count()];
        let mut endpoints = Vec::with_capacity(skeleton.simplex_count(1));

        for edge in skeleton.chain_group(1).iter() {
            let a = skeleton.vertex_position(edge.base[0]).unwrap_or_default();
            let b = skeleton.vertex_position(edge.base[1]).unwrap_or_default();
            adjacency[a].push((b, edge.index));
            adjacency[b].push((a, edge.index));
            endpoints.push((a, b));
        }

        for neighbours in adjacency.iter_mut() {
            neighbours.sort_by_key(|(w, _)| skeleton.simplex(0, *w).map(|s| s.base[0]));
        }

        Self { adjacency, endpoints }
    }

    /// Edge sets of the cycles closed by non-tree edges of the BFS tree at `root`
    fn tree_cycles(&self, root: usize, out: &mut HashSet<Vec<usize>>) {
        let n = self.adjacency.len();
        let mut parent: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut depth: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();

        depth[root] = Some(0);
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            let d = depth[v].unwrap_or_default();
            for &(w, e) in &self.adjacency[v] {
                if depth[w].is_none() {
                    depth[w] = Some(d + 1);
                    parent[w] = Some((v, e));
                    queue.push_back(w);
                }
            }
        }

        for (e, &(a, b)) in self.endpoints.iter().enumerate() {
            if depth[a].is_none() || depth[b].is_none() {
                continue;
            }
            if parent[a].map(|(_, pe)| pe) == Some(e) || parent[b].map(|(_, pe)| pe) == Some(e) {
                continue;
            }

            // Climb both endpoints to their lowest common ancestor
            let mut cycle = vec![e];
            let (mut x, mut y) = (a, b);
            while x != y {
                let (dx, dy) = (depth[x].unwrap_or_default(), depth[y].unwrap_or_default());
                if dx >= dy {
                    let Some((px, pe)) = parent[x] else { break };
                    cycle.push(pe);
                    x = px;
                } else {
                    let Some((py, pe)) = parent[y] else { break };
                    cycle.push(pe);
                    y = py;
                }
            }

            cycle.sort_unstable();
            out.insert(cycle);
        }
    }
}

/// A minimal basis of H_1, empty when b_1 = 0.
///
/// Each representative is a simple cycle in the 1-skeleton; together they are
/// independent modulo the boundaries of the present 2-simplices and have the
/// smallest total edge count. Equal-length candidates are ordered by their
/// canonical vertex sequence.
pub fn minimal_basis(skeleton: &Skeleton) -> Vec<Cycle> {
    let wanted = betti_number(skeleton, 1);
    if wanted == 0 {
        return Vec::new();
    }

    let graph = Graph::new(skeleton);
    let mut edge_sets = HashSet::new();
    for root in 0..skeleton.vertex_count() {
        graph.tree_cycles(root, &mut edge_sets);
    }

    let mut candidates: Vec<Cycle> = edge_sets
        .iter()
        .filter_map(|set| Cycle::from_edge_set(skeleton, set))
        .collect();
    candidates.sort_by(|a, b| (a.len(), &a.vertices).cmp(&(b.len(), &b.vertices)));

    tracing::debug!(
        betti_1 = wanted,
        candidates = candidates.len(),
        "Searching minimal cycle basis"
    );

    // Boundaries of filled triangles span the cycles that are not holes
    let edge_count = skeleton.simplex_count(1);
    let mut span = EchelonBasis::new(edge_count);
    for triangle in skeleton.chain_group(2).iter() {
        let edges = skeleton.faces(triangle, 1).into_iter().map(|s| s.index);
        span.insert(Gf2Vector::from_ones(edge_count, edges));
    }

    let mut basis = Vec::with_capacity(wanted);
    for cycle in candidates {
        if span.insert(Gf2Vector::from_ones(edge_count, cycle.edges.iter().copied())) {
            basis.push(cycle);
            if basis.len() == wanted {
                break;
            }
        }
    }

    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplex::Base;

    fn skeleton(list: &[&[i64]]) -> Skeleton {
        Skeleton::from_bases(list.iter().map(|b| Base::new(b.iter().copied())))
    }

    fn walk(cycle: &Cycle) -> Vec<i64> {
        cycle.vertices.iter().map(|v| v.get()).collect()
    }

    #[test]
    fn test_no_hole_no_basis() {
        assert!(minimal_basis(&skeleton(&[&[0, 1, 2]])).is_empty());
        assert!(minimal_basis(&skeleton(&[&[0, 1], &[2, 3]])).is_empty());
        assert!(minimal_basis(&Skeleton::new()).is_empty());
    }

    #[test]
    fn test_unfilled_triangle() {
        let basis = minimal_basis(&skeleton(&[&[0, 1], &[1, 2], &[2, 0]]));
        assert_eq!(basis.len(), 1);
        assert_eq!(walk(&basis[0]), vec![0, 1, 2]);
        assert_eq!(basis[0].to_string(), "0->1->2->0");
    }

    #[test]
    fn test_square() {
        let basis = minimal_basis(&skeleton(&[&[3, 0], &[1, 2], &[2, 3], &[0, 1]]));
        assert_eq!(basis.len(), 1);
        assert_eq!(walk(&basis[0]), vec![0, 1, 2, 3]);
        assert_eq!(basis[0].len(), 4);
    }

    #[test]
    fn test_prefers_short_cycles_over_outer_loop() {
        // Two hollow triangles sharing the edge {0,2}
        let basis = minimal_basis(&skeleton(&[&[0, 1], &[1, 2], &[2, 0], &[2, 3], &[3, 0]]));
        assert_eq!(basis.len(), 2);
        assert_eq!(walk(&basis[0]), vec![0, 1, 2]);
        assert_eq!(walk(&basis[1]), vec![0, 2, 3]);
    }

    #[test]
    fn test_filled_triangle_is_skipped() {
        // {0,1,2} is filled, so the only hole is around 0,2,3
        let basis = minimal_basis(&skeleton(&[&[0, 1, 2], &[2, 3], &[3, 0]]));
        assert_eq!(basis.len(), 1);
        assert_eq!(walk(&basis[0]), vec![0, 2, 3]);
    }

    #[test]
    fn test_two_separate_holes() {
        let basis = minimal_basis(&skeleton(&[
            &[0, 1], &[1, 2], &[2, 0],
            &[10, 11], &[11, 12], &[12, 13], &[13, 10],
        ]));
        assert_eq!(basis.len(), 2);
        assert_eq!(basis[0].len(), 3);
        assert_eq!(walk(&basis[1]), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_hollow_tetrahedron_has_no_one_dimensional_hole() {
        let s = skeleton(&[&[0, 1, 2], &[0, 1, 3], &[0, 2, 3], &[1, 2, 3]]);
        assert!(minimal_basis(&s).is_empty());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let input: &[&[i64]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0], &[0, 4], &[4, 2], &[1, 5], &[5, 3]];
        let first = minimal_basis(&skeleton(input));
        for _ in 0..5 {
            assert_eq!(minimal_basis(&skeleton(input)), first);
        }
        assert_eq!(first.len(), 3);
        assert_eq!(first.iter().map(Cycle::len).sum::<usize>(), 12);
    }

    #[test]
    fn test_render_with_labels() {
        let basis = minimal_basis(&skeleton(&[&[0, 1], &[1, 2], &[2, 0]]));
        let rendered = basis[0].render_with(|v| format!("web_{}", v));
        assert_eq!(rendered, "web_0->web_1->web_2->web_0");
    }
}
