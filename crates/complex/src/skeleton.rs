//! Complex construction and topology queries
//!
//! A [`Skeleton`] is the payload-free simplicial complex induced by a list of
//! bases. Construction is pure: it only assigns per-dimension indices. Binding
//! vertices to real resources is a separate pass (see [`crate::materialize`]).

use indexmap::IndexSet;

use crate::simplex::{Base, Simplex, VertexIndex};

/// The simplicial complex induced by a list of bases, without vertex payloads.
///
/// Every non-empty subset of every input base is present exactly once.
/// Layer `d` holds the `d`-simplices; a simplex's per-dimension index is its
/// position in the layer, assigned in first-discovery order.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    layers: Vec<IndexSet<Box<[VertexIndex]>>>,
}

/// The ordered `d`-simplices of a complex, generating the GF(2) chain group
#[derive(Debug, Clone)]
pub struct ChainGroup<'a> {
    pub dim: usize,
    simplices: Vec<Simplex<'a>>,
}

impl<'a> ChainGroup<'a> {
    /// Number of generators
    pub fn rank(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    pub fn simplices(&self) -> &[Simplex<'a>] {
        &self.simplices
    }

    pub fn iter(&self) -> impl Iterator<Item = &Simplex<'a>> {
        self.simplices.iter()
    }

    pub fn into_simplices(self) -> Vec<Simplex<'a>> {
        self.simplices
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Build the closure of `bases`.
    ///
    /// Bases are processed in order. Within a base, subsets are discovered by
    /// size ascending, then in lexicographic order of the sorted base, so the
    /// result is deterministic for a fixed input order. Empty and repeated
    /// bases are accepted and contribute nothing new.
    pub fn from_bases<I, B>(bases: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Base>,
    {
        let mut skeleton = Self::new();
        let mut declared = 0usize;
        for base in bases {
            skeleton.insert(&base.into());
            declared += 1;
        }

        tracing::debug!(
            declared_bases = declared,
            dimension = ?skeleton.dimension(),
            simplices = skeleton.total_simplices(),
            "Built simplicial skeleton"
        );

        skeleton
    }

    /// Add a base and all of its faces
    fn insert(&mut self, base: &Base) {
        let vertices = base.vertices();
        let Some(top) = base.dim() else {
            return;
        };

        // Closure means a present base already carries all of its faces
        if self.index_of(top, vertices).is_some() {
            return;
        }

        while self.layers.len() <= top {
            self.layers.push(IndexSet::new());
        }

        for size in 1..=vertices.len() {
            for combo in Combinations::new(vertices.len(), size) {
                let face: Box<[VertexIndex]> = combo.iter().map(|&i| vertices[i]).collect();
                self.layers[size - 1].insert(face);
            }
        }
    }

    /// Highest dimension present, `None` for the empty complex
    pub fn dimension(&self) -> Option<usize> {
        self.layers.len().checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of `dim`-simplices
    pub fn simplex_count(&self, dim: usize) -> usize {
        self.layers.get(dim).map_or(0, |layer| layer.len())
    }

    pub fn total_simplices(&self) -> usize {
        self.layers.iter().map(|layer| layer.len()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.simplex_count(0)
    }

    /// Look up a simplex by dimension and per-dimension index
    pub fn simplex(&self, dim: usize, index: usize) -> Option<Simplex<'_>> {
        let base = self.layers.get(dim)?.get_index(index)?;
        Some(Simplex {
            dim,
            index,
            base,
        })
    }

    /// Look up the simplex spanning exactly `base`
    pub fn find(&self, base: &Base) -> Option<Simplex<'_>> {
        let dim = base.dim()?;
        let index = self.index_of(dim, base.vertices())?;
        self.simplex(dim, index)
    }

    pub fn contains(&self, base: &Base) -> bool {
        self.find(base).is_some()
    }

    /// Per-dimension index of the simplex spanning `vertices` (must be sorted)
    pub(crate) fn index_of(&self, dim: usize, vertices: &[VertexIndex]) -> Option<usize> {
        self.layers.get(dim)?.get_index_of(vertices)
    }

    /// Per-dimension index of a vertex
    pub fn vertex_position(&self, vertex: VertexIndex) -> Option<usize> {
        self.index_of(0, &[vertex])
    }

    /// All vertices, in index order
    pub fn vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.layers
            .first()
            .into_iter()
            .flat_map(|layer| layer.iter().map(|v| v[0]))
    }

    /// The ordered `dim`-simplices
    pub fn chain_group(&self, dim: usize) -> ChainGroup<'_> {
        let simplices = match self.layers.get(dim) {
            Some(layer) => layer
                .iter()
                .enumerate()
                .map(|(index, base)| Simplex { dim, index, base })
                .collect(),
            None => Vec::new(),
        };
        ChainGroup { dim, simplices }
    }

    /// Every `k`-simplex whose vertex set is contained in `simplex`'s, in index order.
    ///
    /// For `k == simplex.dim` this is the simplex itself; for `k > simplex.dim`
    /// it is empty.
    pub fn faces(&self, simplex: &Simplex<'_>, k: usize) -> Vec<Simplex<'_>> {
        let vertices = simplex.base;
        if k >= vertices.len() {
            return Vec::new();
        }

        let mut faces: Vec<Simplex<'_>> = Combinations::new(vertices.len(), k + 1)
            .filter_map(|combo| {
                let face: Vec<VertexIndex> = combo.iter().map(|&i| vertices[i]).collect();
                let index = self.index_of(k, &face)?;
                self.simplex(k, index)
            })
            .collect();
        faces.sort_by_key(|s| s.index);
        faces
    }

    /// Simplices that are not a proper face of any other simplex.
    ///
    /// Ordered by dimension, then per-dimension index. By closure it is enough
    /// to check the simplices one dimension up.
    pub fn principal_simplices(&self) -> Vec<Simplex<'_>> {
        let mut principal = Vec::new();

        for (dim, layer) in self.layers.iter().enumerate() {
            let mut covered = vec![false; layer.len()];

            if let Some(cofaces) = self.layers.get(dim + 1) {
                for coface in cofaces {
                    for skip in 0..coface.len() {
                        let face: Vec<VertexIndex> = coface
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != skip)
                            .map(|(_, v)| *v)
                            .collect();
                        if let Some(index) = layer.get_index_of(face.as_slice()) {
                            covered[index] = true;
                        }
                    }
                }
            }

            principal.extend(
                layer
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !covered[*index])
                    .map(|(index, base)| Simplex { dim, index, base }),
            );
        }

        principal
    }

    /// Alternating sum of simplex counts
    pub fn euler_characteristic(&self) -> i64 {
        self.layers
            .iter()
            .enumerate()
            .map(|(dim, layer)| {
                let n = layer.len() as i64;
                if dim % 2 == 0 { n } else { -n }
            })
            .sum()
    }
}

/// Lexicographic `k`-combinations of `0..n`
pub(crate) struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        let current = if k <= n { Some((0..k).collect()) } else { None };
        Self { n, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let combo = self.current.take()?;
        let k = combo.len();

        // Advance to the next combination, if any
        let mut next = combo.clone();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if next[i] < self.n - k + i {
                next[i] += 1;
                for j in i + 1..k {
                    next[j] = next[j - 1] + 1;
                }
                self.current = Some(next);
                break;
            }
        }

        Some(combo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(list: &[&[i64]]) -> Vec<Base> {
        list.iter().map(|b| Base::new(b.iter().copied())).collect()
    }

    fn vs(list: &[i64]) -> Vec<VertexIndex> {
        list.iter().copied().map(VertexIndex).collect()
    }

    #[test]
    fn test_combinations() {
        let all: Vec<_> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        assert_eq!(Combinations::new(3, 0).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn test_empty_input_yields_empty_complex() {
        let skeleton = Skeleton::from_bases(Vec::<Base>::new());
        assert!(skeleton.is_empty());
        assert_eq!(skeleton.dimension(), None);
        assert!(skeleton.principal_simplices().is_empty());
        assert_eq!(skeleton.euler_characteristic(), 0);
    }

    #[test]
    fn test_closure() {
        let input = bases(&[&[0, 1, 2, 3], &[3, 4], &[5]]);
        let skeleton = Skeleton::from_bases(input.clone());

        for base in &input {
            let v = base.vertices();
            for size in 1..=v.len() {
                for combo in Combinations::new(v.len(), size) {
                    let subset = Base::new(combo.iter().map(|&i| v[i]));
                    assert!(skeleton.contains(&subset), "missing {:?}", subset);
                }
            }
        }

        // 15 faces of the tetrahedron, plus {4}, {3,4} and {5}
        assert_eq!(skeleton.total_simplices(), 18);
        assert_eq!(skeleton.dimension(), Some(3));
    }

    #[test]
    fn test_dedup_across_orderings() {
        let skeleton = Skeleton::from_bases(bases(&[&[2, 0, 1], &[1, 2, 0], &[0, 2]]));
        assert_eq!(skeleton.simplex_count(2), 1);
        assert_eq!(skeleton.simplex_count(1), 3);
        assert_eq!(skeleton.simplex_count(0), 3);
    }

    #[test]
    fn test_degenerate_bases() {
        let skeleton = Skeleton::from_bases(bases(&[&[], &[7, 7, 7], &[]]));
        assert_eq!(skeleton.dimension(), Some(0));
        assert_eq!(skeleton.vertices().collect::<Vec<_>>(), vs(&[7]));
    }

    #[test]
    fn test_first_discovery_order() {
        let skeleton = Skeleton::from_bases(bases(&[&[5, 3], &[3, 9]]));
        assert_eq!(skeleton.vertices().collect::<Vec<_>>(), vs(&[3, 5, 9]));
        assert_eq!(skeleton.simplex(1, 0).unwrap().base, vs(&[3, 5]).as_slice());
        assert_eq!(skeleton.simplex(1, 1).unwrap().base, vs(&[3, 9]).as_slice());
        assert_eq!(skeleton.vertex_position(VertexIndex(9)), Some(2));
        assert_eq!(skeleton.vertex_position(VertexIndex(4)), None);
    }

    #[test]
    fn test_faces() {
        let skeleton = Skeleton::from_bases(bases(&[&[0, 1, 2], &[2, 3]]));
        let triangle = skeleton.simplex(2, 0).unwrap();

        let vertices = skeleton.faces(&triangle, 0);
        assert_eq!(vertices.len(), 3);
        assert!(vertices.iter().all(|v| v.dim == 0));
        assert_eq!(vertices.iter().map(|v| v.index).collect::<Vec<_>>(), vec![0, 1, 2]);

        let edges = skeleton.faces(&triangle, 1);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.is_face_of(&triangle)));

        assert_eq!(skeleton.faces(&triangle, 2), vec![triangle]);
        assert!(skeleton.faces(&triangle, 3).is_empty());
    }

    #[test]
    fn test_principal_simplices_exclude_subsumed_faces() {
        let skeleton = Skeleton::from_bases(bases(&[&[0, 1, 2], &[2, 3]]));
        let principal = skeleton.principal_simplices();

        assert_eq!(principal.len(), 2);
        assert_eq!(principal[0].dim, 1);
        assert_eq!(principal[0].base, vs(&[2, 3]).as_slice());
        assert_eq!(principal[1].dim, 2);
        assert_eq!(principal[1].base, vs(&[0, 1, 2]).as_slice());

        for edge in [[0, 1], [0, 2], [1, 2]] {
            assert!(!principal.iter().any(|s| s.base == vs(&edge).as_slice()));
        }
    }

    #[test]
    fn test_isolated_vertex_is_principal() {
        let skeleton = Skeleton::from_bases(bases(&[&[0, 1], &[4]]));
        let principal = skeleton.principal_simplices();
        assert_eq!(principal.len(), 2);
        assert_eq!(principal[0].as_vertex(), Some(VertexIndex(4)));
        assert_eq!(principal[1].dim, 1);
    }

    #[test]
    fn test_chain_group_and_euler() {
        let skeleton = Skeleton::from_bases(bases(&[&[0, 1], &[1, 2], &[2, 0]]));
        let edges = skeleton.chain_group(1);
        assert_eq!(edges.rank(), 3);
        assert!(skeleton.chain_group(2).is_empty());
        // 3 vertices - 3 edges
        assert_eq!(skeleton.euler_characteristic(), 0);

        let filled = Skeleton::from_bases(bases(&[&[0, 1, 2]]));
        assert_eq!(filled.euler_characteristic(), 1);
    }
}
