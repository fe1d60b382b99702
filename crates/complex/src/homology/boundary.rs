//! Boundary operators and Betti numbers over GF(2)

use super::gf2::{self, Gf2Vector};
use crate::skeleton::Skeleton;

/// Matrix of the boundary operator δ_d.
///
/// Rows are the (d-1)-simplices, columns the d-simplices, both in
/// per-dimension index order. Entry (i, j) is 1 iff row simplex i is a face of
/// column simplex j.
#[derive(Debug, Clone)]
pub struct BoundaryMatrix {
    pub dim: usize,
    rows: usize,
    columns: Vec<Gf2Vector>,
}

impl BoundaryMatrix {
    /// Build δ_dim. δ_0 and operators above the top dimension are zero maps.
    pub fn new(skeleton: &Skeleton, dim: usize) -> Self {
        if dim == 0 {
            return Self {
                dim,
                rows: 0,
                columns: vec![Gf2Vector::zeros(0); skeleton.simplex_count(0)],
            };
        }

        let rows = skeleton.simplex_count(dim - 1);
        let columns = skeleton
            .chain_group(dim)
            .iter()
            .map(|simplex| {
                let faces = (0..simplex.base.len()).filter_map(|skip| {
                    let face: Vec<_> = simplex
                        .base
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, v)| *v)
                        .collect();
                    skeleton.index_of(dim - 1, &face)
                });
                Gf2Vector::from_ones(rows, faces)
            })
            .collect();

        Self { dim, rows, columns }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, j: usize) -> &Gf2Vector {
        &self.columns[j]
    }

    pub fn entry(&self, i: usize, j: usize) -> bool {
        self.columns[j].get(i)
    }

    /// Rank by Gaussian elimination over GF(2)
    pub fn rank(&self) -> usize {
        gf2::rank(self.rows, self.columns.iter().cloned())
    }
}

/// b_d for every dimension 0..=dim, empty for the empty complex.
///
/// b_d = n_d - rank δ_d - rank δ_{d+1}.
pub fn betti_numbers(skeleton: &Skeleton) -> Vec<usize> {
    let Some(top) = skeleton.dimension() else {
        return Vec::new();
    };

    // ranks[d] = rank δ_d, with δ_0 and δ_{top+1} zero
    let mut ranks = vec![0usize; top + 2];
    for (dim, rank) in ranks.iter_mut().enumerate().take(top + 1).skip(1) {
        *rank = BoundaryMatrix::new(skeleton, dim).rank();
    }

    (0..=top)
        .map(|dim| skeleton.simplex_count(dim) - ranks[dim] - ranks[dim + 1])
        .collect()
}

/// b_dim alone, 0 for dimensions not present
pub fn betti_number(skeleton: &Skeleton, dim: usize) -> usize {
    let count = skeleton.simplex_count(dim);
    if count == 0 {
        return 0;
    }
    let down = if dim == 0 { 0 } else { BoundaryMatrix::new(skeleton, dim).rank() };
    let up = BoundaryMatrix::new(skeleton, dim + 1).rank();
    count - down - up
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplex::Base;

    fn skeleton(list: &[&[i64]]) -> Skeleton {
        Skeleton::from_bases(list.iter().map(|b| Base::new(b.iter().copied())))
    }

    #[test]
    fn test_boundary_of_triangle() {
        let s = skeleton(&[&[0, 1, 2]]);
        let d2 = BoundaryMatrix::new(&s, 2);
        assert_eq!(d2.rows(), 3);
        assert_eq!(d2.cols(), 1);
        assert_eq!(d2.column(0).weight(), 3);
        assert_eq!(d2.rank(), 1);

        let d1 = BoundaryMatrix::new(&s, 1);
        assert_eq!(d1.rank(), 2);
        // Edge {0,1} has vertices 0 and 1 as faces
        assert!(d1.entry(0, 0));
        assert!(d1.entry(1, 0));
        assert!(!d1.entry(2, 0));
    }

    #[test]
    fn test_two_components() {
        assert_eq!(betti_numbers(&skeleton(&[&[0, 1], &[2, 3]])), vec![2, 0]);
    }

    #[test]
    fn test_unfilled_triangle_has_hole() {
        let s = skeleton(&[&[0, 1], &[1, 2], &[2, 0]]);
        assert_eq!(betti_numbers(&s), vec![1, 1]);
        assert_eq!(betti_number(&s, 1), 1);
    }

    #[test]
    fn test_filled_triangle_has_no_hole() {
        assert_eq!(betti_numbers(&skeleton(&[&[0, 1, 2]])), vec![1, 0, 0]);
    }

    #[test]
    fn test_hollow_tetrahedron_encloses_void() {
        let hollow = skeleton(&[&[0, 1, 2], &[0, 1, 3], &[0, 2, 3], &[1, 2, 3]]);
        assert_eq!(betti_numbers(&hollow), vec![1, 0, 1]);

        let solid = skeleton(&[&[0, 1, 2, 3]]);
        assert_eq!(betti_numbers(&solid), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_isolated_vertices() {
        let s = skeleton(&[&[4], &[9], &[1, 2]]);
        assert_eq!(betti_numbers(&s), vec![3, 0]);
        assert_eq!(betti_number(&s, 0), 3);
        assert_eq!(betti_number(&s, 5), 0);
    }

    #[test]
    fn test_betti_agrees_with_euler_characteristic() {
        let s = skeleton(&[&[0, 1, 2], &[2, 3], &[3, 4], &[4, 2], &[5, 6, 7, 8]]);
        let betti = betti_numbers(&s);
        let alternating: i64 = betti
            .iter()
            .enumerate()
            .map(|(d, b)| if d % 2 == 0 { *b as i64 } else { -(*b as i64) })
            .sum();
        assert_eq!(alternating, s.euler_characteristic());
        assert_eq!(betti[0], 2);
        assert_eq!(betti[1], 1);
    }

    #[test]
    fn test_empty_complex() {
        assert!(betti_numbers(&Skeleton::new()).is_empty());
    }
}
