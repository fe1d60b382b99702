//! Homology engine - Betti numbers and minimal cycle bases over GF(2)
//!
//! All arithmetic is exact over the binary field, so nothing here can fail on
//! a built complex.

pub mod boundary;
pub mod cycles;
pub mod gf2;

pub use boundary::BoundaryMatrix;
pub use cycles::Cycle;
pub use gf2::{EchelonBasis, Gf2Vector};

use crate::skeleton::Skeleton;

/// Engine for homology computations over a built complex
pub struct HomologyEngine;

impl HomologyEngine {
    /// b_d for every dimension present
    pub fn betti_numbers(skeleton: &Skeleton) -> Vec<usize> {
        boundary::betti_numbers(skeleton)
    }

    /// Number of connected components of the 1-skeleton
    pub fn components(skeleton: &Skeleton) -> usize {
        boundary::betti_number(skeleton, 0)
    }

    /// Minimal representatives of the one-dimensional holes
    pub fn minimal_basis(skeleton: &Skeleton) -> Vec<Cycle> {
        cycles::minimal_basis(skeleton)
    }
}

impl Skeleton {
    pub fn betti_numbers(&self) -> Vec<usize> {
        HomologyEngine::betti_numbers(self)
    }

    pub fn minimal_basis(&self) -> Vec<Cycle> {
        HomologyEngine::minimal_basis(self)
    }
}
