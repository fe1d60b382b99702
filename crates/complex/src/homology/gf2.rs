//! Dense vectors over GF(2) and incremental elimination

/// A vector over the binary field, packed into 64-bit words
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gf2Vector {
    len: usize,
    words: Vec<u64>,
}

impl Gf2Vector {
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    pub fn from_ones<I: IntoIterator<Item = usize>>(len: usize, ones: I) -> Self {
        let mut v = Self::zeros(len);
        for i in ones {
            v.flip(i);
        }
        v
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    pub fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    pub fn flip(&mut self, i: usize) {
        self.words[i / 64] ^= 1u64 << (i % 64);
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Number of ones
    pub fn weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Position of the highest one, used as the elimination pivot
    pub fn pivot(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + 63 - w.leading_zeros() as usize)
    }

    pub fn xor_assign(&mut self, other: &Gf2Vector) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
    }

    /// Positions of the ones, ascending
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            let mut rest = w;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + bit)
            })
        })
    }
}

/// A set of linearly independent vectors kept in echelon form by pivot.
///
/// Inserting reduces the candidate against the stored rows; a candidate that
/// reduces to zero is dependent and rejected.
#[derive(Debug, Clone, Default)]
pub struct EchelonBasis {
    rows: Vec<Option<Gf2Vector>>,
    rank: usize,
}

impl EchelonBasis {
    pub fn new(len: usize) -> Self {
        Self {
            rows: vec![None; len],
            rank: 0,
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Reduce `v` against the stored rows
    pub fn reduce(&self, mut v: Gf2Vector) -> Gf2Vector {
        while let Some(p) = v.pivot() {
            match &self.rows[p] {
                Some(row) => v.xor_assign(row),
                None => break,
            }
        }
        v
    }

    /// Insert `v`; returns false when it is already in the span
    pub fn insert(&mut self, v: Gf2Vector) -> bool {
        let reduced = self.reduce(v);
        match reduced.pivot() {
            Some(p) => {
                self.rows[p] = Some(reduced);
                self.rank += 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, v: &Gf2Vector) -> bool {
        self.reduce(v.clone()).is_zero()
    }
}

/// Rank over GF(2) of the matrix with the given columns
pub fn rank<I: IntoIterator<Item = Gf2Vector>>(len: usize, columns: I) -> usize {
    let mut basis = EchelonBasis::new(len);
    for column in columns {
        basis.insert(column);
    }
    basis.rank()
}
