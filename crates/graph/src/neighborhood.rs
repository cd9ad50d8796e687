use crystal_utilities::CrystalError;

/// An ordered list of d-dimensional offset vectors, closed under negation.
///
/// Built from a *basis* (the user- or built-in-supplied half of the directions); the
/// negations are appended in the same order, so offset `i` and offset `degree/2 + i`
/// are always opposite. This ordering is what makes neighbor lists deterministic.
#[derive(Debug, Clone)]
pub struct UniformNeighborhood {
    dimension: usize,
    offsets: Vec<Vec<i64>>,
}

fn negate(v: &[i64]) -> Vec<i64> {
    v.iter().map(|c| -c).collect()
}

impl UniformNeighborhood {
    /// Builds a neighborhood from a basis of offset vectors, adding the negation of
    /// each. Rejects an empty basis, a basis containing the zero vector, vectors of
    /// mismatched dimension, or a basis containing both a direction and its own
    /// negation (which would otherwise appear twice in the closure).
    pub fn from_basis(basis: Vec<Vec<i64>>) -> Result<Self, CrystalError> {
        if basis.is_empty() {
            return Err(CrystalError::InvalidConfiguration("lattice basis must not be empty".into()));
        }

        let dimension = basis[0].len();
        if dimension == 0 {
            return Err(CrystalError::InvalidConfiguration("lattice basis vectors must have dimension >= 1".into()));
        }

        for v in &basis {
            if v.len() != dimension {
                return Err(CrystalError::InvalidConfiguration(format!(
                    "lattice basis vectors must share a common dimension, found {} and {}",
                    dimension,
                    v.len()
                )));
            }

            if v.iter().all(|&c| c == 0) {
                return Err(CrystalError::InvalidConfiguration("lattice basis must not contain the zero vector".into()));
            }
        }

        for i in 0..basis.len() {
            for j in (i + 1)..basis.len() {
                if basis[i] == basis[j] || basis[i] == negate(&basis[j]) {
                    return Err(CrystalError::InvalidConfiguration(format!(
                        "lattice basis contains a duplicate direction: {:?} and {:?}",
                        basis[i], basis[j]
                    )));
                }
            }
        }

        let mut offsets = basis.clone();
        offsets.extend(basis.iter().map(|v| negate(v)));

        Ok(Self { dimension, offsets })
    }

    /// The dimension `d` of the underlying `Z^d`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The degree `D`: the number of offsets (basis directions plus their negations).
    pub fn degree(&self) -> usize {
        self.offsets.len()
    }

    /// The offsets in declaration order (basis, then negations in the same order).
    pub fn offsets(&self) -> &[Vec<i64>] {
        &self.offsets
    }

    /// The square lattice (`d=2`, degree 4).
    pub fn square() -> Self {
        Self::from_basis(vec![vec![1, 0], vec![0, 1]]).expect("built-in square basis is valid")
    }

    /// The simple cubic lattice (`d=3`, degree 6).
    pub fn cubic() -> Self {
        Self::from_basis(vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]).expect("built-in cubic basis is valid")
    }

    /// The triangular lattice (`d=2`, degree 6).
    pub fn triangular() -> Self {
        Self::from_basis(vec![vec![1, 0], vec![1, 1], vec![0, 1]]).expect("built-in triangular basis is valid")
    }

    /// The face-centred cubic lattice (`d=3`, degree 12).
    pub fn fcc() -> Self {
        Self::from_basis(vec![
            vec![1, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
            vec![-1, 0, 1],
            vec![1, -1, 0],
            vec![0, 1, -1],
        ])
        .expect("built-in fcc basis is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_has_degree_four() {
        let neighborhood = UniformNeighborhood::square();
        assert_eq!(neighborhood.dimension(), 2);
        assert_eq!(neighborhood.degree(), 4);
    }

    #[test]
    fn test_fcc_has_degree_twelve() {
        let neighborhood = UniformNeighborhood::fcc();
        assert_eq!(neighborhood.dimension(), 3);
        assert_eq!(neighborhood.degree(), 12);
    }

    #[test]
    fn test_offsets_closed_under_negation() {
        for neighborhood in [
            UniformNeighborhood::square(),
            UniformNeighborhood::cubic(),
            UniformNeighborhood::triangular(),
            UniformNeighborhood::fcc(),
        ] {
            for offset in neighborhood.offsets() {
                let neg = negate(offset);
                assert!(
                    neighborhood.offsets().contains(&neg),
                    "negation of {offset:?} missing from neighborhood"
                );
            }
        }
    }

    #[test]
    fn test_empty_basis_rejected() {
        assert!(UniformNeighborhood::from_basis(vec![]).is_err());
    }

    #[test]
    fn test_zero_vector_rejected() {
        assert!(UniformNeighborhood::from_basis(vec![vec![0, 0]]).is_err());
    }

    #[test]
    fn test_mismatched_dimension_rejected() {
        assert!(UniformNeighborhood::from_basis(vec![vec![1, 0], vec![0, 0, 1]]).is_err());
    }

    #[test]
    fn test_duplicate_direction_rejected() {
        assert!(UniformNeighborhood::from_basis(vec![vec![1, 0], vec![1, 0]]).is_err());
        assert!(UniformNeighborhood::from_basis(vec![vec![1, 0], vec![-1, 0]]).is_err());
    }
}
