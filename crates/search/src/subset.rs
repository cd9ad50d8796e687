use crystal_collections::VecSet;
use crystal_graph::Lattice;
use crystal_graph::VertexKey;
use crystal_sim::Direction;

/// An immutable crystal: an unordered set of interned lattice vertex keys.
///
/// Equality and hashing follow from the underlying sorted-vector set, which is
/// equivalent to equality over the contained vector-set as long as every compared
/// subset was interned through the same [Lattice] (always true within one search).
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Subset(VecSet<VertexKey>);

impl Subset {
    /// The empty crystal.
    pub fn empty() -> Self {
        Self(VecSet::new())
    }

    /// Builds a crystal from a list of seed vertex keys (duplicates collapse).
    pub fn of(seed: impl IntoIterator<Item = VertexKey>) -> Self {
        let mut set = VecSet::new();
        for key in seed {
            set.insert(key);
        }
        Self(set)
    }

    /// The number of vertices in this crystal.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: VertexKey) -> bool {
        self.0.contains(&key)
    }

    /// A new crystal with `key` added. A no-op clone if `key` was already present.
    pub fn add(&self, key: VertexKey) -> Self {
        let mut set = self.0.clone();
        set.insert(key);
        Self(set)
    }

    /// A new crystal with `key` removed. A no-op clone if `key` was absent.
    pub fn remove(&self, key: VertexKey) -> Self {
        let mut set = self.0.clone();
        set.remove(&key);
        Self(set)
    }

    /// Iterates over the contained vertex keys, in the set's internal dense-key order
    /// (not the lexicographic vector order `iter_sorted` produces).
    pub fn iter(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.0.iter().copied()
    }

    /// The deterministic canonical element of a nonempty crystal: the smallest vertex
    /// in lexicographic order on the underlying vectors. `None` for the empty crystal.
    pub fn first(&self, lattice: &Lattice) -> Option<VertexKey> {
        self.iter().min_by_key(|&key| lattice.vector_of(key).to_vec())
    }

    /// The contained vertices, sorted in lexicographic order on their underlying
    /// vectors (used for the textual dump format).
    pub fn iter_sorted(&self, lattice: &Lattice) -> Vec<VertexKey> {
        let mut keys: Vec<VertexKey> = self.iter().collect();
        keys.sort_by_key(|&key| lattice.vector_of(key).to_vec());
        keys
    }

    /// The symmetric difference between `a` and `b`, tagged with the direction that
    /// turns `a` into `b`: [Direction::Forwards] for an element in `b \ a`,
    /// [Direction::Backwards] for an element in `a \ b`.
    pub fn diff(a: &Subset, b: &Subset) -> Vec<(Direction, VertexKey)> {
        let mut result = Vec::new();
        for key in a.iter() {
            if !b.contains(key) {
                result.push((Direction::Backwards, key));
            }
        }
        for key in b.iter() {
            if !a.contains(key) {
                result.push((Direction::Forwards, key));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crystal_graph::UniformNeighborhood;

    use super::*;

    fn lattice() -> Lattice {
        Lattice::new(UniformNeighborhood::square())
    }

    #[test]
    fn test_add_then_remove_is_identity() {
        let mut lattice = lattice();
        let v = lattice.intern(vec![1, 0]);
        let subset = Subset::empty();

        assert_eq!(subset.add(v).remove(v), subset);
        assert_eq!(subset.remove(v).add(v), subset);
    }

    #[test]
    fn test_first_is_lexicographic_minimum() {
        let mut lattice = lattice();
        let a = lattice.intern(vec![2, 0]);
        let b = lattice.intern(vec![0, 5]);
        let c = lattice.intern(vec![0, -1]);

        let subset = Subset::of([a, b, c]);
        assert_eq!(subset.first(&lattice), Some(c));
    }

    #[test]
    fn test_iter_sorted_is_lexicographic() {
        let mut lattice = lattice();
        let a = lattice.intern(vec![1, 0]);
        let b = lattice.intern(vec![0, 1]);
        let c = lattice.intern(vec![0, 0]);

        let subset = Subset::of([a, b, c]);
        let sorted = subset.iter_sorted(&lattice);
        let vectors: Vec<_> = sorted.iter().map(|&k| lattice.vector_of(k).to_vec()).collect();
        assert_eq!(vectors, vec![vec![0, 0], vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_diff_tags_directions_correctly() {
        let mut lattice = lattice();
        let a = lattice.intern(vec![0, 0]);
        let b = lattice.intern(vec![1, 0]);
        let c = lattice.intern(vec![0, 1]);

        let from = Subset::of([a, b]);
        let to = Subset::of([a, c]);

        let mut diff = Subset::diff(&from, &to);
        diff.sort_by_key(|&(_, key)| key);

        let mut expected = vec![(Direction::Backwards, b), (Direction::Forwards, c)];
        expected.sort_by_key(|&(_, key)| key);

        assert_eq!(diff, expected);
    }

    #[test]
    fn test_diff_is_empty_for_equal_subsets() {
        let mut lattice = lattice();
        let a = lattice.intern(vec![0, 0]);
        let subset = Subset::of([a]);
        assert!(Subset::diff(&subset, &subset).is_empty());
    }
}
