use crystal_graph::Lattice;

use crate::Subset;

/// The translation-invariant canonical form of a crystal: a sentinel for the empty
/// crystal, or the sorted set of vectors obtained by subtracting the crystal's `first`
/// vertex from every vertex. Two crystals related by a pure lattice translation always
/// produce equal [TiKey]s.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TiKey(Option<Vec<Vec<i64>>>);

/// Computes the translation-invariant key of `subset` over `lattice`.
pub fn ti_key(subset: &Subset, lattice: &Lattice) -> TiKey {
    let Some(first) = subset.first(lattice) else {
        return TiKey(None);
    };

    let origin = lattice.vector_of(first).to_vec();
    let mut translated: Vec<Vec<i64>> = subset
        .iter()
        .map(|key| {
            let vector = lattice.vector_of(key);
            vector.iter().zip(&origin).map(|(a, b)| a - b).collect()
        })
        .collect();
    translated.sort();

    TiKey(Some(translated))
}
