use crystal_collections::IndexedSet;
use crystal_collections::SetIndex;
use crystal_utilities::CrystalError;

use crate::UniformNeighborhood;

/// A dense, interned key for a lattice vertex.
///
/// Aliases [`crystal_collections::SetIndex`] the same way `merc_ldd`'s `LddIndex` aliases
/// it for node-table indices: the interning table never removes entries, so the index
/// allocated for a vector is stable and dense for the lifetime of the [Lattice].
pub type VertexKey = SetIndex;

/// A vertex-transitive infinite graph: a [UniformNeighborhood] plus a grow-only table
/// interning `Z^d` vectors into dense [VertexKey]s, and a per-key cache of materialised
/// neighbor lists.
pub struct Lattice {
    neighborhood: UniformNeighborhood,
    vertices: IndexedSet<Vec<i64>>,
    neighbor_cache: Vec<Option<Vec<VertexKey>>>,
}

impl Lattice {
    /// Creates a lattice over the given neighborhood, interning the origin as key 0.
    pub fn new(neighborhood: UniformNeighborhood) -> Self {
        let mut vertices = IndexedSet::new();
        let origin = vec![0; neighborhood.dimension()];
        let (origin_key, _) = vertices.insert(origin);
        debug_assert_eq!(usize::from(origin_key), 0, "the origin must be interned as key 0");

        Self {
            neighborhood,
            vertices,
            neighbor_cache: vec![None],
        }
    }

    /// The dimension `d` of the underlying `Z^d`.
    pub fn dimension(&self) -> usize {
        self.neighborhood.dimension()
    }

    /// The degree `D` of the neighborhood.
    pub fn degree(&self) -> usize {
        self.neighborhood.degree()
    }

    /// The key of the origin vector `(0, ..., 0)`.
    pub fn origin(&self) -> VertexKey {
        self.vertices.index(&vec![0i64; self.dimension()]).expect("the origin is always interned")
    }

    /// Interns `vector`, returning its existing key if already known or allocating a
    /// fresh one otherwise.
    ///
    /// `vector` must have the lattice's dimension; a mismatch is a programming error.
    pub fn intern(&mut self, vector: Vec<i64>) -> VertexKey {
        debug_assert_eq!(vector.len(), self.dimension(), "vertex vector has the wrong dimension for this lattice");

        let (key, inserted) = self.vertices.insert(vector);
        if inserted {
            debug_assert_eq!(usize::from(key), self.neighbor_cache.len());
            self.neighbor_cache.push(None);
        }
        key
    }

    /// Validates that `vector` has the lattice's dimension, returning a typed error
    /// instead of asserting (for vectors arriving from an external configuration, such
    /// as a CLI-supplied seed crystal).
    pub fn checked_intern(&mut self, vector: Vec<i64>) -> Result<VertexKey, CrystalError> {
        if vector.len() != self.dimension() {
            return Err(CrystalError::InvalidConfiguration(format!(
                "vertex {:?} has dimension {} but the lattice has dimension {}",
                vector,
                vector.len(),
                self.dimension()
            )));
        }

        Ok(self.intern(vector))
    }

    /// Returns the interned vector for `key`.
    ///
    /// `key` must have been allocated by this lattice; an unallocated key is a
    /// programming error.
    pub fn vector_of(&self, key: VertexKey) -> &[i64] {
        self.vertices.get(key).expect("vertex key not allocated by this lattice")
    }

    /// Returns the `D` neighbors of `key`, interning them on first request and caching
    /// the result thereafter. Neighbor order follows the neighborhood's offset order.
    pub fn neighbors(&mut self, key: VertexKey) -> &[VertexKey] {
        let index: usize = key.into();
        if self.neighbor_cache[index].is_none() {
            let vector = self.vector_of(key).to_vec();
            let mut neighbors = Vec::with_capacity(self.neighborhood.degree());
            for offset in self.neighborhood.offsets() {
                let neighbor_vector: Vec<i64> = vector.iter().zip(offset).map(|(a, b)| a + b).collect();
                neighbors.push(self.intern(neighbor_vector));
            }
            self.neighbor_cache[index] = Some(neighbors);
        }

        self.neighbor_cache[index].as_deref().unwrap()
    }

    /// Returns the number of vertices interned so far.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
