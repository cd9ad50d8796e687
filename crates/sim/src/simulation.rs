use crystal_collections::BucketedPriorityContainer;
use crystal_graph::Lattice;
use crystal_graph::VertexKey;

use crate::Direction;

/// Maintains, for a current subset `S` of a lattice's vertices, the total surface
/// energy and the dual interior/exterior boundary priority containers, updatable in
/// `O(degree)` per single-vertex toggle.
///
/// The interior boundary doubles as the membership predicate: a key is in `S` iff it
/// is present in `interior` (see [AdditiveSimulation::contains]).
pub struct AdditiveSimulation {
    lattice: Lattice,
    size: usize,
    energy: u64,
    interior: BucketedPriorityContainer<VertexKey>,
    exterior: BucketedPriorityContainer<VertexKey>,
}

impl AdditiveSimulation {
    /// Constructs the initial state: `S = {}`, `N = 0`, `E = 0`, with the exterior
    /// boundary seeded with only the origin (at priority `D`, the bootstrap candidate
    /// for the very first toggle) and the interior boundary empty.
    pub fn new(mut lattice: Lattice) -> Self {
        let degree = lattice.degree();
        let mut exterior = BucketedPriorityContainer::new(degree + 1);
        let interior = BucketedPriorityContainer::new(degree + 1);

        let origin = lattice.origin();
        exterior.insert_or_update(origin, degree);

        Self {
            lattice,
            size: 0,
            energy: 0,
            interior,
            exterior,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    /// Consumes the simulation, returning its lattice (with every vertex it ever
    /// interned, including vertices only ever visited as boundary candidates).
    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }

    /// The current population size `N = |S|`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The current surface energy `E`: the number of lattice edges with exactly one
    /// endpoint in `S`.
    pub fn energy(&self) -> u64 {
        self.energy
    }

    /// True iff `key` is currently a member of `S`.
    pub fn contains(&self, key: VertexKey) -> bool {
        self.interior.contains(key)
    }

    /// An iterator over the vertices currently in `S`, in no particular order.
    pub fn members(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.interior.iter().map(|(key, _)| key)
    }

    /// The minimum-priority keys of the boundary `direction` pulls from: the exterior
    /// boundary (candidates to add) for [Direction::Forwards], the interior boundary
    /// (candidates to remove) for [Direction::Backwards].
    ///
    /// Empty only when `S = {}` and `direction` is [Direction::Backwards], or when `S`
    /// is the whole lattice (never reachable in practice) for [Direction::Forwards].
    pub fn next_candidates(&self, direction: Direction) -> &[VertexKey] {
        match direction {
            Direction::Forwards => self.exterior.min_bucket(),
            Direction::Backwards => self.interior.min_bucket(),
        }
    }

    fn boundary(&self, direction: Direction) -> &BucketedPriorityContainer<VertexKey> {
        match direction {
            Direction::Forwards => &self.exterior,
            Direction::Backwards => &self.interior,
        }
    }

    /// True iff `key` currently sits anywhere in the boundary `direction` draws
    /// candidates from (not only its minimum-priority bucket).
    pub fn boundary_contains(&self, key: VertexKey, direction: Direction) -> bool {
        self.boundary(direction).contains(key)
    }

    /// Adds (`Forwards`) or removes (`Backwards`) `key`, updating `E`, `N` and both
    /// boundaries in `O(degree)`.
    ///
    /// `key` must currently be present in the boundary named by `direction`
    /// (`next_candidates(direction)` draws from exactly that boundary); violating this
    /// is a programming error.
    pub fn toggle(&mut self, key: VertexKey, direction: Direction) {
        let degree = self.lattice.degree();

        let pi = self
            .boundary(direction)
            .priority_of(key)
            .expect("toggling a vertex that is not in the active boundary for this direction");

        self.energy = (self.energy as i64 + 2 * pi as i64 - degree as i64) as u64;
        match direction {
            Direction::Forwards => self.size += 1,
            Direction::Backwards => self.size -= 1,
        }

        match direction {
            Direction::Forwards => {
                self.exterior.remove(key);
                self.interior.insert_or_update(key, degree - pi);
            }
            Direction::Backwards => {
                self.interior.remove(key);
                self.exterior.insert_or_update(key, degree - pi);
            }
        }

        let neighbors = self.lattice.neighbors(key).to_vec();
        for neighbor in neighbors {
            match direction {
                // Adding `key` gives every neighbor one more member neighbor.
                Direction::Forwards => {
                    if self.interior.contains(neighbor) {
                        self.interior.increment(neighbor, 1, usize::MAX);
                    } else if self.exterior.contains(neighbor) {
                        self.exterior.increment(neighbor, -1, usize::MAX);
                    } else {
                        self.exterior.insert_or_update(neighbor, degree - 1);
                    }
                }
                // Removing `key` gives every neighbor one fewer member neighbor. A
                // neighbor can never be untouched here: `key` was a member, so every
                // neighbor already had at least one member neighbor (`key` itself) and
                // must already sit in `interior` or `exterior`.
                Direction::Backwards => {
                    if self.interior.contains(neighbor) {
                        self.interior.increment(neighbor, -1, usize::MAX);
                    } else {
                        debug_assert!(self.exterior.contains(neighbor));
                        self.exterior.increment(neighbor, 1, degree);
                    }
                }
            }
        }
    }

    /// Recomputes energy by brute edge scan and each boundary priority by direct
    /// neighborhood inspection, confirming dual disjointness and the exterior/interior
    /// membership rules. Used by tests after every toggle.
    pub fn check_invariants(&mut self) -> bool {
        if !self.interior.check_invariants() || !self.exterior.check_invariants() {
            return false;
        }

        let members: Vec<VertexKey> = self.members().collect();
        for &key in &members {
            if self.exterior.contains(key) {
                return false; // dual disjointness
            }
        }

        let mut brute_energy: u64 = 0;
        for &key in &members {
            let in_s_neighbors = self.lattice.neighbors(key).to_vec().into_iter().filter(|n| self.contains(*n)).count();

            let expected_priority = in_s_neighbors;
            if self.interior.priority_of(key) != Some(expected_priority) {
                return false;
            }
        }

        // Recompute via the exterior boundary: E is the count of (exterior vertex,
        // member neighbor) pairs.
        for (key, priority) in self.exterior.iter() {
            let degree = self.lattice.degree();
            let in_s_neighbors = self.lattice.neighbors(key).to_vec().into_iter().filter(|n| self.contains(*n)).count();

            if self.interior.contains(key) {
                return false; // dual disjointness
            }

            if priority != degree - in_s_neighbors {
                return false;
            }

            brute_energy += in_s_neighbors as u64;
        }

        brute_energy == self.energy
    }
}

#[cfg(test)]
mod tests {
    use crystal_graph::UniformNeighborhood;
    use crystal_utilities::random_test;
    use rand::Rng;

    use super::*;

    fn fresh(neighborhood: UniformNeighborhood) -> AdditiveSimulation {
        AdditiveSimulation::new(Lattice::new(neighborhood))
    }

    #[test]
    fn test_initial_state() {
        let sim = fresh(UniformNeighborhood::square());
        assert_eq!(sim.size(), 0);
        assert_eq!(sim.energy(), 0);
        assert_eq!(sim.next_candidates(Direction::Backwards), &[] as &[VertexKey]);
        assert_eq!(sim.next_candidates(Direction::Forwards).len(), 1);
    }

    #[test]
    fn test_toggle_forwards_then_backwards_restores_state() {
        let mut sim = fresh(UniformNeighborhood::cubic());
        let origin = sim.lattice().origin();

        sim.toggle(origin, Direction::Forwards);
        assert!(sim.check_invariants());
        assert_eq!(sim.size(), 1);

        sim.toggle(origin, Direction::Backwards);
        assert!(sim.check_invariants());
        assert_eq!(sim.size(), 0);
        assert_eq!(sim.energy(), 0);
        assert_eq!(sim.next_candidates(Direction::Forwards), &[origin]);
    }

    #[test]
    fn test_energy_of_single_vertex_equals_degree() {
        for neighborhood in [
            UniformNeighborhood::square(),
            UniformNeighborhood::cubic(),
            UniformNeighborhood::triangular(),
            UniformNeighborhood::fcc(),
        ] {
            let degree = neighborhood.degree() as u64;
            let mut sim = fresh(neighborhood);
            let origin = sim.lattice().origin();
            sim.toggle(origin, Direction::Forwards);
            assert_eq!(sim.energy(), degree);
            assert!(sim.check_invariants());
        }
    }

    #[test]
    fn test_square_2x2_block_has_energy_eight() {
        let mut sim = fresh(UniformNeighborhood::square());
        // Each vertex below is a neighbor of one already added, so each is reachable
        // from the exterior boundary in this order.
        for vector in [vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]] {
            let key = sim.lattice_mut().intern(vector);
            assert!(sim.next_candidates(Direction::Forwards).contains(&key));
            sim.toggle(key, Direction::Forwards);
            assert!(sim.check_invariants());
        }
        assert_eq!(sim.size(), 4);
        assert_eq!(sim.energy(), 8);
    }

    #[test]
    fn test_random_toggle_sequences_preserve_invariants() {
        random_test(20, |rng| {
            let mut sim = fresh(UniformNeighborhood::fcc());

            for _ in 0..30 {
                let direction = if sim.size() > 0 && rng.random_bool(0.4) {
                    Direction::Backwards
                } else {
                    Direction::Forwards
                };

                let candidates = sim.next_candidates(direction);
                if candidates.is_empty() {
                    continue;
                }

                let pick = candidates[rng.random_range(0..candidates.len())];
                sim.toggle(pick, direction);
                assert!(sim.check_invariants(), "invariants broke after toggling {pick:?} {direction:?}");
            }
        });
    }
}
