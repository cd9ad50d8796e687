use rustc_hash::FxHashMap;

use crystal_graph::Lattice;
use crystal_sim::AdditiveSimulation;
use crystal_sim::Direction;

use crate::Subset;

/// Drives an [AdditiveSimulation] to successive target crystals, memoising the energy
/// of every crystal it has actually visited.
///
/// The simulation only supports single-vertex toggles against its *current* state, so
/// moving between two arbitrary crystals means replaying the diff between them one
/// vertex at a time, in an order the boundary containers will accept.
pub struct StateCursor {
    sim: AdditiveSimulation,
    current: Subset,
    energies: FxHashMap<Subset, u64>,
}

impl StateCursor {
    pub fn new(lattice: Lattice) -> Self {
        let sim = AdditiveSimulation::new(lattice);
        let current = Subset::empty();
        let mut energies = FxHashMap::default();
        energies.insert(current.clone(), 0);
        Self { sim, current, energies }
    }

    pub fn lattice(&self) -> &Lattice {
        self.sim.lattice()
    }

    pub fn lattice_mut(&mut self) -> &mut Lattice {
        self.sim.lattice_mut()
    }

    /// Consumes the cursor, returning its lattice for rendering the crystals the
    /// search produced (report/dump surface needs vertex vectors, not just keys).
    pub fn into_lattice(self) -> Lattice {
        self.sim.into_lattice()
    }

    /// The empty crystal every search starts from.
    pub fn initial_subset(&self) -> Subset {
        Subset::empty()
    }

    /// The current crystal the underlying simulation is parked at.
    pub fn current(&self) -> &Subset {
        &self.current
    }

    /// The surface energy of `subset`, memoised: moves the cursor there first if it
    /// isn't the current crystal, then reads `sim.energy()`.
    pub fn energy(&mut self, subset: &Subset) -> u64 {
        if let Some(&energy) = self.energies.get(subset) {
            return energy;
        }
        self.goto(subset);
        self.sim.energy()
    }

    /// The crystals reachable from `subset` by one `direction` move, computed by
    /// visiting `subset` and reading the simulation's current boundary candidates.
    pub fn neighbors_of(&mut self, subset: &Subset, direction: Direction) -> Vec<Subset> {
        self.goto(subset);
        self.sim
            .next_candidates(direction)
            .iter()
            .map(|&key| match direction {
                Direction::Forwards => subset.add(key),
                Direction::Backwards => subset.remove(key),
            })
            .collect()
    }

    /// Moves the underlying simulation from `self.current` to `target`, applying the
    /// diff between them as a sequence of single-vertex toggles.
    ///
    /// Vertices in the diff aren't necessarily boundary-valid in the order `diff`
    /// happens to return them (e.g. a toggle might need a neighbor added first), so
    /// this repeatedly applies whichever pending entries are *currently* valid until
    /// none remain. A `target` connected to `self.current` by construction (always
    /// true for crystals arising from the search's own grow/shrink moves) converges in
    /// at most one pass per entry; a disconnected target is a programming error.
    fn goto(&mut self, target: &Subset) {
        if &self.current == target {
            return;
        }

        let mut pending = Subset::diff(&self.current, target);
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|&(direction, vertex)| {
                if self.sim.boundary_contains(vertex, direction) {
                    self.sim.toggle(vertex, direction);
                    false
                } else {
                    true
                }
            });
            assert!(
                pending.len() < before,
                "goto could not make progress toward the target crystal (disconnected seed?)"
            );
        }

        self.current = target.clone();
        self.energies.insert(self.current.clone(), self.sim.energy());
    }
}
