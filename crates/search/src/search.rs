use rustc_hash::FxHashSet;

use crystal_graph::Lattice;
use crystal_sim::Direction;
use crystal_utilities::CrystalError;

use crate::ti_key;
use crate::Subset;
use crate::TiKey;

/// Maps a per-level index `d` (as used by `energies`/`counts`/`opt_counts`/`crystals`,
/// where `d = |size - seed_size|`) back to the population size it stands for: growing
/// outward from the seed, size increases with `d`; shrinking, it decreases.
pub(crate) fn level_size(seed_size: usize, growing: bool, d: usize) -> usize {
    if growing { seed_size + d } else { seed_size - d }
}

/// Configuration for one explorative search run. See the `crystals` binary for how
/// these are populated from the command line.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// The population the search starts from. Possibly empty.
    pub seed: Subset,
    /// The target population size the search grows (or shrinks) towards.
    pub goal: usize,
    /// Whether moves back towards the seed size are explored in addition to moves
    /// towards `goal`.
    pub bidi: bool,
    /// Whether the visited set deduplicates up to lattice translation (`ti_key`)
    /// rather than by subset identity.
    pub translation_invariant: bool,
    /// Whether to retain every visited crystal at each level, not just its statistics.
    pub collect: bool,
    /// Prune slack: a popped crystal whose energy exceeds its level's current minimum
    /// by more than this is skipped without expanding its children.
    pub require_energy: Option<u64>,
    /// `0` is silent, `1` logs one line per completed level, `2` additionally logs one
    /// line per popped crystal.
    pub verbosity: u8,
}

/// The per-level aggregated outcome of a search run.
pub struct SearchResult {
    pub lower: usize,
    pub upper: usize,
    /// The seed's population size. Together with `growing`, recovers the population
    /// size a level index `d` stands for: `level_size(seed_size, growing, d)`. Levels
    /// are *not* indexed by `size - lower`; they're indexed by distance from the seed,
    /// which only coincides with `size - lower` when the search is growing.
    pub seed_size: usize,
    /// Whether level index increases with population size (`goal >= seed_size`) or
    /// decreases with it (shrinking towards `goal < seed_size`).
    pub growing: bool,
    /// Minimal energy observed at each level, `u64::MAX` if the level was never
    /// reached (index `d` stands for population `level_size(seed_size, growing, d)`).
    pub energies: Vec<u64>,
    /// Total number of distinct crystals visited at each level.
    pub counts: Vec<u64>,
    /// Number of crystals visited at each level tying the level's minimal energy.
    pub opt_counts: Vec<u64>,
    /// Present iff `collect` was set: every crystal visited at each level.
    pub crystals: Option<Vec<Vec<Subset>>>,
    /// The lattice every `Subset`/`VertexKey` in this result was interned against.
    /// Needed by callers that want to render a crystal's vertex coordinates (the
    /// report table itself doesn't, but the dump surface does).
    pub lattice: Lattice,
}

/// A key identifying a crystal for visited-set deduplication purposes: either its
/// translation-invariant canonical form, or the crystal itself.
#[derive(Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Translated(TiKey),
    Identity(Subset),
}

fn dedup_key(subset: &Subset, lattice: &Lattice, translation_invariant: bool) -> DedupKey {
    if translation_invariant {
        DedupKey::Translated(ti_key(subset, lattice))
    } else {
        DedupKey::Identity(subset.clone())
    }
}

/// Translates `seed` so its lexicographically-smallest vertex maps to the lattice's
/// origin, re-interning the shifted vertices against `lattice`.
///
/// The additive simulation can only ever place its very first atom at the origin (its
/// exterior boundary bootstraps with exactly `{origin}`, see `AdditiveSimulation::new`),
/// so an arbitrary seed — one that need not itself contain the origin — has to be
/// anchored there before a cursor can walk the simulation from the empty crystal out to
/// it. Sound because the crate's search never distinguishes a crystal from any of its
/// lattice translates.
fn anchor_seed_at_origin(lattice: &mut Lattice, seed: &Subset) -> Subset {
    let Some(first) = seed.first(lattice) else {
        return seed.clone();
    };

    let anchor = lattice.vector_of(first).to_vec();
    let shifted: Vec<Vec<i64>> = seed
        .iter()
        .map(|key| {
            let vector = lattice.vector_of(key);
            vector.iter().zip(&anchor).map(|(a, b)| a - b).collect()
        })
        .collect();

    Subset::of(shifted.into_iter().map(|vector| lattice.intern(vector)))
}

/// Depth-first search over crystals reachable from `config.seed`, aggregating minimal
/// energy, total count and optimal count at every population size between the seed's
/// size and `config.goal`.
pub fn search(mut lattice: Lattice, config: &SearchConfig) -> Result<SearchResult, CrystalError> {
    let seed = anchor_seed_at_origin(&mut lattice, &config.seed);
    let mut cursor = crate::StateCursor::new(lattice);

    let seed_size = seed.size();
    let lower = seed_size.min(config.goal);
    let upper = seed_size.max(config.goal);
    let levels = upper
        .checked_sub(lower)
        .and_then(|span| span.checked_add(1))
        .ok_or_else(|| CrystalError::ResourceExhausted("level count overflowed usize".to_string()))?;

    // +1 if growing towards the goal, -1 if shrinking towards it.
    let growing = config.goal >= seed_size;
    let next_direction = if growing { Direction::Forwards } else { Direction::Backwards };
    let previous_direction = next_direction.opposite();

    let mut energies = vec![u64::MAX; levels];
    let mut counts = vec![0u64; levels];
    let mut opt_counts = vec![0u64; levels];
    let mut crystals: Option<Vec<Vec<Subset>>> = config.collect.then(|| vec![Vec::new(); levels]);

    let mut visited: FxHashSet<DedupKey> = FxHashSet::default();
    visited.insert(dedup_key(&seed, cursor.lattice(), config.translation_invariant));

    let mut stack = vec![seed.clone()];
    let mut deepest_reported_level: Option<usize> = None;

    while let Some(s) = stack.pop() {
        let d = (s.size() as i64 - seed_size as i64).unsigned_abs() as usize;
        assert!(d < levels, "popped a crystal outside the search's declared level range");

        if config.verbosity >= 2 {
            log::debug!("popped crystal at level {d} (size {}), stack depth {}", s.size(), stack.len());
        }

        let e = cursor.energy(&s);

        if let Some(slack) = config.require_energy {
            if e > energies[d].saturating_add(slack) {
                continue;
            }
        }

        counts[d] += 1;
        if e < energies[d] {
            energies[d] = e;
            opt_counts[d] = 1;
            if let Some(crystals) = crystals.as_mut() {
                crystals[d] = vec![s.clone()];
            }
        } else if e == energies[d] {
            opt_counts[d] += 1;
            if let Some(crystals) = crystals.as_mut() {
                crystals[d].push(s.clone());
            }
        }

        if config.verbosity >= 1 && deepest_reported_level != Some(d) {
            log::info!("search reached level {d} (population {}): min energy so far {}", s.size(), energies[d]);
            deepest_reported_level = Some(d);
        }

        if config.bidi && d > 0 {
            for child in cursor.neighbors_of(&s, previous_direction) {
                let key = dedup_key(&child, cursor.lattice(), config.translation_invariant);
                if visited.insert(key) {
                    stack.push(child);
                }
            }
        }

        if d < levels - 1 {
            for child in cursor.neighbors_of(&s, next_direction) {
                let key = dedup_key(&child, cursor.lattice(), config.translation_invariant);
                if visited.insert(key) {
                    stack.push(child);
                }
            }
        }
    }

    let lattice = cursor.into_lattice();

    Ok(SearchResult { lower, upper, seed_size, growing, energies, counts, opt_counts, crystals, lattice })
}
