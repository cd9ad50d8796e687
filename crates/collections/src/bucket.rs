/// Sentinel priority value marking a slot as absent from the container.
const UNSET: u32 = u32::MAX;

/// Bookkeeping for a single key: which level it lives in and its position within that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    priority: u32,
    index: u32,
}

impl Slot {
    const EMPTY: Slot = Slot {
        priority: UNSET,
        index: UNSET,
    };

    fn is_present(&self) -> bool {
        self.priority != UNSET
    }
}

/// A mapping from key to a small integer priority `0..P`, supporting O(1) amortised
/// insert/update/remove and O(1) access to the keys at the current minimum priority.
///
/// `K` is expected to be a dense, small-integer-backed key (such as an interned lattice
/// key), since per-key bookkeeping is stored in a plain `Vec` indexed by `key.into()`
/// rather than a hash map.
pub struct BucketedPriorityContainer<K> {
    /// Dense vector of keys present at each priority level.
    levels: Vec<Vec<K>>,
    /// Per-key (priority, index-within-level), indexed by `Into<usize>` of the key.
    slots: Vec<Slot>,
    /// Cached smallest non-empty priority level, advanced lazily on removal.
    min_priority: Option<usize>,
    /// Total number of keys present across all levels.
    size: usize,
}

impl<K: Copy + Into<usize>> BucketedPriorityContainer<K> {
    /// Creates an empty container with `num_priorities` levels, numbered `0..num_priorities`.
    pub fn new(num_priorities: usize) -> Self {
        Self {
            levels: (0..num_priorities).map(|_| Vec::new()).collect(),
            slots: Vec::new(),
            min_priority: None,
            size: 0,
        }
    }

    /// Returns the number of priority levels this container was constructed with.
    pub fn num_priorities(&self) -> usize {
        self.levels.len()
    }

    /// Returns the number of keys currently present.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true iff no keys are present.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn slot_of(&self, key: K) -> Slot {
        let index: usize = key.into();
        self.slots.get(index).copied().unwrap_or(Slot::EMPTY)
    }

    /// Returns true iff the given key is present in the container.
    pub fn contains(&self, key: K) -> bool {
        self.slot_of(key).is_present()
    }

    /// Returns the priority of the given key, or `None` if it is not present.
    pub fn priority_of(&self, key: K) -> Option<usize> {
        let slot = self.slot_of(key);
        slot.is_present().then_some(slot.priority as usize)
    }

    /// Returns the smallest priority with a non-empty level, or `None` if the container is empty.
    pub fn min_priority(&self) -> Option<usize> {
        self.min_priority
    }

    /// Returns the keys at the current minimum priority. Empty if the container is empty.
    pub fn min_bucket(&self) -> &[K] {
        match self.min_priority {
            Some(priority) => &self.levels[priority],
            None => &[],
        }
    }

    /// Returns an iterator over all present keys along with their priority.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(priority, level)| level.iter().map(move |&key| (key, priority)))
    }

    /// Inserts `key` at `priority`, or moves it there if already present. A no-op if the
    /// key is already at exactly that priority.
    ///
    /// Panics if `priority` is out of range for this container.
    pub fn insert_or_update(&mut self, key: K, priority: usize) {
        assert!(priority < self.levels.len(), "priority out of range for bucketed priority container");

        let index: usize = key.into();
        if self.slots.len() <= index {
            self.slots.resize(index + 1, Slot::EMPTY);
        }

        let current = self.slots[index];
        if current.is_present() && current.priority as usize == priority {
            return;
        }

        if current.is_present() {
            self.remove_from_level(current.priority as usize, current.index as usize);
        } else {
            self.size += 1;
        }

        self.add_to_level(key, index, priority);

        if self.min_priority.is_none_or(|min| priority < min) {
            self.min_priority = Some(priority);
        }
    }

    /// Removes `key` from the container.
    ///
    /// `key` must be present; removing an absent key is a programming error.
    pub fn remove(&mut self, key: K) {
        let current = self.slot_of(key);
        debug_assert!(current.is_present(), "removing a key that is not present in the bucketed priority container");

        self.remove_from_level(current.priority as usize, current.index as usize);

        let index: usize = key.into();
        self.slots[index] = Slot::EMPTY;
        self.size -= 1;

        if self.min_priority == Some(current.priority as usize) {
            self.advance_min_priority();
        }
    }

    /// Shorthand for adjusting an already-present key's priority by `delta`: removes the
    /// key if the resulting priority equals `unset_on`, otherwise moves it there.
    ///
    /// `key` must be present beforehand.
    pub fn increment(&mut self, key: K, delta: i64, unset_on: usize) {
        let current = self.priority_of(key).expect("incrementing a key that is not present in the bucketed priority container");

        let updated = current as i64 + delta;
        debug_assert!(updated >= 0, "priority underflow in bucketed priority container");
        let updated = updated as usize;

        if updated == unset_on {
            self.remove(key);
        } else {
            self.insert_or_update(key, updated);
        }
    }

    fn add_to_level(&mut self, key: K, index: usize, priority: usize) {
        let level = &mut self.levels[priority];
        let position = level.len();
        level.push(key);
        self.slots[index] = Slot {
            priority: priority as u32,
            index: position as u32,
        };
    }

    fn remove_from_level(&mut self, priority: usize, index_in_level: usize) {
        let level = &mut self.levels[priority];
        level.swap_remove(index_in_level);

        if let Some(&moved_key) = level.get(index_in_level) {
            let moved_index: usize = moved_key.into();
            self.slots[moved_index].index = index_in_level as u32;
        }
    }

    fn advance_min_priority(&mut self) {
        let start = self.min_priority.unwrap_or(0);
        self.min_priority = (start..self.levels.len()).find(|&priority| !self.levels[priority].is_empty());
    }

    /// Verifies the internal consistency of the container: every key's recorded
    /// (priority, index) matches its level's actual contents, the total size agrees with
    /// the sum of level lengths, and the cached minimum priority is the true minimum.
    pub fn check_invariants(&self) -> bool {
        let total: usize = self.levels.iter().map(Vec::len).sum();
        if total != self.size {
            return false;
        }

        for (priority, level) in self.levels.iter().enumerate() {
            for (index, &key) in level.iter().enumerate() {
                let key_index: usize = key.into();
                let Some(slot) = self.slots.get(key_index) else {
                    return false;
                };

                if slot.priority as usize != priority || slot.index as usize != index {
                    return false;
                }
            }
        }

        match self.min_priority {
            None => self.size == 0,
            Some(priority) => !self.levels[priority].is_empty() && self.levels[..priority].iter().all(Vec::is_empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BucketedPriorityContainer;

    #[test]
    fn test_driven_action_sequence() {
        // a=0, b=1, c=2 as dense keys.
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);

        container.insert_or_update(0, 3); // add(a, 3)
        container.insert_or_update(1, 1); // add(b, 1)
        container.insert_or_update(2, 2); // add(c, 2)
        container.insert_or_update(0, 0); // add(a, 0)
        container.remove(1); // remove(b)

        assert!(container.check_invariants());
        assert_eq!(container.min_priority(), Some(0));
        assert_eq!(container.min_bucket(), &[0]);
        assert!(!container.contains(1));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_reinsert_at_same_priority_is_noop() {
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);
        container.insert_or_update(0, 2);
        let before = container.priority_of(0);
        container.insert_or_update(0, 2);
        assert_eq!(container.priority_of(0), before);
        assert_eq!(container.len(), 1);
        assert!(container.check_invariants());
    }

    #[test]
    fn test_min_priority_advances_after_removal() {
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);
        container.insert_or_update(0, 0);
        container.insert_or_update(1, 1);
        container.remove(0);

        assert!(container.check_invariants());
        assert_eq!(container.min_priority(), Some(1));
        assert_eq!(container.min_bucket(), &[1]);
    }

    #[test]
    fn test_swap_remove_preserves_other_keys_in_level() {
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);
        container.insert_or_update(0, 2);
        container.insert_or_update(1, 2);
        container.insert_or_update(2, 2);

        container.remove(0);

        assert!(container.check_invariants());
        assert!(container.contains(1));
        assert!(container.contains(2));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_increment_moves_and_unsets() {
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);
        container.insert_or_update(0, 2);

        container.increment(0, 1, usize::MAX);
        assert_eq!(container.priority_of(0), Some(3));

        container.increment(0, -3, 0);
        assert!(!container.contains(0));
        assert!(container.check_invariants());
    }

    #[test]
    #[should_panic]
    fn test_insert_out_of_range_priority_panics() {
        let mut container: BucketedPriorityContainer<usize> = BucketedPriorityContainer::new(4);
        container.insert_or_update(0, 4);
    }
}
