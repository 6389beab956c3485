//! Short-term tabu memory.

/// Fixed-size circular tabu list with two interleaved lanes.
///
/// Every committed move writes two slots: first the element it removed,
/// then the element it inserted. A move that only inserts or only removes
/// writes an empty slot for the untouched lane. The buffer holds
/// `2 * tenure` slots, so an element stays tabu for `tenure` moves.
///
/// Slots are `Option<usize>`: an empty slot can never be mistaken for a
/// real domain element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabuList {
    slots: Vec<Option<usize>>,
    /// Index of the oldest slot, always even.
    head: usize,
}

impl TabuList {
    /// Creates an empty memory for the given tenure.
    pub fn new(tenure: usize) -> Self {
        Self {
            slots: vec![None; 2 * tenure],
            head: 0,
        }
    }

    pub fn tenure(&self) -> usize {
        self.slots.len() / 2
    }

    /// Number of slots, always `2 * tenure`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if no slot holds an element.
    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns `true` if `elem` sits in either lane.
    pub fn contains(&self, elem: usize) -> bool {
        self.slots.contains(&Some(elem))
    }

    /// Evicts the oldest pair of slots and stores the move's elements.
    pub fn record(&mut self, removed: Option<usize>, inserted: Option<usize>) {
        if self.slots.is_empty() {
            return;
        }
        let len = self.slots.len();
        self.slots[self.head] = removed;
        self.slots[self.head + 1] = inserted;
        self.head = (self.head + 2) % len;
    }

    /// Empties every slot; the length is unchanged.
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.head = 0;
    }

    /// Removed-lane entries, oldest first.
    pub fn removed_lane(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.lane(0)
    }

    /// Inserted-lane entries, oldest first.
    pub fn inserted_lane(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.lane(1)
    }

    fn lane(&self, offset: usize) -> impl Iterator<Item = Option<usize>> + '_ {
        let len = self.slots.len();
        (0..self.tenure()).map(move |k| self.slots[(self.head + 2 * k + offset) % len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty_with_fixed_length() {
        let memory = TabuList::new(3);
        assert_eq!(memory.len(), 6);
        assert_eq!(memory.tenure(), 3);
        assert!(memory.is_clear());
        assert!(!memory.contains(0));
    }

    #[test]
    fn test_length_is_constant() {
        let mut memory = TabuList::new(4);
        for i in 0..1000 {
            let removed = (i % 3 == 0).then_some(i);
            let inserted = (i % 2 == 0).then_some(i + 1);
            memory.record(removed, inserted);
            assert_eq!(memory.len(), 8);
        }
        memory.clear();
        assert_eq!(memory.len(), 8);
    }

    #[test]
    fn test_element_expires_after_tenure_moves() {
        let mut memory = TabuList::new(2);
        memory.record(None, Some(5));
        assert!(memory.contains(5));
        memory.record(Some(1), None);
        assert!(memory.contains(5));
        memory.record(None, None);
        assert!(!memory.contains(5));
        assert!(memory.contains(1));
    }

    #[test]
    fn test_lanes_stay_separate() {
        let mut memory = TabuList::new(2);
        memory.record(Some(3), Some(4));
        memory.record(None, Some(7));

        let removed: Vec<_> = memory.removed_lane().collect();
        let inserted: Vec<_> = memory.inserted_lane().collect();
        assert_eq!(removed, vec![Some(3), None]);
        assert_eq!(inserted, vec![Some(4), Some(7)]);

        memory.record(Some(9), None);
        let removed: Vec<_> = memory.removed_lane().collect();
        assert_eq!(removed, vec![None, Some(9)]);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut memory = TabuList::new(2);
        memory.record(Some(1), Some(2));
        assert!(!memory.is_clear());
        memory.clear();
        assert!(memory.is_clear());
        assert!(!memory.contains(1));
    }

    #[test]
    fn test_zero_tenure_never_tabu() {
        let mut memory = TabuList::new(0);
        memory.record(Some(1), Some(2));
        assert!(memory.is_empty());
        assert!(!memory.contains(1));
    }
}
