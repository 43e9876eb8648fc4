//! Transposition table keyed by Zobrist hash.
//!
//! Single-slot direct-mapped layout. A probe only reports an entry whose
//! full key matches, so index collisions degrade into misses instead of
//! corrupting the search. Replacement is depth-preferred for same-key
//! stores; a differing key always takes the slot.

use log::debug;

use crate::board::chess_types::{Move, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub key: u64,
    pub score: Score,
    pub best_move: Move,
    pub depth: u8,
    pub bound: Bound,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    mask: usize,
}

impl TranspositionTable {
    /// Size the table to at most `size_mb` megabytes, rounding the slot
    /// count down to a power of two so indexing stays a mask.
    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let slot_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        let raw_count = (bytes / slot_size).max(1);
        let slot_count = 1usize << raw_count.ilog2();

        debug!("transposition table sized to {slot_count} slots for {size_mb} MB");

        Self {
            slots: vec![None; slot_count],
            mask: slot_count - 1,
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Look up `key`. Returns `None` on an empty slot or when another
    /// position currently occupies it.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.slots[self.index(key)].filter(|entry| entry.key == key)
    }

    pub fn store(&mut self, key: u64, score: Score, best_move: Move, depth: u8, bound: Bound) {
        let index = self.index(key);
        let replace = match self.slots[index] {
            None => true,
            Some(existing) => existing.key != key || depth >= existing.depth,
        };

        if replace {
            self.slots[index] = Some(TTEntry {
                key,
                score,
                best_move,
                depth,
                bound,
            });
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        debug!("transposition table cleared ({} slots)", self.slots.len());
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TranspositionTable};

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(123, 42, 99, 5, Bound::Exact);

        let got = tt.probe(123).expect("entry should exist");
        assert_eq!(got.key, 123);
        assert_eq!(got.score, 42);
        assert_eq!(got.best_move, 99);
        assert_eq!(got.depth, 5);
        assert_eq!(got.bound, Bound::Exact);
    }

    #[test]
    fn probe_rejects_an_index_collision_with_a_different_key() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let key: u64 = 0xABCD_EF01_2345_6789;
        let colliding = key.wrapping_add(tt.capacity() as u64);

        tt.store(key, 10, 1, 3, Bound::Exact);
        assert!(tt.probe(colliding).is_none());

        // The newcomer evicts the resident, which then misses.
        tt.store(colliding, 20, 2, 1, Bound::Lower);
        assert!(tt.probe(key).is_none());
        assert_eq!(tt.probe(colliding).expect("stored").score, 20);
    }

    #[test]
    fn same_key_stores_are_depth_preferred() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let key = 555;

        tt.store(key, 1, 11, 4, Bound::Upper);
        tt.store(key, 9, 22, 2, Bound::Exact);
        assert_eq!(tt.probe(key).expect("exists").score, 1);

        tt.store(key, 3, 33, 4, Bound::Lower);
        let got = tt.probe(key).expect("exists");
        assert_eq!(got.score, 3);
        assert_eq!(got.depth, 4);
    }

    #[test]
    fn capacity_is_a_power_of_two_within_the_byte_budget() {
        let slot_size = std::mem::size_of::<Option<super::TTEntry>>();
        for mb in [1usize, 2, 7, 16] {
            let tt = TranspositionTable::new_with_mb(mb);
            let bytes = mb * 1024 * 1024;
            assert!(tt.capacity().is_power_of_two());
            assert!(tt.capacity() * slot_size <= bytes);
            assert!(tt.capacity() * slot_size * 2 > bytes);
        }
    }

    #[test]
    fn clear_forgets_everything() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(7, 70, 3, 2, Bound::Exact);
        tt.clear();
        assert!(tt.probe(7).is_none());
        assert!(tt.capacity().is_power_of_two());
    }
}
