//! Bounded history of observed opponent moves
//!
//! The memory is the traversal key into a gene: moves are read back in
//! insertion order, and once the capacity is reached the oldest move is
//! evicted first.

use std::collections::VecDeque;

use crate::payoff::Move;

#[derive(Clone, Debug, Default)]
pub struct Memory {
    moves: VecDeque<Move>,
    capacity: usize,
}

impl Memory {
    pub fn new(capacity: usize) -> Self {
        Self {
            moves: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a move, evicting the oldest one when full. A zero-capacity
    /// memory records nothing.
    pub fn record(&mut self, m: Move) {
        if self.capacity == 0 {
            return;
        }
        if self.moves.len() == self.capacity {
            self.moves.pop_front();
        }
        self.moves.push_back(m);
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Moves in insertion order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_evict() {
        let mut mem = Memory::new(2);
        mem.record(Move::Cooperate);
        mem.record(Move::Defect);
        assert_eq!(mem.iter().collect::<Vec<_>>(), vec![Move::Cooperate, Move::Defect]);

        mem.record(Move::Defect);
        assert_eq!(mem.len(), 2);
        assert_eq!(mem.iter().collect::<Vec<_>>(), vec![Move::Defect, Move::Defect]);
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new(3);
        mem.record(Move::Defect);
        mem.clear();
        assert!(mem.is_empty());
        assert_eq!(mem.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity() {
        let mut mem = Memory::new(0);
        mem.record(Move::Cooperate);
        assert!(mem.is_empty());
    }
}
