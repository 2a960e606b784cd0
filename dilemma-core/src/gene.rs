//! Heritable strategy encoded as an implicit binary decision tree
//!
//! The tree is stored as a flat sequence with standard heap addressing:
//! root at index 1, children of index `i` at `2i` (opponent cooperated)
//! and `2i + 1` (opponent defected). Index 0 is reserved and never read
//! by a decision.

use rand::Rng;
use std::fmt;

use crate::payoff::Move;

/// A cell's strategy. The sequence is fixed after construction (random
/// generation or recombination followed by a single mutation); it never
/// changes again during the owning cell's life.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gene {
    code: Vec<Move>,
    mem_size: usize,
}

impl Gene {
    /// Fully random gene of the given tree depth. The sequence length is
    /// `1 << depth`, so the cached memory size equals `depth`.
    ///
    /// # Panics
    /// Panics if `depth` is 0: a decision needs at least the root node.
    pub fn random<R: Rng>(depth: usize, rng: &mut R) -> Self {
        assert!(depth >= 1, "gene depth must be at least 1");
        let len = 1usize << depth;
        let mut code = Vec::with_capacity(len);
        code.push(Move::Cooperate); // reserved slot 0
        for _ in 1..len {
            code.push(Move::random(rng));
        }
        Self::from_sequence(code)
    }

    /// Gene over an explicit sequence (index 0 reserved).
    ///
    /// # Panics
    /// Panics if the sequence is shorter than 2 (reserved slot plus root).
    pub fn from_sequence(code: Vec<Move>) -> Self {
        assert!(code.len() >= 2, "gene sequence needs a root node");
        let mut gene = Self { code, mem_size: 0 };
        gene.update_mem_size();
        gene
    }

    /// Walk the tree along `history` and return the decision.
    ///
    /// Each past opponent move selects a child; when the selected child
    /// falls outside the sequence the walk stops and the symbol at the
    /// current node is the decision. Histories longer than the encoded
    /// depth are therefore truncated by the tree itself.
    pub fn decide(&self, history: impl IntoIterator<Item = Move>) -> Move {
        let mut offset = 1usize;
        for observed in history {
            let candidate = match observed {
                Move::Cooperate => 2 * offset,
                Move::Defect => 2 * offset + 1,
            };
            if candidate >= self.code.len() {
                return self.code[offset];
            }
            offset = candidate;
        }
        self.code[offset]
    }

    /// The move played on an empty history (the root symbol)
    pub fn initial_move(&self) -> Move {
        self.code[1]
    }

    /// Fraction of defect symbols over the non-reserved positions
    pub fn defect_fraction(&self) -> f64 {
        let defects = self.code[1..]
            .iter()
            .filter(|&&m| m == Move::Defect)
            .count();
        defects as f64 / (self.code.len() - 1) as f64
    }

    /// Cached tree depth, `floor(log2(sequence length))`
    pub fn mem_size(&self) -> usize {
        self.mem_size
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Always false: construction requires the reserved slot plus a root.
    /// Kept so `len` has its conventional companion.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub(crate) fn code(&self) -> &[Move] {
        &self.code
    }

    pub(crate) fn code_mut(&mut self) -> &mut Vec<Move> {
        &mut self.code
    }

    /// Recompute the cached memory size. Must be called after any
    /// structural change to the sequence.
    pub(crate) fn update_mem_size(&mut self) {
        assert!(self.code.len() >= 2, "gene sequence needs a root node");
        self.mem_size = self.code.len().ilog2() as usize;
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &m in &self.code[1..] {
            write!(f, "{}", m.glyph())?;
        }
        Ok(())
    }
}
