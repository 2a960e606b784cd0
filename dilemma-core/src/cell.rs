//! The agent occupying one grid slot
//!
//! A cell owns its gene and memory exclusively. Its score is tick-scoped:
//! it is reset to the metabolic baseline at the start of every tick and
//! accumulates payoffs during the interaction rounds.

use rand::Rng;

use crate::board::Position;
use crate::config::SimConfig;
use crate::evolve::{mutate, recombinate};
use crate::gene::Gene;
use crate::memory::Memory;
use crate::payoff::{payoff, Move};

/// Stable handle for a cell, unique for the lifetime of a surface
pub type CellId = u64;

#[derive(Clone, Debug)]
pub struct Cell {
    id: CellId,
    position: Position,
    gene: Gene,
    memory: Memory,
    score: i64,
    age: u32,
    alive: bool,
}

impl Cell {
    /// Founder cell with a fresh random gene, mutated once
    pub fn founder<R: Rng>(id: CellId, position: Position, config: &SimConfig, rng: &mut R) -> Self {
        let mut gene = Gene::random(config.default_memory_size, rng);
        mutate(&mut gene, &config.mutation, rng);
        Self::with_gene(id, position, gene)
    }

    /// Offspring cell: the parents' genes are recombined, then the child
    /// gene is mutated once
    pub fn offspring<R: Rng>(
        id: CellId,
        position: Position,
        parent_a: &Cell,
        parent_b: &Cell,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let mut gene = recombinate(&parent_a.gene, &parent_b.gene, rng);
        mutate(&mut gene, &config.mutation, rng);
        Self::with_gene(id, position, gene)
    }

    /// Cell with an explicit gene. Used by tests to script strategies.
    pub fn with_gene(id: CellId, position: Position, gene: Gene) -> Self {
        // mem_size is at least 1 for any constructible gene, so the
        // memory always records
        let memory = Memory::new(gene.mem_size());
        Self {
            id,
            position,
            gene,
            memory,
            score: 0,
            age: 0,
            alive: true,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn gene(&self) -> &Gene {
        &self.gene
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    // ------------------------------------------------------------------
    // Per-tick behaviour
    // ------------------------------------------------------------------

    /// The move this cell would play right now
    pub fn decide(&self) -> Move {
        self.gene.decide(self.memory.iter())
    }

    /// Play one round against an opponent's move: decide, collect the
    /// payoff and remember the observed move. Returns the move played.
    pub fn interact_with(&mut self, their_move: Move) -> Move {
        let my_move = self.decide();
        self.score += payoff(my_move, their_move);
        self.memory.record(their_move);
        my_move
    }

    /// Pure death predicate: the score fell below the lethal threshold,
    /// or the cell outlived its age limit (when one applies)
    pub fn is_dead(&self, death_threshold: i64, age_limit: Option<u32>) -> bool {
        if self.score < death_threshold {
            return true;
        }
        matches!(age_limit, Some(limit) if self.age > limit)
    }

    /// Age by one tick
    pub fn tick_age(&mut self) {
        self.age += 1;
    }

    /// Forget the current tick's interaction history
    pub fn clear_interactions(&mut self) {
        self.memory.clear();
    }

    /// Reset the score to the metabolic baseline for a new tick
    pub fn reset_score(&mut self, loss_per_tick: i64) {
        self.score = -loss_per_tick;
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn all_cooperate() -> Gene {
        Gene::from_sequence(vec![Move::Cooperate; 4])
    }

    fn all_defect() -> Gene {
        let mut code = vec![Move::Defect; 4];
        code[0] = Move::Cooperate; // reserved slot
        Gene::from_sequence(code)
    }

    #[test]
    fn test_founder_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let config = SimConfig::default();
        let cell = Cell::founder(1, Position::new(2, 3), &config, &mut rng);
        assert_eq!(cell.id(), 1);
        assert_eq!(cell.position(), Position::new(2, 3));
        assert_eq!(cell.score(), 0);
        assert_eq!(cell.age(), 0);
        assert!(cell.is_alive());
    }

    #[test]
    fn test_interaction_accumulates_score_and_memory() {
        let mut coop = Cell::with_gene(1, Position::new(0, 0), all_cooperate());
        assert_eq!(coop.interact_with(Move::Defect), Move::Cooperate);
        assert_eq!(coop.score(), 0); // sucker's payoff
        assert_eq!(coop.interact_with(Move::Cooperate), Move::Cooperate);
        assert_eq!(coop.score(), 3);

        let mut defector = Cell::with_gene(2, Position::new(1, 0), all_defect());
        defector.interact_with(Move::Cooperate);
        assert_eq!(defector.score(), 5);
        defector.interact_with(Move::Defect);
        assert_eq!(defector.score(), 6);
    }

    #[test]
    fn test_score_reset_and_death() {
        let mut cell = Cell::with_gene(1, Position::new(0, 0), all_cooperate());
        cell.reset_score(2);
        assert_eq!(cell.score(), -2);
        assert!(cell.is_dead(0, None));
        cell.interact_with(Move::Cooperate);
        assert_eq!(cell.score(), 1);
        assert!(!cell.is_dead(0, None));
    }

    #[test]
    fn test_death_by_age() {
        let mut cell = Cell::with_gene(1, Position::new(0, 0), all_cooperate());
        for _ in 0..5 {
            cell.tick_age();
        }
        assert!(!cell.is_dead(i64::MIN, None));
        assert!(!cell.is_dead(i64::MIN, Some(5)));
        assert!(cell.is_dead(i64::MIN, Some(4)));
    }

    #[test]
    fn test_clear_interactions_forgets_history() {
        // tit-for-tat shaped gene: plays back the last observed move
        let gene = Gene::from_sequence(vec![
            Move::Cooperate,
            Move::Cooperate,
            Move::Cooperate,
            Move::Defect,
        ]);
        let mut cell = Cell::with_gene(1, Position::new(0, 0), gene);
        cell.interact_with(Move::Defect);
        assert_eq!(cell.decide(), Move::Defect);
        cell.clear_interactions();
        assert_eq!(cell.decide(), Move::Cooperate);
    }

    #[test]
    fn test_offspring_gene_from_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let config = SimConfig {
            mutation: crate::evolve::MutationConfig {
                mutation_rate: 0.0,
                grow_chance: 0.0,
                shrink_chance: 0.0,
            },
            ..Default::default()
        };
        let a = Cell::with_gene(1, Position::new(0, 0), all_cooperate());
        let b = Cell::with_gene(2, Position::new(1, 0), all_defect());
        let child = Cell::offspring(3, Position::new(0, 1), &a, &b, &config, &mut rng);
        assert_eq!(child.gene().len(), 4);
        // every position comes from one of the parents
        let child_str = child.gene().to_string();
        for (i, ch) in child_str.chars().enumerate() {
            let a_ch = a.gene().to_string().chars().nth(i).unwrap();
            let b_ch = b.gene().to_string().chars().nth(i).unwrap();
            assert!(ch == a_ch || ch == b_ch);
        }
    }
}
