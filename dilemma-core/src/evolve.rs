//! Genetic operators: mutation and recombination
//!
//! Both operators run exactly once, at gene construction time. A founder
//! gene is randomised then mutated; an offspring gene is recombined from
//! its two parents then mutated. Genes are never altered afterwards.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::gene::Gene;
use crate::payoff::Move;

/// Mutation rates applied once after gene construction
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Per-position probability of flipping a symbol
    pub mutation_rate: f64,
    /// Probability of appending one fully random tree level
    pub grow_chance: f64,
    /// Probability of dropping the deepest tree level
    pub shrink_chance: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.02,
            grow_chance: 0.05,
            shrink_chance: 0.05,
        }
    }
}

/// Mutate a gene in place: at most one structural step (grow or shrink),
/// then independent per-position symbol flips.
pub fn mutate<R: Rng>(gene: &mut Gene, config: &MutationConfig, rng: &mut R) {
    let roll: f64 = rng.gen();
    if roll < config.grow_chance {
        grow(gene, rng);
    } else if roll < config.grow_chance + config.shrink_chance {
        shrink(gene);
    }

    for i in 1..gene.len() {
        if rng.gen_bool(config.mutation_rate) {
            let code = gene.code_mut();
            code[i] = code[i].flipped();
        }
    }
    gene.update_mem_size();
}

/// Recombine two parent genes into a child sequence.
///
/// Position-wise uniform crossover: each position is drawn 50/50 from
/// either parent. Parents of unequal length are truncated to the shorter
/// one, mirroring the min-length rule used for every pairwise walk here.
pub fn recombinate<R: Rng>(a: &Gene, b: &Gene, rng: &mut R) -> Gene {
    let len = a.len().min(b.len());
    let mut code = Vec::with_capacity(len);
    code.push(Move::Cooperate); // reserved slot 0
    for i in 1..len {
        code.push(if rng.gen_bool(0.5) {
            a.code()[i]
        } else {
            b.code()[i]
        });
    }
    Gene::from_sequence(code)
}

/// Append one tree level of random symbols, doubling the sequence length
fn grow<R: Rng>(gene: &mut Gene, rng: &mut R) {
    let len = gene.len();
    let code = gene.code_mut();
    for _ in 0..len {
        code.push(Move::random(rng));
    }
}

/// Drop the deepest tree level, halving the sequence length. The sequence
/// never shrinks below the root.
fn shrink(gene: &mut Gene) {
    let len = gene.len();
    if len > 2 {
        gene.code_mut().truncate((len / 2).max(2));
    }
}
