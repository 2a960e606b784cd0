//! DILEMMA Stats - Per-tick population statistics
//!
//! This crate is the read-only reporting collaborator of the simulation
//! core: it walks the live population after a tick and aggregates scores,
//! gene defect fractions, opening moves and the share of the population
//! whose strategy behaves like one of the canonical dilemma rules.

mod rules;

pub use rules::{classify, matches_rule, Rule};

use dilemma_core::{Move, Surface};
use serde::{Deserialize, Serialize};

/// Snapshot of the population after one generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickStats {
    pub generation: u32,
    pub population: usize,
    pub total_born: u64,
    pub total_died: u64,
    pub mean_score: f64,
    pub max_score: i64,
    /// Mean over all live genes of their defect fraction
    pub def_frac_mean: f64,
    /// Fraction of the population whose opening move is cooperate
    pub init_coop_frac: f64,
    pub rule_frac_tft: f64,
    pub rule_frac_stft: f64,
    pub rule_frac_t2t: f64,
    pub rule_frac_alld: f64,
    pub rule_frac_allc: f64,
}

/// Aggregate the live population into a [`TickStats`]
pub fn collect(surface: &Surface, generation: u32) -> TickStats {
    let cells = surface.get_all();
    let population = cells.len();

    let mut score_sum = 0i64;
    let mut max_score = i64::MIN;
    let mut def_frac_sum = 0.0;
    let mut init_coop = 0usize;
    let mut rule_counts = [0usize; 5];

    for cell in &cells {
        score_sum += cell.score();
        max_score = max_score.max(cell.score());
        def_frac_sum += cell.gene().defect_fraction();
        if cell.gene().initial_move() == Move::Cooperate {
            init_coop += 1;
        }
        if let Some(rule) = classify(cell.gene()) {
            rule_counts[rule as usize] += 1;
        }
    }

    let frac = |count: usize| {
        if population == 0 {
            0.0
        } else {
            count as f64 / population as f64
        }
    };

    TickStats {
        generation,
        population,
        total_born: surface.total_born(),
        total_died: surface.total_died(),
        mean_score: if population == 0 {
            0.0
        } else {
            score_sum as f64 / population as f64
        },
        max_score: if population == 0 { 0 } else { max_score },
        def_frac_mean: if population == 0 {
            0.0
        } else {
            def_frac_sum / population as f64
        },
        init_coop_frac: frac(init_coop),
        rule_frac_tft: frac(rule_counts[Rule::TitForTat as usize]),
        rule_frac_stft: frac(rule_counts[Rule::SuspiciousTitForTat as usize]),
        rule_frac_t2t: frac(rule_counts[Rule::TitForTwoTats as usize]),
        rule_frac_alld: frac(rule_counts[Rule::AlwaysDefect as usize]),
        rule_frac_allc: frac(rule_counts[Rule::AlwaysCooperate as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dilemma_core::{Cell, Gene, Position, SimConfig, Surface};

    fn tiny_surface() -> Surface {
        let mut config = SimConfig::default();
        config.surface.width = 3;
        config.surface.height = 1;
        Surface::new(config).unwrap()
    }

    fn gene_of(symbols: &str) -> Gene {
        let mut code = vec![Move::Cooperate];
        code.extend(symbols.chars().map(|ch| match ch {
            'c' => Move::Cooperate,
            'd' => Move::Defect,
            other => panic!("bad symbol {other}"),
        }));
        Gene::from_sequence(code)
    }

    #[test]
    fn test_collect_on_empty_surface() {
        let surface = tiny_surface();
        let stats = collect(&surface, 0);
        assert_eq!(stats.population, 0);
        assert_eq!(stats.mean_score, 0.0);
        assert_eq!(stats.def_frac_mean, 0.0);
        assert_eq!(stats.init_coop_frac, 0.0);
    }

    #[test]
    fn test_collect_mixed_population() {
        let mut surface = tiny_surface();
        surface.seed([
            Cell::with_gene(0, Position::new(0, 0), gene_of("ccc")),
            Cell::with_gene(1, Position::new(1, 0), gene_of("ddd")),
        ]);

        let stats = collect(&surface, 4);
        assert_eq!(stats.generation, 4);
        assert_eq!(stats.population, 2);
        assert!((stats.def_frac_mean - 0.5).abs() < 1e-12);
        assert!((stats.init_coop_frac - 0.5).abs() < 1e-12);
        assert!((stats.rule_frac_allc - 0.5).abs() < 1e-12);
        assert!((stats.rule_frac_alld - 0.5).abs() < 1e-12);
        assert_eq!(stats.rule_frac_tft, 0.0);
    }

    #[test]
    fn test_stats_serialize() {
        let surface = tiny_surface();
        let stats = collect(&surface, 0);
        let json = serde_json::to_string(&stats).unwrap();
        let back: TickStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.generation, stats.generation);
        assert_eq!(back.population, stats.population);
    }
}
