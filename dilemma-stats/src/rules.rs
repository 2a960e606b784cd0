//! Canonical strategy rules and gene classification
//!
//! A gene is classified by behaviour, not by raw symbols: its decision
//! function is evaluated over every history the tree fully resolves
//! (lengths up to `mem_size - 1`) and compared against each rule. This
//! ignores unreachable positions, so e.g. a gene that never plays defect
//! counts as always-cooperate whatever its deeper symbols say.

use dilemma_core::{Gene, Move};

/// Histories longer than this are not enumerated; deep genes are
/// classified on their first levels only.
const MAX_CHECK_DEPTH: usize = 8;

/// The canonical dilemma rules tracked by the statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    TitForTat = 0,
    SuspiciousTitForTat = 1,
    TitForTwoTats = 2,
    AlwaysDefect = 3,
    AlwaysCooperate = 4,
}

impl Rule {
    /// The move the rule plays after observing `history`
    pub fn expected(self, history: &[Move]) -> Move {
        match self {
            Rule::TitForTat => history.last().copied().unwrap_or(Move::Cooperate),
            Rule::SuspiciousTitForTat => history.last().copied().unwrap_or(Move::Defect),
            Rule::TitForTwoTats => {
                if history.len() >= 2
                    && history[history.len() - 2..] == [Move::Defect, Move::Defect]
                {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
            Rule::AlwaysDefect => Move::Defect,
            Rule::AlwaysCooperate => Move::Cooperate,
        }
    }
}

/// Whether the gene's decision function agrees with `rule` on every
/// history its tree fully resolves
pub fn matches_rule(gene: &Gene, rule: Rule) -> bool {
    let depth = gene.mem_size().saturating_sub(1).min(MAX_CHECK_DEPTH);
    for len in 0..=depth {
        for bits in 0..(1u32 << len) {
            let history: Vec<Move> = (0..len)
                .map(|i| {
                    if bits >> i & 1 == 1 {
                        Move::Defect
                    } else {
                        Move::Cooperate
                    }
                })
                .collect();
            if gene.decide(history.iter().copied()) != rule.expected(&history) {
                return false;
            }
        }
    }
    true
}

/// First rule the gene behaves like, if any. The unconditional rules are
/// checked first so that a pure cooperator is reported as always-cooperate
/// rather than tit-for-two-tats.
pub fn classify(gene: &Gene) -> Option<Rule> {
    [
        Rule::AlwaysCooperate,
        Rule::AlwaysDefect,
        Rule::TitForTat,
        Rule::SuspiciousTitForTat,
        Rule::TitForTwoTats,
    ]
    .into_iter()
    .find(|&rule| matches_rule(gene, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene_of(symbols: &[Move]) -> Gene {
        let mut code = vec![Move::Cooperate];
        code.extend_from_slice(symbols);
        Gene::from_sequence(code)
    }

    const C: Move = Move::Cooperate;
    const D: Move = Move::Defect;

    #[test]
    fn test_classify_tit_for_tat() {
        // root C; after C play C, after D play D; level 2 echoes the last move
        let gene = gene_of(&[C, C, D, C, D, C, D]);
        assert_eq!(classify(&gene), Some(Rule::TitForTat));
    }

    #[test]
    fn test_classify_suspicious_tit_for_tat() {
        let gene = gene_of(&[D, C, D]);
        assert_eq!(classify(&gene), Some(Rule::SuspiciousTitForTat));
    }

    #[test]
    fn test_classify_tit_for_two_tats() {
        // defects only after two consecutive defections
        let gene = gene_of(&[C, C, C, C, C, C, D]);
        assert_eq!(classify(&gene), Some(Rule::TitForTwoTats));
    }

    #[test]
    fn test_classify_unconditional_rules() {
        assert_eq!(classify(&gene_of(&[C, C, C])), Some(Rule::AlwaysCooperate));
        assert_eq!(classify(&gene_of(&[D, D, D])), Some(Rule::AlwaysDefect));
    }

    #[test]
    fn test_behavioural_classification_ignores_unreachable_symbols() {
        // the root alone is resolvable: a single-node defector is all-d
        let gene = gene_of(&[D]);
        assert_eq!(classify(&gene), Some(Rule::AlwaysDefect));
    }

    #[test]
    fn test_unclassified_gene() {
        // cooperates after a defection but defects after cooperation:
        // none of the tracked rules behave like this
        let gene = gene_of(&[C, D, C]);
        assert_eq!(classify(&gene), None);
    }
}
