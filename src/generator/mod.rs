/*
    This module generates random sentences of a grammar
*/

use rand::prelude::*;
use std::{collections::HashMap, fmt::Display};

use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateError {
    // An undefined nonterminal was used
    UndefinedNonterminal(String),
    // The nonterminal can never finish rewriting into terminals
    Unproductive(String),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateError::Unproductive(nonterminal) => write!(f, "Nonterminal `{}` never derives a sentence", nonterminal),
        }
    }
}

impl std::error::Error for GenerateError {}

pub type GenResult = Result<Vec<String>, GenerateError>;

// How deep each nonterminal has to go, at the least, before it bottoms out in
// terminals. Unproductive nonterminals are missing from the map.
fn min_heights(grammar: &Grammar) -> HashMap<&str, usize> {
    let mut heights: HashMap<&str, usize> = HashMap::new();

    loop {
        let mut changed = false;
        for (name, rewrite) in grammar.rules() {
            let best = rewrite.iter().filter_map(|alternative| alternative_height(alternative, &heights)).min();
            if let Some(best) = best {
                if heights.get(name).map_or(true, |&current| best < current) {
                    heights.insert(name, best);
                    changed = true;
                }
            }
        }

        if !changed {
            return heights;
        }
    }
}

fn alternative_height(alternative: &Alternative, heights: &HashMap<&str, usize>) -> Option<usize> {
    alternative
        .iter()
        .map(|symbol| match symbol {
            Symbol::Terminal(_) => Some(0),
            Symbol::Nonterminal(name) => heights.get(name.as_str()).copied(),
        })
        .try_fold(0, |deepest, height| height.map(|h| deepest.max(h)))
        .map(|deepest| deepest + 1)
}

struct Generator<'g, R> {
    grammar: &'g Grammar,
    heights: HashMap<&'g str, usize>,
    rng: R,
}

impl<'g, R: Rng> Generator<'g, R> {
    fn generate_nonterminal(&mut self, nonterminal: &str, budget: usize, out: &mut Vec<String>) -> Result<(), GenerateError> {
        let grammar = self.grammar;
        let rewrite = grammar
            .rewrite(nonterminal)
            .ok_or_else(|| GenerateError::UndefinedNonterminal(nonterminal.to_string()))?;
        let alternative = self.choose_alternative(nonterminal, rewrite, budget)?;

        for symbol in alternative {
            self.generate_symbol(symbol, budget.saturating_sub(1), out)?;
        }

        Ok(())
    }

    // Any alternative that still fits in the budget, or failing that the
    // shallowest ones, so recursion like `E -> E + T` always ends
    fn choose_alternative<'r>(&mut self, nonterminal: &str, rewrite: &'r Rewrite, budget: usize) -> Result<&'r Alternative, GenerateError> {
        let sized = rewrite
            .iter()
            .filter_map(|alternative| alternative_height(alternative, &self.heights).map(|h| (alternative, h)))
            .collect::<Vec<_>>();

        let fitting = sized.iter().filter(|(_, h)| *h <= budget).map(|(a, _)| *a).collect::<Vec<_>>();
        let candidates = if fitting.is_empty() {
            let shallowest = sized.iter().map(|(_, h)| *h).min();
            sized.iter().filter(|(_, h)| Some(*h) == shallowest).map(|(a, _)| *a).collect()
        } else {
            fitting
        };

        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| GenerateError::Unproductive(nonterminal.to_string()))
    }

    fn generate_symbol(&mut self, symbol: &Symbol, budget: usize, out: &mut Vec<String>) -> Result<(), GenerateError> {
        match symbol {
            Symbol::Nonterminal(t) => self.generate_nonterminal(t, budget, out),
            Symbol::Terminal(t) => {
                out.push(t.clone());
                Ok(())
            }
        }
    }
}

/// A random sentence of the grammar as a token sequence. Derivations are kept
/// to roughly `depth` levels where the grammar allows it.
pub fn generate(grammar: &Grammar, rng: impl Rng, depth: usize) -> GenResult {
    generate_with_override(grammar, grammar.start(), rng, depth)
}

// Generates a sentence in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: &str, rng: impl Rng, depth: usize) -> GenResult {
    let mut generator = Generator {
        grammar,
        heights: min_heights(grammar),
        rng,
    };

    let mut sentence = Vec::new();
    generator.generate_nonterminal(start, depth, &mut sentence)?;
    Ok(sentence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(name: &str) -> Symbol {
        Symbol::nonterminal(name)
    }

    fn t(text: &str) -> Symbol {
        Symbol::terminal(text)
    }

    #[test]
    fn heights_of_arithmetic() {
        let grammar = arithmetic();
        let heights = min_heights(&grammar);

        assert_eq!(heights.get("F"), Some(&1));
        assert_eq!(heights.get("T"), Some(&2));
        assert_eq!(heights.get("E"), Some(&3));
    }

    #[test]
    fn generate_is_seeded() {
        let grammar = arithmetic();
        let first = generate(&grammar, StdRng::seed_from_u64(7), 6).unwrap();
        let second = generate(&grammar, StdRng::seed_from_u64(7), 6).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn generate_at_zero_depth_takes_shortest() {
        let grammar = arithmetic();
        for seed in 0..20 {
            let sentence = generate(&grammar, StdRng::seed_from_u64(seed), 0).unwrap();
            assert_eq!(sentence.len(), 1);
        }
    }

    #[test]
    fn generate_unproductive() {
        let grammar = Grammar::build(nt("S"), vec![
            Production::new(nt("S"), vec![nt("Loop")]),
            Production::new(nt("Loop"), vec![nt("Loop"), t("x")]),
        ]).unwrap();

        assert_eq!(
            generate(&grammar, StdRng::seed_from_u64(0), 4),
            Err(GenerateError::Unproductive("S".to_string()))
        );
    }

    #[test]
    fn generate_with_undefined_start() {
        assert_eq!(
            generate_with_override(&arithmetic(), "Q", StdRng::seed_from_u64(0), 4),
            Err(GenerateError::UndefinedNonterminal("Q".to_string()))
        );
    }
}
