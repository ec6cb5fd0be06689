use std::collections::HashMap;

use itertools::Itertools;

use super::GrammarErrorType::{EmptyRewrite, UndefinedNonterminal};
use super::{Alternative, GrammarErrorType, Rewrite, Symbol::Nonterminal};

type Ruleset = HashMap<String, Rewrite>;

fn get_alternative_undefined_symbols(alternative: &Alternative, rules: &Ruleset) -> Vec<GrammarErrorType> {
    // Keep only the nonterminals, then only the ones nothing defines
    alternative.iter()
        .filter_map(|symbol| match symbol {
            Nonterminal(symbol) => Some(symbol),
            _ => None
        })
        .filter(|symbol| !rules.contains_key(*symbol))
        .map(|symbol| UndefinedNonterminal(symbol.to_owned()))
        .collect()
}

fn get_rewrite_problems(symbol: &str, rewrite: &Rewrite, rules: &Ruleset) -> Vec<GrammarErrorType> {
    if rewrite.is_empty() {
        return vec![EmptyRewrite(symbol.to_owned())];
    }

    rewrite.iter()
        .flat_map(|alternative| get_alternative_undefined_symbols(alternative, rules))
        .collect()
}

// Sorted by nonterminal so the report does not depend on hash order, and each
// undefined nonterminal is reported once
pub fn verify_rules(rules: &Ruleset) -> Vec<GrammarErrorType> {
    rules.iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .flat_map(|(symbol, rewrite)| get_rewrite_problems(symbol, rewrite, rules))
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Symbol;

    #[test]
    fn verify_reports_each_problem_once() {
        let mut rules = Ruleset::new();
        rules.insert("a".to_string(), vec![
            vec![Symbol::nonterminal("ghost"), Symbol::terminal("x")],
            vec![Symbol::nonterminal("ghost")],
        ]);
        rules.insert("b".to_string(), vec![]);
        rules.insert("c".to_string(), vec![vec![Symbol::nonterminal("a")]]);

        assert_eq!(verify_rules(&rules), vec![
            UndefinedNonterminal("ghost".to_string()),
            EmptyRewrite("b".to_string()),
        ]);
    }
}
