/*
    This module is for storing and inspecting grammars
*/

mod arithmetic;
mod verifier;

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;

pub use arithmetic::{arithmetic, ARITHMETIC_OPERATORS};

// The base unit in a grammar rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(text.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(s) | Symbol::Nonterminal(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule
pub type Rewrite = Vec<Alternative>;

/// One alternative of one nonterminal, `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Alternative,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Alternative) -> Self {
        Production { lhs, rhs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrammarErrorType {
    // The start symbol has no productions
    MissingStart(String),
    // The start symbol is a terminal
    StartNotNonterminal(String),
    // A production rewrites a terminal
    TerminalLeftHandSide(String),
    // A nonterminal was declared with no alternatives at all
    EmptyRewrite(String),
    // A right-hand side uses a nonterminal that has no productions
    UndefinedNonterminal(String),
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::MissingStart(s) => write!(f, "Start symbol `{}` has no productions", s),
            GrammarErrorType::StartNotNonterminal(s) => write!(f, "Start symbol `{}` is a terminal", s),
            GrammarErrorType::TerminalLeftHandSide(s) => write!(f, "Terminal `{}` cannot be rewritten", s),
            GrammarErrorType::EmptyRewrite(s) => write!(f, "Nonterminal `{}` has no alternatives", s),
            GrammarErrorType::UndefinedNonterminal(s) => write!(f, "Could not find definition for `{}`", s),
        }
    }
}

/// Every structural problem found while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedGrammar(pub Vec<GrammarErrorType>);

impl Display for MalformedGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed grammar: {}", self.0.iter().join("; "))
    }
}

impl std::error::Error for MalformedGrammar {}

pub type GrammarResult<T> = std::result::Result<T, MalformedGrammar>;

/// An immutable context-free grammar.
///
/// Once built it is only ever read, so a single grammar can back any number
/// of parses at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    start_symbol: String,
    rules: HashMap<String, Rewrite>,
}

impl Grammar {
    /// Builds a grammar from a flat list of productions, grouping the
    /// alternatives of each nonterminal in the order they are given.
    pub fn build(start: Symbol, productions: impl IntoIterator<Item = Production>) -> GrammarResult<Grammar> {
        let mut rules: Vec<(Symbol, Rewrite)> = Vec::new();
        for production in productions {
            match rules.iter_mut().find(|(lhs, _)| *lhs == production.lhs) {
                Some((_, rewrite)) => rewrite.push(production.rhs),
                None => rules.push((production.lhs, vec![production.rhs])),
            }
        }

        Grammar::from_rules(start, rules)
    }

    /// Builds a grammar from rules already grouped by left-hand side. A left-hand
    /// side that shows up more than once gets its alternatives appended, and an
    /// alternative repeated for the same nonterminal is kept only once.
    pub fn from_rules(start: Symbol, rules: impl IntoIterator<Item = (Symbol, Rewrite)>) -> GrammarResult<Grammar> {
        let mut problems = Vec::new();

        let mut merged = HashMap::<String, Rewrite>::new();
        for (lhs, rewrite) in rules {
            match lhs {
                Symbol::Terminal(text) => problems.push(GrammarErrorType::TerminalLeftHandSide(text)),
                Symbol::Nonterminal(name) => merged.entry(name).or_default().extend(rewrite),
            }
        }

        // Equal alternatives would give the same derivation twice
        for rewrite in merged.values_mut() {
            *rewrite = std::mem::take(rewrite).into_iter().unique().collect();
        }

        let start_symbol = match start {
            Symbol::Terminal(text) => {
                problems.push(GrammarErrorType::StartNotNonterminal(text.clone()));
                text
            }
            Symbol::Nonterminal(name) => {
                if !merged.contains_key(&name) {
                    problems.push(GrammarErrorType::MissingStart(name.clone()));
                }
                name
            }
        };

        problems.extend(verifier::verify_rules(&merged));

        if !problems.is_empty() {
            return Err(MalformedGrammar(problems));
        }

        Ok(Grammar {
            start_symbol,
            rules: merged,
        })
    }

    // Only for grammars whose shape is fixed in source
    pub(crate) fn from_verified(start_symbol: String, rules: HashMap<String, Rewrite>) -> Grammar {
        debug_assert!(verifier::verify_rules(&rules).is_empty());
        Grammar { start_symbol, rules }
    }

    /// A copy of this grammar that starts from another nonterminal.
    pub fn with_start(&self, start: &str) -> GrammarResult<Grammar> {
        if !self.rules.contains_key(start) {
            return Err(MalformedGrammar(vec![GrammarErrorType::MissingStart(start.to_string())]));
        }

        Ok(Grammar {
            start_symbol: start.to_string(),
            rules: self.rules.clone(),
        })
    }

    pub fn start(&self) -> &str {
        &self.start_symbol
    }

    pub fn rewrite(&self, nonterminal: &str) -> Option<&Rewrite> {
        self.rules.get(nonterminal)
    }

    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rewrite)> {
        self.rules.iter().map(|(name, rewrite)| (name.as_str(), rewrite))
    }

    pub fn nonterminals(&self) -> HashSet<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn terminals(&self) -> HashSet<&str> {
        self.rules
            .values()
            .flatten()
            .flatten()
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(t) => Some(t.as_str()),
                Symbol::Nonterminal(_) => None,
            })
            .collect()
    }

    pub fn productions(&self) -> impl Iterator<Item = Production> + '_ {
        self.rules.iter().flat_map(|(name, rewrite)| {
            rewrite
                .iter()
                .map(move |alternative| Production::new(Symbol::nonterminal(name.clone()), alternative.clone()))
        })
    }
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
    fn build_groups_alternatives() {
        let grammar = Grammar::build(nt("S"), vec![
            Production::new(nt("S"), vec![nt("A"), t("x")]),
            Production::new(nt("A"), vec![t("a")]),
            Production::new(nt("S"), vec![t("y")]),
        ]).unwrap();

        assert_eq!(grammar.start(), "S");
        assert_eq!(grammar.rewrite("S"), Some(&vec![vec![nt("A"), t("x")], vec![t("y")]]));
        assert_eq!(grammar.nonterminals(), HashSet::from(["S", "A"]));
        assert_eq!(grammar.terminals(), HashSet::from(["x", "y", "a"]));
        assert_eq!(grammar.productions().count(), 3);
    }

    #[test]
    fn build_missing_start() {
        let error = Grammar::build(nt("S"), vec![Production::new(nt("A"), vec![t("a")])]).unwrap_err();
        assert_eq!(error, MalformedGrammar(vec![GrammarErrorType::MissingStart("S".to_string())]));

        let error = Grammar::build(nt("S"), vec![]).unwrap_err();
        assert_eq!(error, MalformedGrammar(vec![GrammarErrorType::MissingStart("S".to_string())]));
    }

    #[test]
    fn build_terminal_left_hand_side() {
        let error = Grammar::build(t("s"), vec![
            Production::new(t("s"), vec![t("a")]),
        ]).unwrap_err();

        assert_eq!(error, MalformedGrammar(vec![
            GrammarErrorType::TerminalLeftHandSide("s".to_string()),
            GrammarErrorType::StartNotNonterminal("s".to_string()),
        ]));
    }

    #[test]
    fn from_rules_empty_rewrite() {
        let error = Grammar::from_rules(nt("S"), vec![
            (nt("S"), vec![vec![nt("A")]]),
            (nt("A"), vec![]),
        ]).unwrap_err();

        assert_eq!(error, MalformedGrammar(vec![GrammarErrorType::EmptyRewrite("A".to_string())]));
    }

    #[test]
    fn from_rules_merges_repeated_rules() {
        let grammar = Grammar::from_rules(nt("S"), vec![
            (nt("S"), vec![vec![t("a")]]),
            (nt("S"), vec![vec![t("b")]]),
        ]).unwrap();

        assert_eq!(grammar.rewrite("S"), Some(&vec![vec![t("a")], vec![t("b")]]));
    }

    #[test]
    fn repeated_alternatives_kept_once() {
        let grammar = Grammar::from_rules(nt("S"), vec![
            (nt("S"), vec![vec![t("a")], vec![], vec![t("a")]]),
            (nt("S"), vec![vec![], vec![t("b")], vec![t("a")]]),
        ]).unwrap();

        assert_eq!(grammar.rewrite("S"), Some(&vec![vec![t("a")], vec![], vec![t("b")]]));
    }

    #[test]
    fn undefined_nonterminal() {
        let error = Grammar::build(nt("S"), vec![
            Production::new(nt("S"), vec![nt("Missing"), t("a")]),
        ]).unwrap_err();

        assert_eq!(error, MalformedGrammar(vec![GrammarErrorType::UndefinedNonterminal("Missing".to_string())]));
        assert_eq!(error.to_string(), "Malformed grammar: Could not find definition for `Missing`");
    }

    #[test]
    fn grammar_is_shareable() {
        fn shareable<T: Send + Sync>(_: &T) {}

        let grammar = arithmetic();
        shareable(&grammar);
        assert!(grammar.is_nonterminal("F"));
        assert!(!grammar.is_nonterminal("a"));
    }

    #[test]
    fn with_start_override() {
        let grammar = arithmetic();
        assert_eq!(grammar.with_start("T").unwrap().start(), "T");
        assert!(grammar.with_start("Q").is_err());
    }
}
