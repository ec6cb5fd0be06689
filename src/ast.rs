/*
    Reduces a parse tree to an abstract syntax tree

    Structural nonterminals with a single child disappear in favour of that
    child, and a structural node reading `lhs op rhs` becomes an operator node
    `op(lhs, rhs)`. Operator nodes are kept. Leaves are kept as they are.
*/

use std::collections::HashSet;

use crate::grammar::{Grammar, Symbol, ARITHMETIC_OPERATORS};
use crate::tree::ParseTree;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Structural {
    // Every nonterminal label
    AnyNonterminal,
    Only(HashSet<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplifier {
    operators: HashSet<String>,
    structural: Structural,
}

impl Default for Simplifier {
    fn default() -> Self {
        Simplifier {
            operators: ARITHMETIC_OPERATORS.iter().map(|op| op.to_string()).collect(),
            structural: Structural::AnyNonterminal,
        }
    }
}

impl Simplifier {
    /// Treats exactly the grammar's nonterminals as structural.
    pub fn for_grammar(grammar: &Grammar) -> Self {
        Simplifier {
            structural: Structural::Only(grammar.nonterminals().into_iter().map(str::to_string).collect()),
            ..Simplifier::default()
        }
    }

    pub fn with_operators<I, S>(self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Simplifier {
            operators: operators.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    fn is_operator(&self, label: &Symbol) -> bool {
        matches!(label, Symbol::Terminal(op) if self.operators.contains(op))
    }

    fn is_structural(&self, label: &Symbol) -> bool {
        match (label, &self.structural) {
            (Symbol::Terminal(_), _) => false,
            (Symbol::Nonterminal(_), Structural::AnyNonterminal) => true,
            (Symbol::Nonterminal(name), Structural::Only(names)) => names.contains(name),
        }
    }

    pub fn simplify(&self, tree: &ParseTree) -> ParseTree {
        let ParseTree::Node { label, children } = tree else {
            return tree.clone();
        };

        if self.is_operator(label) {
            return ParseTree::node(label.clone(), self.simplify_all(children));
        }

        if !self.is_structural(label) {
            return ParseTree::node(label.clone(), self.simplify_all(children));
        }

        if let [only] = children.as_slice() {
            return self.simplify(only);
        }

        // Promotion looks at simplified children so that `lhs Op rhs` with
        // `Op -> '+'` reads the same as `lhs '+' rhs`
        let simplified = self.simplify_all(children);
        match <[ParseTree; 3]>::try_from(simplified) {
            Ok([lhs, ParseTree::Leaf(op), rhs]) if self.operators.contains(&op) => {
                ParseTree::node(Symbol::Terminal(op), vec![lhs, rhs])
            }
            Ok(three) => ParseTree::node(label.clone(), three.into()),
            Err(other) => ParseTree::node(label.clone(), other),
        }
    }

    fn simplify_all(&self, children: &[ParseTree]) -> Vec<ParseTree> {
        children.iter().map(|child| self.simplify(child)).collect()
    }
}

/// Simplifies with the arithmetic operators, treating every nonterminal as
/// structural.
pub fn simplify(tree: &ParseTree) -> ParseTree {
    Simplifier::default().simplify(tree)
}
