/*
    The arithmetic expression grammar

        E -> E '+' T | E '-' T | T
        T -> T '*' F | T '/' F | F
        F -> '(' E ')' | 'a' | ... | 'z' | '0' | ... | '9'
*/

use std::collections::HashMap;

use super::{Grammar, Rewrite, Symbol};

pub const ARITHMETIC_OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

fn binary(left: &str, operator: &str, right: &str) -> Vec<Symbol> {
    vec![
        Symbol::nonterminal(left),
        Symbol::terminal(operator),
        Symbol::nonterminal(right),
    ]
}

fn operands() -> impl Iterator<Item = char> {
    ('a'..='z').chain('0'..='9')
}

pub fn arithmetic() -> Grammar {
    let expression: Rewrite = vec![
        binary("E", "+", "T"),
        binary("E", "-", "T"),
        vec![Symbol::nonterminal("T")],
    ];

    let term: Rewrite = vec![
        binary("T", "*", "F"),
        binary("T", "/", "F"),
        vec![Symbol::nonterminal("F")],
    ];

    let mut factor: Rewrite = vec![vec![
        Symbol::terminal("("),
        Symbol::nonterminal("E"),
        Symbol::terminal(")"),
    ]];
    factor.extend(operands().map(|c| vec![Symbol::terminal(c.to_string())]));

    let rules = HashMap::from([
        ("E".to_string(), expression),
        ("T".to_string(), term),
        ("F".to_string(), factor),
    ]);

    Grammar::from_verified("E".to_string(), rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_shape() {
        let grammar = arithmetic();

        assert_eq!(grammar.start(), "E");
        assert_eq!(grammar.nonterminals().len(), 3);
        // 26 letters, 10 digits, parentheses and four operators
        assert_eq!(grammar.terminals().len(), 42);
        assert_eq!(grammar.rewrite("F").map(Vec::len), Some(37));
    }
}
