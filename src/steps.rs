/*
    Derivation step listings for a single parse tree
*/

use itertools::Itertools;

use crate::grammar::Symbol;
use crate::order::Direction;
use crate::tree::ParseTree;

/// The yield of every internal node, in pre-order. One entry per node; leaves
/// only show up inside their ancestors' entries.
pub fn flatten(tree: &ParseTree) -> Vec<String> {
    let mut steps = Vec::with_capacity(tree.internal_nodes());
    flatten_into(tree, &mut steps);
    steps
}

fn flatten_into(tree: &ParseTree, steps: &mut Vec<String>) {
    if let ParseTree::Node { children, .. } = tree {
        steps.push(tree.yield_string());
        for child in children {
            flatten_into(child, steps);
        }
    }
}

enum FormItem<'a> {
    Pending(&'a ParseTree),
    Done(Symbol),
}

impl FormItem<'_> {
    fn of(tree: &ParseTree) -> FormItem<'_> {
        match tree {
            ParseTree::Leaf(text) => FormItem::Done(Symbol::terminal(text.clone())),
            ParseTree::Node { .. } => FormItem::Pending(tree),
        }
    }

    fn symbol(&self) -> Symbol {
        match self {
            FormItem::Done(symbol) => symbol.clone(),
            FormItem::Pending(tree) => tree.label().cloned().unwrap_or_else(|| Symbol::terminal(tree.yield_string())),
        }
    }
}

/// The textbook derivation of `tree`: the root label, then one sentential
/// form per expansion of the leftmost (or rightmost) unexpanded node, ending
/// in the leaves.
pub fn sentential_forms(tree: &ParseTree, direction: Direction) -> Vec<Vec<Symbol>> {
    let mut forms = Vec::with_capacity(tree.internal_nodes() + 1);
    let mut frontier = vec![FormItem::of(tree)];

    loop {
        forms.push(frontier.iter().map(FormItem::symbol).collect_vec());

        let mut pending = frontier
            .iter()
            .positions(|item| matches!(item, FormItem::Pending(_)));
        let next = match direction {
            Direction::Leftmost => pending.next(),
            Direction::Rightmost => pending.last(),
        };

        let Some(index) = next else {
            return forms;
        };

        let expanded = match frontier[index] {
            FormItem::Pending(node) => node.children().iter().map(FormItem::of).collect_vec(),
            FormItem::Done(_) => Vec::new(),
        };
        frontier.splice(index..=index, expanded);
    }
}

pub fn render_form(form: &[Symbol]) -> String {
    form.iter().join(" ")
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;
    use crate::chart::parse;
    use crate::grammar::arithmetic;

    fn parse_one(text: &str) -> ParseTree {
        let tokens = text.split_whitespace().collect::<Vec<_>>();
        parse(&arithmetic(), &tokens, Direction::Leftmost).remove(0)
    }

    fn rendered(forms: Vec<Vec<Symbol>>) -> Vec<String> {
        forms.iter().map(|form| render_form(form)).collect()
    }

    #[test]
    fn flatten_sum() {
        assert_eq!(flatten(&parse_one("a + b")), vec![
            "a + b",
            "a",
            "a",
            "a",
            "b",
            "b",
        ]);
    }

    #[test]
    fn flatten_leaf_has_no_steps() {
        assert_eq!(flatten(&ParseTree::leaf("a")), Vec::<String>::new());
    }

    // Pre-order index of each internal node's parent
    fn parents(tree: &ParseTree, parent: Option<usize>, found: &mut Vec<Option<usize>>) {
        if let ParseTree::Node { children, .. } = tree {
            let index = found.len();
            found.push(parent);
            for child in children {
                parents(child, Some(index), found);
            }
        }
    }

    #[test]
    fn flatten_entries_are_contiguous_in_parent() {
        for text in ["( a + b ) * c - d", "a * a * a", "( ( x ) )"] {
            let tree = parse_one(text);
            let steps = flatten(&tree);
            let mut found = Vec::new();
            parents(&tree, None, &mut found);

            assert_eq!(steps.len(), found.len(), "{}", text);
            for (step, parent) in zip(&steps, found) {
                let Some(parent) = parent else {
                    assert_eq!(step, text);
                    continue;
                };
                let inner = step.split_whitespace().collect_vec();
                let outer = steps[parent].split_whitespace().collect_vec();
                assert!(outer.windows(inner.len()).any(|window| window == inner.as_slice()), "{} in {}", step, steps[parent]);
            }
        }
    }

    #[test]
    fn leftmost_forms() {
        assert_eq!(rendered(sentential_forms(&parse_one("a + b"), Direction::Leftmost)), vec![
            "E",
            "E + T",
            "T + T",
            "F + T",
            "a + T",
            "a + F",
            "a + b",
        ]);
    }

    #[test]
    fn rightmost_forms() {
        assert_eq!(rendered(sentential_forms(&parse_one("a + b"), Direction::Rightmost)), vec![
            "E",
            "E + T",
            "E + F",
            "E + b",
            "T + b",
            "F + b",
            "a + b",
        ]);
    }

    #[test]
    fn forms_of_epsilon_tree() {
        let tree = ParseTree::node(Symbol::nonterminal("S"), vec![]);
        assert_eq!(sentential_forms(&tree, Direction::Leftmost), vec![
            vec![Symbol::nonterminal("S")],
            vec![],
        ]);
    }
}
