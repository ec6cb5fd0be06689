/*
    Parse trees and their text renderings
*/

use std::fmt::{Display, Write};

use itertools::Itertools;

use crate::grammar::Symbol;

/// A derivation tree. Nodes own their children outright; there is no sharing
/// between trees, even ones produced by the same parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseTree {
    Leaf(String),
    Node {
        label: Symbol,
        children: Vec<ParseTree>,
    },
}

impl ParseTree {
    pub fn leaf(text: impl Into<String>) -> Self {
        ParseTree::Leaf(text.into())
    }

    pub fn node(label: Symbol, children: Vec<ParseTree>) -> Self {
        ParseTree::Node { label, children }
    }

    pub fn label(&self) -> Option<&Symbol> {
        match self {
            ParseTree::Leaf(_) => None,
            ParseTree::Node { label, .. } => Some(label),
        }
    }

    pub fn children(&self) -> &[ParseTree] {
        match self {
            ParseTree::Leaf(_) => &[],
            ParseTree::Node { children, .. } => children,
        }
    }

    /// The terminal texts under this tree, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        match self {
            ParseTree::Leaf(text) => leaves.push(text),
            ParseTree::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// The leaves joined by single spaces.
    pub fn yield_string(&self) -> String {
        self.leaves().join(" ")
    }

    pub fn internal_nodes(&self) -> usize {
        match self {
            ParseTree::Leaf(_) => 0,
            ParseTree::Node { children, .. } => 1 + children.iter().map(ParseTree::internal_nodes).sum::<usize>(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            ParseTree::Leaf(_) => 0,
            ParseTree::Node { children, .. } => 1 + children.iter().map(ParseTree::height).max().unwrap_or(0),
        }
    }

    fn write_indented(&self, out: &mut String, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            ParseTree::Leaf(text) => writeln!(out, "{}{}", indent, text),
            ParseTree::Node { label, children } if children.iter().all(|c| matches!(c, ParseTree::Leaf(_))) => {
                writeln!(out, "{}{}", indent, self.bracketed_with(label))
            }
            ParseTree::Node { label, children } => {
                writeln!(out, "{}({}", indent, label)?;
                for child in children {
                    child.write_indented(out, depth + 1)?;
                }
                writeln!(out, "{})", indent)
            }
        }
    }

    fn bracketed_with(&self, label: &Symbol) -> String {
        let children = self.children();
        if children.is_empty() {
            format!("({})", label)
        } else {
            format!("({} {})", label, children.iter().join(" "))
        }
    }
}

/// `{}` prints the one-line bracketed form, `(E (E (T (F a))) + (T (F b)))`.
/// `{:#}` prints one node per line, indented by depth.
impl Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            let mut out = String::new();
            self.write_indented(&mut out, 0)?;
            return write!(f, "{}", out.trim_end());
        }

        match self {
            ParseTree::Leaf(text) => write!(f, "{}", text),
            ParseTree::Node { label, .. } => write!(f, "{}", self.bracketed_with(label)),
        }
    }
}
