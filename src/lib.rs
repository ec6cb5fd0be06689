/*
    Chart parsing for context-free grammars

    A `Grammar` goes into `chart::parse` together with a token sequence and
    comes back as every derivation tree of those tokens. Any one tree can then
    be listed step by step (`steps`) or reduced to an abstract syntax tree
    (`ast`).
*/

pub mod ast;
pub mod bnf;
pub mod chart;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod order;
pub mod steps;
pub mod tree;

pub use ast::{simplify, Simplifier};
pub use chart::{parse, Chart, DerivationSet, Span};
pub use grammar::{Grammar, MalformedGrammar, Production, Symbol};
pub use order::{order, Direction, InvalidDirection};
pub use steps::{flatten, sentential_forms};
pub use tree::ParseTree;
