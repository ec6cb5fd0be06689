/*
    Bottom-up chart parsing over token spans

    The chart records, for every span [start, end) of the input, which
    nonterminals derive exactly those tokens and every way each of them does
    so. Sub-derivations of an alternative with two or more symbols always
    cover strictly smaller spans, so left and right recursion both terminate.
    Unit alternatives (`A -> B`) reuse the same span and are settled by
    iterating the span to a fixpoint.
*/

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;

use crate::grammar::{Grammar, Symbol};
use crate::order::{order, Direction};
use crate::tree::ParseTree;

/// Every complete derivation of an input, in the requested order. Empty when
/// the input has no parse.
pub type DerivationSet = Vec<ParseTree>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// One way of deriving a nonterminal over a span: the alternative used and the
// boundaries between its symbols. `boundaries` holds one more entry than the
// alternative has symbols, starting at the span's start and ending at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Proof {
    alternative: usize,
    boundaries: Vec<usize>,
}

impl Proof {
    fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.boundaries
            .iter()
            .tuple_windows()
            .map(|(&start, &end)| Span::new(start, end))
    }
}

type Cell<'g> = HashMap<&'g str, Vec<Proof>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStats {
    pub tokens: usize,
    pub cells: usize,
    pub entries: usize,
    pub proofs: usize,
}

impl Display for ChartStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tokens, {} non-empty cells, {} recognized nonterminals, {} proofs",
            self.tokens, self.cells, self.entries, self.proofs
        )
    }
}

/// The recognition table for one input. Lives only as long as the parse that
/// needs it.
pub struct Chart<'g, 't> {
    grammar: &'g Grammar,
    tokens: Vec<&'t str>,
    cells: HashMap<Span, Cell<'g>>,
}

impl<'g, 't> Chart<'g, 't> {
    pub fn build<S: AsRef<str>>(grammar: &'g Grammar, tokens: &'t [S]) -> Self {
        let mut chart = Chart {
            grammar,
            tokens: tokens.iter().map(AsRef::as_ref).collect_vec(),
            cells: HashMap::new(),
        };

        let n = chart.tokens.len();
        for length in 1..=n {
            for start in 0..=(n - length) {
                chart.fill(Span::new(start, start + length));
            }
        }

        chart
    }

    fn fill(&mut self, span: Span) {
        let grammar = self.grammar;
        let recognized = self.recognize_span(span);

        let cell: Cell<'g> = recognized
            .iter()
            .filter_map(|&name| {
                let rewrite = grammar.rewrite(name)?;
                let proofs = rewrite
                    .iter()
                    .enumerate()
                    .flat_map(|(alternative, symbols)| {
                        self.partitions(symbols, span, &recognized)
                            .into_iter()
                            .map(move |boundaries| Proof { alternative, boundaries })
                    })
                    .collect_vec();
                Some((name, proofs))
            })
            .collect();

        if !cell.is_empty() {
            self.cells.insert(span, cell);
        }
    }

    // Which nonterminals derive the span. Only needs smaller spans from the
    // chart plus whatever this loop has already settled for the same span.
    fn recognize_span(&self, span: Span) -> HashSet<&'g str> {
        let grammar = self.grammar;
        let mut recognized = HashSet::new();

        loop {
            let before = recognized.len();
            for (name, rewrite) in grammar.rules() {
                if recognized.contains(name) {
                    continue;
                }
                if rewrite.iter().any(|symbols| !self.partitions(symbols, span, &recognized).is_empty()) {
                    recognized.insert(name);
                }
            }

            if recognized.len() == before {
                return recognized;
            }
        }
    }

    // Every split of `span` into one non-empty sub-span per symbol, each
    // sub-span deriving its symbol. Splits come out with earlier boundaries first.
    fn partitions(&self, symbols: &[Symbol], span: Span, current: &HashSet<&str>) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        if !symbols.is_empty() {
            let mut boundaries = vec![span.start];
            self.extend_partition(symbols, span.start, span, current, &mut boundaries, &mut found);
        }
        found
    }

    fn extend_partition(
        &self,
        rest: &[Symbol],
        from: usize,
        span: Span,
        current: &HashSet<&str>,
        boundaries: &mut Vec<usize>,
        found: &mut Vec<Vec<usize>>,
    ) {
        let Some((symbol, after)) = rest.split_first() else {
            if from == span.end {
                found.push(boundaries.clone());
            }
            return;
        };

        // The last symbol has to reach the end; the others leave a token for
        // each symbol after them
        let ends = if after.is_empty() {
            span.end..=span.end
        } else {
            (from + 1)..=span.end.saturating_sub(after.len())
        };

        for to in ends {
            if to > from && self.matches(symbol, Span::new(from, to), span, current) {
                boundaries.push(to);
                self.extend_partition(after, to, span, current, boundaries, found);
                boundaries.pop();
            }
        }
    }

    fn matches(&self, symbol: &Symbol, sub: Span, span: Span, current: &HashSet<&str>) -> bool {
        match symbol {
            Symbol::Terminal(text) => sub.len() == 1 && self.tokens[sub.start] == text.as_str(),
            Symbol::Nonterminal(name) if sub == span => current.contains(name.as_str()),
            Symbol::Nonterminal(name) => self.is_recognized(name, sub),
        }
    }

    fn is_recognized(&self, name: &str, span: Span) -> bool {
        self.cells.get(&span).is_some_and(|cell| cell.contains_key(name))
    }

    pub fn tokens(&self) -> &[&'t str] {
        &self.tokens
    }

    /// Nonterminals that derive the span, sorted by name.
    pub fn recognized(&self, span: Span) -> Vec<&'g str> {
        self.cells
            .get(&span)
            .map(|cell| cell.keys().copied().sorted().collect_vec())
            .unwrap_or_default()
    }

    /// Whether the start symbol derives the whole input, without building any
    /// trees.
    pub fn accepts(&self) -> bool {
        let start = self.grammar.start();
        match self.tokens.len() {
            0 => self.grammar.rewrite(start).is_some_and(|rewrite| rewrite.iter().any(Vec::is_empty)),
            n => self.is_recognized(start, Span::new(0, n)),
        }
    }

    pub fn stats(&self) -> ChartStats {
        ChartStats {
            tokens: self.tokens.len(),
            cells: self.cells.len(),
            entries: self.cells.values().map(HashMap::len).sum(),
            proofs: self.cells.values().flat_map(HashMap::values).map(Vec::len).sum(),
        }
    }

    /// Every tree of the start symbol over the whole input, in chart order:
    /// alternatives in grammar order, then splits with earlier boundaries
    /// first, then the leftmost child's choices varying slowest.
    pub fn trees(&self) -> DerivationSet {
        let grammar = self.grammar;
        let start = grammar.start();

        // Every empty alternative of the start symbol gives the same tree
        if self.tokens.is_empty() {
            if !self.accepts() {
                return Vec::new();
            }
            return vec![ParseTree::node(Symbol::nonterminal(start), Vec::new())];
        }

        self.trees_for(start, Span::new(0, self.tokens.len()), &mut Vec::new())
    }

    // `path` holds the (nonterminal, span) pairs being expanded above this
    // one. Revisiting one can only happen through a cycle of unit
    // alternatives, and such a proof is dropped.
    fn trees_for(&self, name: &'g str, span: Span, path: &mut Vec<(&'g str, Span)>) -> Vec<ParseTree> {
        let grammar = self.grammar;
        let (Some(proofs), Some(rewrite)) = (
            self.cells.get(&span).and_then(|cell| cell.get(name)),
            grammar.rewrite(name),
        ) else {
            return Vec::new();
        };

        path.push((name, span));

        let mut trees = Vec::new();
        for proof in proofs {
            let children = rewrite[proof.alternative]
                .iter()
                .zip(proof.spans())
                .map(|(symbol, sub)| match symbol {
                    Symbol::Terminal(text) => vec![ParseTree::leaf(text.clone())],
                    Symbol::Nonterminal(child) if path.contains(&(child.as_str(), sub)) => Vec::new(),
                    Symbol::Nonterminal(child) => self.trees_for(child.as_str(), sub, path),
                })
                .collect_vec();

            trees.extend(
                children
                    .into_iter()
                    .multi_cartesian_product()
                    .map(|combination| ParseTree::node(Symbol::nonterminal(name), combination)),
            );
        }

        path.pop();
        trees
    }
}

/// All derivations of `tokens` from the grammar's start symbol, ordered by
/// `direction`. An empty result means the input has no parse.
pub fn parse<S: AsRef<str>>(grammar: &Grammar, tokens: &[S], direction: Direction) -> DerivationSet {
    order(Chart::build(grammar, tokens).trees(), direction)
}
