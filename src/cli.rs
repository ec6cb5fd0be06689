use std::path::PathBuf;

use clap::Parser;

use chartparse::Direction;

#[derive(Parser)]
#[command(version, about = "List the derivations of an expression under a context-free grammar")]
pub struct Cli {
    /// Expression to parse; tokens are separated by whitespace
    pub expression: Vec<String>,

    /// File containing the grammar (default: the built-in arithmetic grammar)
    #[arg(short, long, value_name = "FILE")]
    pub grammar: Option<PathBuf>,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Derivation order, `leftmost` or `rightmost`
    #[arg(short, long, value_name = "DIRECTION", default_value = "leftmost")]
    pub direction: Direction,

    /// Show the abstract syntax tree instead of the derivation
    #[arg(long)]
    pub ast: bool,

    /// List sentential forms instead of node yields
    #[arg(long, conflicts_with = "ast")]
    pub forms: bool,

    /// Show every derivation, not only the first
    #[arg(short, long)]
    pub all: bool,

    /// Generate this many sentences from the grammar instead of parsing
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<u32>,

    /// How deep generated sentences may go before taking the shortest way out
    #[arg(long, value_name = "DEPTH", default_value_t = 6)]
    pub depth: usize,

    /// Refuse inputs longer than this many tokens
    #[arg(long, value_name = "TOKENS", default_value_t = 64)]
    pub max_tokens: usize,

    /// Print chart statistics to stderr
    #[arg(short, long)]
    pub verbose: bool
}

impl Cli {
    pub fn tokens(&self) -> Vec<&str> {
        self.expression.iter().flat_map(|word| word.split_whitespace()).collect()
    }
}
