/*
    This module reads grammars written in a BNF-like notation

        E -> E '+' T | T
        noun.phrase = adjective " " noun | noun

    The first rule's left-hand side is the start symbol. Lines starting with
    `;` or `#` are comments.

    `''` or `""` is the empty string, and is dropped from any alternative it
    appears in. An alternative left with no symbols only ever matches for the
    start symbol on empty input: `A -> '' | 'a'` reads fine, but inside a
    larger rule `A` always covers at least one token, so `S -> A 'b'` does not
    accept `b`.
*/

mod lexer;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::{Either, Itertools};
use lexer::*;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // The rules parsed, but do not make a grammar
    Malformed(GrammarErrorType),
    // Somehow a full rewrite was parsed as a base alternative
    UnsplitRewrite,
    // A blank line got too deep into the parser
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::Malformed(a), CompileErrorType::Malformed(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` or `->` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::Malformed(problem) => write!(f, "{}", problem),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a bug in the grammar reader)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a bug in the grammar reader)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError {
        location: Location::file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    location: Location
}

// An empty terminal (`""`) derives nothing, so it is left out of the alternative
fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter().filter_map(|t| match t {
        Token::Equals => Some(Err(CompileErrorType::UnexpectedEquals)),
        Token::Or => Some(Err(CompileErrorType::UnsplitRewrite)),
        Token::Nonterminal(s) => Some(Ok(Symbol::Nonterminal(s.clone()))),
        Token::Terminal(s) if s.is_empty() => None,
        Token::Terminal(s) => Some(Ok(Symbol::Terminal(s.clone())))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(s)) => Ok(s.clone()),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    Ok(Rule {
        symbol,
        rewrite,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(';') && !line.starts_with('#')
}

// Where a grammar problem should be reported: the rule that triggered it, or
// the file as a whole when no single rule did
fn locate(problem: &GrammarErrorType, rules: &[Rule], path: &Path) -> Location {
    let culprit = match problem {
        GrammarErrorType::UndefinedNonterminal(name) => rules.iter().find(|rule| {
            rule.rewrite.iter().flatten().any(|symbol| *symbol == Symbol::Nonterminal(name.clone()))
        }),
        GrammarErrorType::MissingStart(name) | GrammarErrorType::EmptyRewrite(name) => {
            rules.iter().find(|rule| rule.symbol == *name)
        }
        GrammarErrorType::StartNotNonterminal(_) | GrammarErrorType::TerminalLeftHandSide(_) => None,
    };

    culprit.map_or_else(|| Location::file(path), |rule| rule.location.clone())
}

fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    let start_symbol = rules.first().map(|rule| rule.symbol.clone()).unwrap_or_default();

    let grouped = rules
        .iter()
        .map(|rule| (Symbol::nonterminal(rule.symbol.clone()), rule.rewrite.clone()));

    Grammar::from_rules(Symbol::nonterminal(start_symbol), grouped).map_err(|MalformedGrammar(problems)| {
        problems
            .into_iter()
            .map(|problem| CompileError {
                location: locate(&problem, &rules, path),
                error: CompileErrorType::Malformed(problem),
            })
            .collect_vec()
    })
}

fn grammar_from_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location::new(path, num)))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_map(|result| match result {
        Ok(rule) => Either::Left(rule),
        Err(error) => Either::Right(error),
    });
    if !errors.is_empty() {
        return Err(errors);
    }

    grammar_from_rules(rules, path)
}

// Numbers the lines from 1 and drops blanks and comments, keeping read errors
fn numbered_rule_lines<I>(lines: I) -> impl Iterator<Item = (usize, LineResult<String>)>
where
    I: Iterator<Item = LineResult<String>>,
{
    lines
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |line| is_rule_line(line)))
        .map(|(num, line)| (num + 1, line))
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    let lines = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| io_error(e, path)));

    grammar_from_lines(numbered_rule_lines(lines), path)
}

/// Reads a grammar from text. `path` only names the source in error locations.
pub fn parse_str(text: &str, path: &Path) -> FileResult<Grammar> {
    let lines = text.lines().map(|line| Ok(line.to_string()));
    grammar_from_lines(numbered_rule_lines(lines), path)
}
