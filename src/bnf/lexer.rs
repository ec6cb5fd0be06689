use std::iter::Peekable;
use std::str::Chars;

use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    // `=` or `->`
    Equals,
    Or,
    Nonterminal(String),
    Terminal(String)
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    // Consume the open quote; the same kind of quote has to close it
    let quote = line.next();
    let token_text = line.peeking_take_while(|&c| Some(c) != quote).collect();

    if line.next() != quote {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    Ok(Token::Terminal(token_text))
}

fn starts_arrow(line: &Peekable<Chars>) -> bool {
    let mut ahead = line.clone();
    ahead.next() == Some('-') && ahead.next() == Some('>')
}

// A name runs until whitespace, `|`, `=`, a quote or an arrow
fn take_name(line: &mut Peekable<Chars>) -> String {
    let mut name = String::new();
    while let Some(&c) = line.peek() {
        if c.is_whitespace() || c == '|' || c == '=' || is_quote(c) || starts_arrow(line) {
            break;
        }
        name.push(c);
        line.next();
    }
    name
}

pub fn lex_nonterminal(line: &mut Peekable<Chars>) -> Result<Token> {
    Ok(Token::Nonterminal(take_name(line)))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if starts_arrow(&line_chars) {
            line_chars.nth(1);
            tokens.push(Token::Equals);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if is_quote(c) {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_nonterminal(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    Ok(tokens)
}
