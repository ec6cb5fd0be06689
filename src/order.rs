/*
    Leftmost / rightmost ordering of a derivation set
*/

use std::fmt::Display;
use std::str::FromStr;

use crate::chart::DerivationSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Leftmost,
    Rightmost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirection(pub String);

impl Display for InvalidDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown derivation direction `{}` (expected `leftmost` or `rightmost`)", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "leftmost" => Ok(Direction::Leftmost),
            "right" | "rightmost" => Ok(Direction::Rightmost),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Leftmost => write!(f, "leftmost"),
            Direction::Rightmost => write!(f, "rightmost"),
        }
    }
}

/// Orders trees that came straight out of the chart. Leftmost keeps the chart's
/// order; rightmost is that order reversed. Trees themselves are untouched.
pub fn order(mut trees: DerivationSet, direction: Direction) -> DerivationSet {
    if direction == Direction::Rightmost {
        trees.reverse();
    }
    trees
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;
    use crate::tree::ParseTree;

    #[test]
    fn parse_directions() {
        let texts = vec!["left", "Leftmost", "RIGHT", "rightmost"];
        let answers = vec![Direction::Leftmost, Direction::Leftmost, Direction::Rightmost, Direction::Rightmost];

        for (text, answer) in zip(texts, answers) {
            assert_eq!(text.parse::<Direction>(), Ok(answer));
        }
    }

    #[test]
    fn parse_invalid_direction() {
        assert_eq!("izquierda".parse::<Direction>(), Err(InvalidDirection("izquierda".to_string())));
        assert_eq!("".parse::<Direction>(), Err(InvalidDirection(String::new())));
    }

    #[test]
    fn rightmost_reverses() {
        let trees = vec![ParseTree::leaf("1"), ParseTree::leaf("2"), ParseTree::leaf("3")];

        assert_eq!(order(trees.clone(), Direction::Leftmost), trees);
        assert_eq!(
            order(trees.clone(), Direction::Rightmost),
            vec![ParseTree::leaf("3"), ParseTree::leaf("2"), ParseTree::leaf("1")]
        );
    }
}
