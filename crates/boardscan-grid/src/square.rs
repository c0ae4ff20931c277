use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the 64 board squares in algebraic terms.
///
/// `file` is the column index (0 = a .. 7 = h), `rank` the chess rank
/// (1..=8). Both are range-checked on construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridSquare {
    file: u8,
    rank: u8,
}

impl GridSquare {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && (1..=8).contains(&rank)).then_some(Self { file, rank })
    }

    /// Build from a file letter (`'a'..='h'`) and rank.
    pub fn from_label(file: char, rank: u8) -> Option<Self> {
        let idx = (file as u32).checked_sub('a' as u32)?;
        Self::new(u8::try_from(idx).ok()?, rank)
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    /// Row in a FEN-ordered grid: 0 is rank 8, 7 is rank 1.
    pub fn fen_row(&self) -> usize {
        7 - (self.rank as usize - 1)
    }

    /// Column in a FEN-ordered grid: 0 is file a.
    pub fn fen_col(&self) -> usize {
        self.file as usize
    }

    /// All 64 squares, a1, b1, .. h8.
    pub fn all() -> impl Iterator<Item = GridSquare> {
        (1..=8u8).flat_map(|rank| (0..8u8).map(move |file| GridSquare { file, rank }))
    }
}

impl fmt::Display for GridSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid square name {0:?}")]
pub struct ParseSquareError(pub String);

impl FromStr for GridSquare {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let square = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => r
                .to_digit(10)
                .and_then(|r| GridSquare::from_label(f, r as u8)),
            _ => None,
        };
        square.ok_or_else(|| ParseSquareError(s.to_owned()))
    }
}

impl TryFrom<String> for GridSquare {
    type Error = ParseSquareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GridSquare> for String {
    fn from(sq: GridSquare) -> Self {
        sq.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let e4: GridSquare = "e4".parse().expect("valid");
        assert_eq!((e4.file(), e4.rank()), (4, 4));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(e4.fen_row(), 4);
        assert_eq!(e4.fen_col(), 4);
    }

    #[test]
    fn rejects_off_board_names() {
        for bad in ["i1", "a0", "a9", "", "e", "e44", "E4"] {
            assert!(bad.parse::<GridSquare>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn there_are_64_unique_squares() {
        let mut all: Vec<_> = GridSquare::all().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 64);
    }

    #[test]
    fn serializes_as_name() {
        let a1 = GridSquare::from_label('a', 1).expect("valid");
        assert_eq!(serde_json::to_string(&a1).expect("json"), "\"a1\"");
        let back: GridSquare = serde_json::from_str("\"h8\"").expect("json");
        assert_eq!(back, GridSquare::new(7, 8).expect("valid"));
    }
}
