use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GridConfigError;

/// FEN letters of the six piece kinds, white (uppercase) then black.
pub const FEN_PIECE_LETTERS: &str = "PNBRQKpnbrqk";

/// Detector class label -> FEN piece letter.
///
/// Labels without an entry are not pieces (hands, clocks, ...) and are
/// ignored by the encoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceTable {
    letters: BTreeMap<String, char>,
}

impl Default for PieceTable {
    fn default() -> Self {
        let letters = [
            ("black-pawn", 'p'),
            ("black-rook", 'r'),
            ("black-knight", 'n'),
            ("black-bishop", 'b'),
            ("black-queen", 'q'),
            ("black-king", 'k'),
            ("white-pawn", 'P'),
            ("white-rook", 'R'),
            ("white-knight", 'N'),
            ("white-bishop", 'B'),
            ("white-queen", 'Q'),
            ("white-king", 'K'),
        ]
        .into_iter()
        .map(|(label, letter)| (label.to_owned(), letter))
        .collect();
        Self { letters }
    }
}

impl PieceTable {
    /// Build a table from explicit pairs, rejecting non-FEN letters.
    pub fn new<I, S>(entries: I) -> Result<Self, GridConfigError>
    where
        I: IntoIterator<Item = (S, char)>,
        S: Into<String>,
    {
        let table = Self {
            letters: entries
                .into_iter()
                .map(|(label, letter)| (label.into(), letter))
                .collect(),
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        match self
            .letters
            .iter()
            .find(|(_, letter)| !FEN_PIECE_LETTERS.contains(**letter))
        {
            Some((label, &letter)) => Err(GridConfigError::InvalidPieceLetter {
                label: label.clone(),
                letter,
            }),
            None => Ok(()),
        }
    }

    pub fn letter(&self, class_label: &str) -> Option<char> {
        self.letters.get(class_label).copied()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

/// Side to move. Never inferred from the photograph; always supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w", alias = "white")]
    White,
    #[serde(rename = "b", alias = "black")]
    Black,
}

impl Side {
    pub fn fen_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("side must be 'w' or 'b' (got {0:?})")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            _ => Err(ParseSideError(s.to_owned())),
        }
    }
}
