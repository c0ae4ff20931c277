use std::fmt;

use crate::{GridSquare, Side, FEN_PIECE_LETTERS};

/// 8x8 occupancy grid in FEN order: row 0 is rank 8, column 0 is file a.
///
/// Built fresh for every image and thrown away after serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardState {
    cells: [[Option<char>; 8]; 8],
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, square: GridSquare) -> Option<char> {
        self.cells[square.fen_row()][square.fen_col()]
    }

    /// Write `letter` on `square`, returning whatever was there before.
    pub fn set(&mut self, square: GridSquare, letter: char) -> Option<char> {
        self.cells[square.fen_row()][square.fen_col()].replace(letter)
    }

    pub fn clear(&mut self, square: GridSquare) -> Option<char> {
        self.cells[square.fen_row()][square.fen_col()].take()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    /// Rows top to bottom (rank 8 first).
    pub fn rows(&self) -> &[[Option<char>; 8]; 8] {
        &self.cells
    }

    /// FEN piece-placement field: eight `/`-joined rows, runs of empty
    /// squares written as their count.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(71);
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            let mut empty = 0u8;
            for cell in row {
                match cell {
                    Some(letter) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(*letter);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
        }
        out
    }

    /// Placement plus the fixed move-context suffix ` <side> - - 0 0`.
    ///
    /// Castling, en-passant and the clocks cannot be read off a photograph;
    /// they are placeholders, not computed values.
    pub fn fen(&self, side: Side) -> String {
        format!("{} {} - - 0 0", self.placement(), side)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placement())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has width {width}, expected 8")]
    RowWidth { row: usize, width: u32 },
    #[error("row {row} contains invalid character {ch:?}")]
    InvalidChar { row: usize, ch: char },
}

/// Check that `placement` has 8 `/`-separated rows, each of width 8 when
/// digits count as runs of empty squares and letters as one piece.
pub fn check_placement(placement: &str) -> Result<(), PlacementError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(PlacementError::RowCount(rows.len()));
    }
    for (row, text) in rows.iter().enumerate() {
        let mut width = 0u32;
        for ch in text.chars() {
            width += match ch {
                '1'..='8' => ch as u32 - '0' as u32,
                c if FEN_PIECE_LETTERS.contains(c) => 1,
                _ => return Err(PlacementError::InvalidChar { row, ch }),
            };
        }
        if width != 8 {
            return Err(PlacementError::RowWidth { row, width });
        }
    }
    Ok(())
}
