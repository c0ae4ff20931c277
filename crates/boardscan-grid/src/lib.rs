//! Chess semantics on top of a rectified board image.
//!
//! A [`GridMapper`] turns canonical-image pixels into algebraic squares
//! according to one shared [`GridGeometry`]. A [`BoardEncoder`] anchors
//! each transformed detection, looks up its FEN letter in a
//! [`PieceTable`] and accumulates a [`BoardState`], which serializes to
//! the FEN piece-placement field.
//!
//! ```
//! use boardscan_core::CanonicalBox;
//! use boardscan_grid::{BoardEncoder, Side};
//!
//! let pawn = CanonicalBox::new(17.0, 2.0, 27.0, 22.0, 0, "white-pawn");
//! let placement = BoardEncoder::default().encode(&[pawn]);
//! assert_eq!(placement.board.fen(Side::White), "8/8/8/8/8/8/8/P7 w - - 0 0");
//! ```

mod board;
mod encoder;
mod geometry;
mod mapper;
mod piece;
mod square;

pub use board::{check_placement, BoardState, PlacementError};
pub use encoder::{AnchorPolicy, BoardEncoder, PlacedPiece, Placement, SkippedPiece};
pub use geometry::{GridConfigError, GridGeometry};
pub use mapper::{GridMapper, OutOfBounds};
pub use piece::{ParseSideError, PieceTable, Side, FEN_PIECE_LETTERS};
pub use square::{GridSquare, ParseSquareError};
