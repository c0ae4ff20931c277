//! Read the piece placement of a chessboard photograph as FEN.
//!
//! This crate provides:
//! - re-exports of the geometry core (`boardscan-core`) and the board
//!   domain (`boardscan-grid`)
//! - [`BoardScanner`], the end-to-end pipeline from a photograph, its board
//!   mask and piece detections to a FEN placement
//! - [`ScanParams`], every tunable in one JSON-loadable value
//! - file helpers for images, masks and detection lists
//! - (feature `cli`) the `boardscan` command-line tool
//!
//! The inference models that produce the mask and the detections are not
//! part of this crate; plug them in through [`PieceDetector`] and
//! [`BoardSegmenter`].
//!
//! ## Quickstart
//!
//! ```no_run
//! use boardscan::{load_detections, load_image, load_mask, BoardScanner, ScanParams, Side};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = load_image("board.jpg")?;
//! let mask = load_mask("board_mask.png")?;
//! let boxes = load_detections("pieces.json")?;
//!
//! let params = ScanParams {
//!     side_to_move: Some(Side::White),
//!     ..ScanParams::default()
//! };
//! let result = BoardScanner::new(params)?.scan(&image, &mask, &boxes)?;
//! println!("{}", result.fen());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `boardscan::core`: homographies, quads, boxes, contour extraction,
//!   corner normalization, warping, logging setup.
//! - `boardscan::grid`: squares, grid geometry, mapping, piece table,
//!   board state and FEN encoding.

pub use boardscan_core as core;
pub use boardscan_grid as grid;

mod artifact;
mod collab;
mod config;
mod io;
mod pipeline;

pub use artifact::{render_boxes, write_debug_image};
pub use collab::{BoardSegmenter, CollaboratorError, PieceDetector};
pub use config::ScanParams;
pub use io::{
    load_detections, load_image, load_mask, parse_detections, write_detections, ScanIoError,
};
pub use pipeline::{BoardScanner, ScanError, ScanResult};

pub use boardscan_core::{
    BoxRounding, CanonicalBox, GeometryError, SourceBox, TransformMatrices, WarpedBoard,
};
pub use boardscan_grid::{
    check_placement, AnchorPolicy, BoardState, GridSquare, Placement, Side, SkippedPiece,
};
pub use nalgebra::Point2;
