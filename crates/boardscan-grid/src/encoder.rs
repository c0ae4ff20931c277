use boardscan_core::{BoxRounding, CanonicalBox};
use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{BoardState, GridMapper, GridSquare, OutOfBounds, PieceTable};

/// Which pixel of a box decides the square it stands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// `(center_x, y2)`: the piece's base.
    #[default]
    BottomCenter,
    /// Box centre. Deprecated: tall pieces lean into the square behind
    /// them, so this misplaces kings and queens near the far ranks.
    Centroid,
}

impl AnchorPolicy {
    pub fn anchor(self, b: &CanonicalBox) -> Point2<f32> {
        match self {
            AnchorPolicy::BottomCenter => b.bottom_center(),
            AnchorPolicy::Centroid => b.center(),
        }
    }
}

/// A box that did not make it onto the board, and why.
#[derive(Clone, Debug, PartialEq)]
pub enum SkippedPiece {
    /// The class label has no FEN letter.
    UnknownPieceClass { index: usize, label: String },
    /// The anchor falls outside the playable grid.
    OutOfBounds {
        index: usize,
        label: String,
        anchor: OutOfBounds,
    },
}

/// A box that was written to the board.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPiece {
    /// Position in the input box list.
    pub index: usize,
    pub square: GridSquare,
    pub letter: char,
    /// Letter this write replaced, if the square was already taken.
    pub replaced: Option<char>,
}

/// Result of encoding one image's detections.
#[derive(Clone, Debug, Default)]
pub struct Placement {
    pub board: BoardState,
    pub placed: Vec<PlacedPiece>,
    pub skipped: Vec<SkippedPiece>,
}

impl Placement {
    /// FEN placement field of the board.
    pub fn placement(&self) -> String {
        self.board.placement()
    }

    /// Number of writes that landed on an already occupied square.
    pub fn collisions(&self) -> usize {
        self.placed.iter().filter(|p| p.replaced.is_some()).count()
    }
}

/// Accumulates transformed detections into a [`BoardState`].
///
/// Boxes are taken in input order. Unknown classes and anchors outside the
/// grid are skipped without error. When two boxes land on the same square
/// the later one wins; detection order is whatever the detector produced.
///
/// Under [`BoxRounding::Truncate`] (the default) box coordinates are
/// truncated to whole pixels before the anchor is taken.
#[derive(Clone, Debug, Default)]
pub struct BoardEncoder {
    mapper: GridMapper,
    pieces: PieceTable,
    anchor: AnchorPolicy,
    rounding: BoxRounding,
}

impl BoardEncoder {
    pub fn new(mapper: GridMapper, pieces: PieceTable, anchor: AnchorPolicy) -> Self {
        if anchor == AnchorPolicy::Centroid {
            warn!("centroid anchoring is deprecated; bottom_center places pieces more reliably");
        }
        Self {
            mapper,
            pieces,
            anchor,
            rounding: BoxRounding::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: BoxRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn pieces(&self) -> &PieceTable {
        &self.pieces
    }

    pub fn anchor_policy(&self) -> AnchorPolicy {
        self.anchor
    }

    pub fn rounding(&self) -> BoxRounding {
        self.rounding
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(boxes = boxes.len()))
    )]
    pub fn encode(&self, boxes: &[CanonicalBox]) -> Placement {
        let mut out = Placement::default();

        for (index, b) in boxes.iter().enumerate() {
            let Some(letter) = self.pieces.letter(&b.class_label) else {
                debug!("box {index}: class {:?} is not a piece", b.class_label);
                out.skipped.push(SkippedPiece::UnknownPieceClass {
                    index,
                    label: b.class_label.clone(),
                });
                continue;
            };

            let anchor = match self.rounding {
                BoxRounding::Truncate => self.anchor.anchor(&b.truncated()),
                BoxRounding::Exact => self.anchor.anchor(b),
            };
            let square = match self.mapper.map_point(anchor) {
                Ok(square) => square,
                Err(oob) => {
                    debug!("box {index} ({}): {oob}", b.class_label);
                    out.skipped.push(SkippedPiece::OutOfBounds {
                        index,
                        label: b.class_label.clone(),
                        anchor: oob,
                    });
                    continue;
                }
            };

            let replaced = out.board.set(square, letter);
            if let Some(prev) = replaced {
                debug!("box {index}: {letter} on {square} overwrites {prev}");
            }
            out.placed.push(PlacedPiece {
                index,
                square,
                letter,
                replaced,
            });
        }

        debug!(
            "placed {} of {} boxes ({} skipped, {} collisions)",
            out.placed.len(),
            boxes.len(),
            out.skipped.len(),
            out.collisions()
        );
        out
    }
}
