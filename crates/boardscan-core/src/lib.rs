//! Geometry core for reading a chessboard photograph.
//!
//! This crate turns a board-region mask into a quadrilateral outline, builds
//! the rotation + perspective chain onto a canonical square, and pushes the
//! photograph and its piece detections through that chain. It knows
//! nothing about chess squares or pieces; see `boardscan-grid` for that.
//!
//! Stages, in pipeline order:
//! 1. [`ContourExtractor`]: largest outer contour -> 4 vertices.
//! 2. [`CornerNormalizer`]: canonical corner order, outward margin,
//!    [`TransformMatrices`].
//! 3. [`GeometryTransformer`]: warped image and re-projected boxes.

mod bbox;
mod contour;
mod error;
mod homography;
mod logger;
mod normalize;
mod quad;
mod sampling;
mod transform;

pub use bbox::{
    BoundingBox, BoxRounding, CanonicalBox, CanonicalPx, PixelSpace, RotatedBox, RotatedPx,
    SourceBox, SourcePx,
};
pub use contour::{ContourExtractor, ContourParams};
pub use error::GeometryError;
pub use homography::{homography_from_4pt, warp_perspective_rgb, Homography};
pub use normalize::{CornerNormalizer, NormalizeParams, TransformMatrices, MIN_BOARD_AREA};
pub use quad::{polygon_area, CornerOrder, Quad};
pub use sampling::sample_bilinear_rgb;
pub use transform::{GeometryTransformer, WarpedBoard};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
