//! Corner canonicalization and the rotation + perspective matrices.

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{homography_from_4pt, CornerOrder, GeometryError, Homography, Quad};

/// Outlines smaller than this (in square pixels) carry no usable board.
pub const MIN_BOARD_AREA: f32 = 1.0;

/// Settings for building the canonical-square transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    /// Outward shift of every outline corner, in source pixels. Pieces on
    /// the edge files stand partly outside the segmented board surface.
    pub margin_px: f32,
    /// Side of the canonical square image in pixels.
    pub output_size: u32,
    pub corner_order: CornerOrder,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            margin_px: 10.0,
            output_size: 256,
            corner_order: CornerOrder::Polar,
        }
    }
}

/// The transform chain from the source photograph to the canonical square.
///
/// Computed once per image and shared by the image warp and the box
/// re-projection, so both always agree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrices {
    /// Source pixels -> rotated pixels (quarter turn counter-clockwise).
    pub rotation: Homography,
    /// Rotated pixels -> canonical square pixels.
    pub perspective: Homography,
    /// Enlarged board outline in source pixels, canonical corner order.
    pub outline: Quad,
    /// Side of the canonical square.
    pub output_size: u32,
}

impl TransformMatrices {
    /// Rotation followed by perspective, as one matrix.
    pub fn canonical_from_source(&self) -> Homography {
        self.rotation.then(&self.perspective)
    }

    /// Inverse of [`TransformMatrices::canonical_from_source`].
    pub fn source_from_canonical(&self) -> Option<Homography> {
        self.canonical_from_source().inverse()
    }

    /// Corners of the canonical square, in the same order as `outline`.
    pub fn destination_corners(&self) -> [Point2<f32>; 4] {
        destination_square(self.output_size)
    }
}

fn destination_square(size: u32) -> [Point2<f32>; 4] {
    let s = size.saturating_sub(1) as f32;
    [
        Point2::new(0.0, 0.0),
        Point2::new(s, 0.0),
        Point2::new(s, s),
        Point2::new(0.0, s),
    ]
}

/// Orders outline vertices and builds the rotation + perspective matrices.
#[derive(Clone, Debug, Default)]
pub struct CornerNormalizer {
    pub params: NormalizeParams,
}

impl CornerNormalizer {
    pub fn new(params: NormalizeParams) -> Self {
        Self { params }
    }

    /// Deterministic for the same vertices, image size and params.
    ///
    /// `image_width`/`image_height` are the dimensions of the source image
    /// the vertices were found in; the rotation pivots about its centre.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub fn normalize(
        &self,
        vertices: [Point2<f32>; 4],
        image_width: u32,
        image_height: u32,
    ) -> Result<TransformMatrices, GeometryError> {
        if image_width == 0 || image_height == 0 {
            return Err(GeometryError::degenerate(format!(
                "source image is {image_width}x{image_height}"
            )));
        }
        if self.params.output_size < 2 {
            return Err(GeometryError::degenerate(format!(
                "canonical square of {} px cannot hold a board",
                self.params.output_size
            )));
        }

        let quad = Quad::from_unordered(vertices, self.params.corner_order);
        let area = quad.area();
        if !(area.is_finite() && area >= MIN_BOARD_AREA) {
            return Err(GeometryError::degenerate(format!(
                "outline encloses {area:.2} px²"
            )));
        }

        let outline = quad
            .shifted_outward(self.params.margin_px)
            .ok_or_else(|| GeometryError::degenerate("outline corner coincides with centroid"))?;

        let rotation = Homography::rotation_ccw90(image_width, image_height);
        let rotated = outline.map(|p| rotation.apply(p));
        let dst = destination_square(self.params.output_size);

        let perspective = homography_from_4pt(&rotated.corners, &dst)
            .filter(|h| h.inverse().is_some())
            .ok_or_else(|| GeometryError::degenerate("perspective transform is singular"))?;

        debug!(
            "outline {:?} (area {:.1}) -> {}px square",
            outline.corners.map(|p| (p.x, p.y)),
            area,
            self.params.output_size
        );

        Ok(TransformMatrices {
            rotation,
            perspective,
            outline,
            output_size: self.params.output_size,
        })
    }
}
