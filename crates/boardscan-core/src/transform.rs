use ::image::RgbImage;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    warp_perspective_rgb, BoxRounding, CanonicalBox, GeometryError, Homography, RotatedBox,
    SourceBox, TransformMatrices,
};

/// Warped canonical image plus the boxes re-projected into it.
#[derive(Clone, Debug)]
pub struct WarpedBoard {
    pub image: RgbImage,
    /// Same length and order as the input boxes.
    pub boxes: Vec<CanonicalBox>,
    pub matrices: TransformMatrices,
}

/// Applies one [`TransformMatrices`] chain to an image and its detections.
///
/// Boxes are never filtered here: every input box comes out, in input
/// order, with the same class. Each box is re-projected through all four
/// of its corners and then re-fitted with an axis-aligned rectangle, so
/// keystoned boxes grow slightly; only their anchor point matters later.
///
/// With [`BoxRounding::Truncate`] (the default) a box is truncated to whole
/// pixels on entry, re-fitted in rotated space, truncated again, and then
/// taken through the perspective and truncated once more. With
/// [`BoxRounding::Exact`] it goes through the composite matrix in one step.
#[derive(Clone, Debug)]
pub struct GeometryTransformer {
    matrices: TransformMatrices,
    canonical_from_source: Homography,
    source_from_canonical: Homography,
    rounding: BoxRounding,
}

impl GeometryTransformer {
    pub fn new(matrices: TransformMatrices) -> Result<Self, GeometryError> {
        let canonical_from_source = matrices.canonical_from_source();
        let source_from_canonical = canonical_from_source
            .inverse()
            .ok_or_else(|| GeometryError::degenerate("transform chain is not invertible"))?;
        Ok(Self {
            matrices,
            canonical_from_source,
            source_from_canonical,
            rounding: BoxRounding::default(),
        })
    }

    pub fn with_rounding(mut self, rounding: BoxRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn matrices(&self) -> &TransformMatrices {
        &self.matrices
    }

    pub fn rounding(&self) -> BoxRounding {
        self.rounding
    }

    /// Resample the source image into the canonical square.
    pub fn warp_image(&self, image: &RgbImage) -> RgbImage {
        let size = self.matrices.output_size;
        warp_perspective_rgb(image, self.source_from_canonical, size, size)
    }

    pub fn reproject_box(&self, b: &SourceBox) -> CanonicalBox {
        match self.rounding {
            BoxRounding::Exact => b.reproject(&self.canonical_from_source),
            BoxRounding::Truncate => {
                let rotated: RotatedBox = b.truncated().reproject(&self.matrices.rotation);
                let canonical: CanonicalBox =
                    rotated.truncated().reproject(&self.matrices.perspective);
                canonical.truncated()
            }
        }
    }

    pub fn reproject_boxes(&self, boxes: &[SourceBox]) -> Vec<CanonicalBox> {
        boxes.iter().map(|b| self.reproject_box(b)).collect()
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(boxes = boxes.len()))
    )]
    pub fn apply(&self, image: &RgbImage, boxes: &[SourceBox]) -> WarpedBoard {
        let warped = self.warp_image(image);
        let boxes = self.reproject_boxes(boxes);
        debug!(
            "warped {}x{} image into {}px square, re-projected {} boxes",
            image.width(),
            image.height(),
            self.matrices.output_size,
            boxes.len()
        );
        WarpedBoard {
            image: warped,
            boxes,
            matrices: self.matrices,
        }
    }
}
