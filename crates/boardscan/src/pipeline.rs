//! End-to-end scan: photograph + mask + detections -> FEN placement.

use std::borrow::Cow;

use boardscan_core::{
    ContourExtractor, CornerNormalizer, GeometryError, GeometryTransformer, SourceBox,
    WarpedBoard,
};
use boardscan_grid::{BoardEncoder, GridConfigError, Placement, Side, SkippedPiece};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use log::{debug, info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::collab::{BoardSegmenter, CollaboratorError, PieceDetector};
use crate::{artifact, ScanParams};

/// Errors that end a scan without a board.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    GridConfig(#[from] GridConfigError),

    #[error("{what} has no pixels ({width}x{height})")]
    EmptyInput {
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("working size must be at least 2 px (got {0})")]
    InvalidWorkingSize(u32),

    #[error("piece detector failed: {0}")]
    Detector(#[source] CollaboratorError),

    #[error("board segmenter failed: {0}")]
    Segmenter(#[source] CollaboratorError),
}

/// Everything one scan produced.
#[derive(Clone, Debug)]
pub struct ScanResult {
    pub placement: Placement,
    /// Canonical image, re-projected boxes and the matrices used.
    pub warped: WarpedBoard,
    pub side_to_move: Option<Side>,
}

impl ScanResult {
    /// FEN piece-placement field only.
    pub fn placement_field(&self) -> String {
        self.placement.placement()
    }

    /// Placement plus ` <side> - - 0 0` when a side to move was configured,
    /// otherwise the placement field alone.
    pub fn fen(&self) -> String {
        match self.side_to_move {
            Some(side) => self.placement.board.fen(side),
            None => self.placement_field(),
        }
    }

    pub fn skipped(&self) -> &[SkippedPiece] {
        &self.placement.skipped
    }
}

/// Runs the stages in order: working-size normalization, contour,
/// corner normalization, warp and re-projection, board encoding.
///
/// Holds no per-image state; one scanner can process any number of
/// images.
#[derive(Clone, Debug)]
pub struct BoardScanner {
    params: ScanParams,
    contour: ContourExtractor,
    normalizer: CornerNormalizer,
    encoder: BoardEncoder,
}

impl BoardScanner {
    pub fn new(params: ScanParams) -> Result<Self, ScanError> {
        if let Some(size) = params.working_size {
            if size < 2 {
                return Err(ScanError::InvalidWorkingSize(size));
            }
        }
        let encoder = params.build_encoder()?;
        Ok(Self {
            contour: ContourExtractor::new(params.contour.clone()),
            normalizer: CornerNormalizer::new(params.normalize.clone()),
            encoder,
            params,
        })
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    pub fn encoder(&self) -> &BoardEncoder {
        &self.encoder
    }

    /// `image` at the configured working resolution; borrowed when it is
    /// already there or no working size is set.
    pub fn to_working<'a>(&self, image: &'a RgbImage) -> Cow<'a, RgbImage> {
        match self.params.working_size {
            Some(size) if image.dimensions() != (size, size) => {
                debug!(
                    "resizing {}x{} image to {size}x{size}",
                    image.width(),
                    image.height()
                );
                Cow::Owned(imageops::resize(image, size, size, FilterType::Triangle))
            }
            _ => Cow::Borrowed(image),
        }
    }

    /// Scan a photograph with its board mask and piece detections.
    ///
    /// `boxes` are in the pixel space of `image`. The mask may have any
    /// size; it is resized onto the working image.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip_all,
            fields(width = image.width(), height = image.height(), boxes = boxes.len())
        )
    )]
    pub fn scan(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        boxes: &[SourceBox],
    ) -> Result<ScanResult, ScanError> {
        non_empty("image", image.dimensions())?;
        non_empty("mask", mask.dimensions())?;

        let working = self.to_working(image);
        let (w, h) = working.dimensions();
        let boxes = scale_boxes(boxes, image.dimensions(), (w, h));
        let mask = align_mask(mask, w, h);

        let vertices = self.contour.extract(&mask)?;
        let matrices = self.normalizer.normalize(vertices, w, h)?;
        let warped = GeometryTransformer::new(matrices)?
            .with_rounding(self.params.box_rounding)
            .apply(&working, &boxes);
        let placement = self.encoder.encode(&warped.boxes);

        info!(
            "board read: {} ({} placed, {} skipped)",
            placement.placement(),
            placement.placed.len(),
            placement.skipped.len()
        );

        if let Some(path) = &self.params.debug_image {
            match artifact::write_debug_image(&warped, path) {
                Ok(()) => debug!("wrote debug image to {}", path.display()),
                Err(e) => warn!("could not write debug image {}: {e}", path.display()),
            }
        }

        Ok(ScanResult {
            placement,
            warped,
            side_to_move: self.params.side_to_move,
        })
    }

    /// Bring `image` to the working resolution, ask the collaborators for
    /// boxes and a mask on that image, then [`BoardScanner::scan`].
    pub fn scan_with<D, S>(
        &self,
        image: &RgbImage,
        detector: &D,
        segmenter: &S,
    ) -> Result<ScanResult, ScanError>
    where
        D: PieceDetector + ?Sized,
        S: BoardSegmenter + ?Sized,
    {
        non_empty("image", image.dimensions())?;
        let working = self.to_working(image);
        let boxes = detector.detect(&working).map_err(ScanError::Detector)?;
        let mask = segmenter.segment(&working).map_err(ScanError::Segmenter)?;
        debug!("collaborators returned {} boxes", boxes.len());
        self.scan(&working, &mask, &boxes)
    }
}

fn non_empty(what: &'static str, (width, height): (u32, u32)) -> Result<(), ScanError> {
    if width == 0 || height == 0 {
        return Err(ScanError::EmptyInput {
            what,
            width,
            height,
        });
    }
    Ok(())
}

fn scale_boxes(boxes: &[SourceBox], from: (u32, u32), to: (u32, u32)) -> Cow<'_, [SourceBox]> {
    if from == to {
        return Cow::Borrowed(boxes);
    }
    let sx = to.0 as f32 / from.0 as f32;
    let sy = to.1 as f32 / from.1 as f32;
    Cow::Owned(boxes.iter().map(|b| b.scaled(sx, sy)).collect())
}

/// Nearest-neighbour resize onto `width` x `height`, then binarize.
fn align_mask(mask: &GrayImage, width: u32, height: u32) -> GrayImage {
    let mut out = if mask.dimensions() == (width, height) {
        mask.clone()
    } else {
        debug!(
            "resizing {}x{} mask to {width}x{height}",
            mask.width(),
            mask.height()
        );
        imageops::resize(mask, width, height, FilterType::Nearest)
    };
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > 0 { 255 } else { 0 };
    }
    out
}
