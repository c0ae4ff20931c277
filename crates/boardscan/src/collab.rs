//! Seams for the models that feed the pipeline.
//!
//! Neither inference model lives in this crate. Implement these traits to
//! plug one in; closures of the right shape implement them already.

use boardscan_core::SourceBox;
use image::{GrayImage, RgbImage};

/// Error type collaborators report through.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Finds pieces in the working-resolution photograph.
///
/// ```
/// use boardscan::{CollaboratorError, PieceDetector, SourceBox};
/// use image::RgbImage;
///
/// struct Nothing;
///
/// impl PieceDetector for Nothing {
///     fn detect(&self, _image: &RgbImage) -> Result<Vec<SourceBox>, CollaboratorError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait PieceDetector {
    /// Boxes in the pixel space of `image`, in detection order.
    fn detect(&self, image: &RgbImage) -> Result<Vec<SourceBox>, CollaboratorError>;
}

/// Segments the board surface in the working-resolution photograph.
pub trait BoardSegmenter {
    /// Single-channel mask; non-zero pixels are board. Other sizes are
    /// resized to `image` before use.
    fn segment(&self, image: &RgbImage) -> Result<GrayImage, CollaboratorError>;
}

impl<F> PieceDetector for F
where
    F: Fn(&RgbImage) -> Result<Vec<SourceBox>, CollaboratorError>,
{
    fn detect(&self, image: &RgbImage) -> Result<Vec<SourceBox>, CollaboratorError> {
        self(image)
    }
}

impl<F> BoardSegmenter for F
where
    F: Fn(&RgbImage) -> Result<GrayImage, CollaboratorError>,
{
    fn segment(&self, image: &RgbImage) -> Result<GrayImage, CollaboratorError> {
        self(image)
    }
}
