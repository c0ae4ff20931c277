#![allow(dead_code)]

use boardscan::SourceBox;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Placement read from [`reference_boxes`] over [`square_mask`] at 256 px.
pub const REFERENCE_PLACEMENT: &str = "7Q/8/8/8/4k3/8/8/P7";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `size` x `size` mask with the board filling `lo..=hi` on both axes.
pub fn square_mask(size: u32, lo: u32, hi: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        if (lo..=hi).contains(&x) && (lo..=hi).contains(&y) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Checkered stand-in for a photograph.
pub fn board_image(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        if (x / 16 + y / 16) % 2 == 0 {
            Rgb([220, 200, 160])
        } else {
            Rgb([90, 60, 30])
        }
    })
}

/// Detections for the 256 px board of `square_mask(256, 28, 227)`.
///
/// The enlarged outline spans 20.93..234.07 px on both axes, so canonical
/// coordinates are `(v - 20.93) * 1.1964`. Bottom centres land on a1, e4
/// and h8; the hand is not a piece and the rook stands below the grid.
pub fn reference_boxes() -> Vec<SourceBox> {
    vec![
        SourceBox::new(30.0, 25.0, 40.0, 40.0, 6, "white-pawn"),
        SourceBox::new(60.0, 60.0, 70.0, 80.0, 12, "referee-hand"),
        SourceBox::new(118.0, 80.0, 128.0, 102.0, 11, "black-king"),
        SourceBox::new(180.0, 160.0, 191.0, 186.0, 4, "white-queen"),
        SourceBox::new(95.0, 230.0, 105.0, 250.0, 9, "white-rook"),
    ]
}
