//! Inspection image: the warped board with its transformed boxes drawn in.

use std::path::Path;

use boardscan_core::{CanonicalBox, WarpedBoard};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::ScanIoError;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Copy of the warped image with one hollow rectangle per finite box.
pub fn render_boxes(image: &RgbImage, boxes: &[CanonicalBox]) -> RgbImage {
    let mut out = image.clone();
    for b in boxes.iter().filter(|b| b.is_finite()) {
        let x = b.x1.floor();
        let y = b.y1.floor();
        let w = (b.x2.ceil() - x).max(1.0);
        let h = (b.y2.ceil() - y).max(1.0);
        // boxes far off-canvas come from near-horizon corners
        if x.abs() > 1e6 || y.abs() > 1e6 || w > 1e6 || h > 1e6 {
            continue;
        }
        let rect = Rect::at(x as i32, y as i32).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(&mut out, rect, BOX_COLOR);
    }
    out
}

/// Render `board` and save it; the format follows the file extension.
pub fn write_debug_image(board: &WarpedBoard, path: impl AsRef<Path>) -> Result<(), ScanIoError> {
    render_boxes(&board.image, &board.boxes).save(path.as_ref())?;
    Ok(())
}
