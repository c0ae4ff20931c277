//! File interchange: photographs, board masks and detection lists.

use std::fs;
use std::path::Path;

use boardscan_core::SourceBox;
use image::{GrayImage, ImageReader, RgbImage};
use log::debug;

#[derive(thiserror::Error, Debug)]
pub enum ScanIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Decode any supported raster format as 8-bit RGB.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage, ScanIoError> {
    let img = ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_rgb8())
}

/// Decode a board-region mask as single-channel luma. Any non-zero pixel
/// counts as board.
pub fn load_mask(path: impl AsRef<Path>) -> Result<GrayImage, ScanIoError> {
    let img = ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_luma8())
}

/// Parse a JSON array of `{x1, y1, x2, y2, class_id, class_label}` records.
///
/// Corners given in the wrong order are swapped so every box satisfies
/// `x1 <= x2`, `y1 <= y2`.
pub fn parse_detections(json: &str) -> Result<Vec<SourceBox>, ScanIoError> {
    let raw: Vec<SourceBox> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(SourceBox::normalized).collect())
}

pub fn load_detections(path: impl AsRef<Path>) -> Result<Vec<SourceBox>, ScanIoError> {
    let path = path.as_ref();
    let boxes = parse_detections(&fs::read_to_string(path)?)?;
    debug!("loaded {} detections from {}", boxes.len(), path.display());
    Ok(boxes)
}

pub fn write_detections(
    path: impl AsRef<Path>,
    boxes: &[SourceBox],
) -> Result<(), ScanIoError> {
    fs::write(path, serde_json::to_string_pretty(boxes)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detections_parse_and_normalize() {
        let json = r#"[
            {"x1": 40, "y1": 10, "x2": 20, "y2": 50, "class_id": 6, "class_label": "white-pawn"},
            {"x1": 1.5, "y1": 2, "x2": 3, "y2": 4, "class_id": 11, "class_label": "black-king"}
        ]"#;
        let boxes = parse_detections(json).expect("parse");
        assert_eq!(boxes.len(), 2);
        assert_eq!((boxes[0].x1, boxes[0].x2), (20.0, 40.0));
        assert_eq!(boxes[0].class_label, "white-pawn");
        assert_eq!(boxes[1].class_id, 11);
    }

    #[test]
    fn malformed_detections_are_json_errors() {
        let err = parse_detections(r#"[{"x1": 1}]"#).unwrap_err();
        assert!(matches!(err, ScanIoError::Json(_)));
    }

    #[test]
    fn detections_survive_a_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("boxes.json");
        let boxes = vec![SourceBox::new(1.0, 2.0, 3.0, 4.0, 0, "white-rook")];
        write_detections(&path, &boxes).expect("write");
        assert_eq!(load_detections(&path).expect("load"), boxes);
    }

    #[test]
    fn mask_loads_as_luma() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mask.png");
        let mut rgb = RgbImage::new(4, 3);
        rgb.put_pixel(1, 1, image::Rgb([255, 255, 255]));
        rgb.save(&path).expect("save");
        let mask = load_mask(&path).expect("load");
        assert_eq!(mask.dimensions(), (4, 3));
        assert_eq!(mask.get_pixel(1, 1).0[0], 255);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    }
}
